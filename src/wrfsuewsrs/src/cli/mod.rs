// wrfsuewsrs/src/cli/mod.rs

pub mod generate;
pub mod patch;

pub use generate::generate_driver;
pub use patch::patch_configure;
