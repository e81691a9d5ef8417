// wrfsuewsrs/src/lib.rs

pub mod cli;
pub mod configure;
pub mod workdir;
