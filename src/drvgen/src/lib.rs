// wrfsuewsrs-drvgen/src/lib.rs

//! Merged-source driver generation for coupling SUEWS into WRF.
//!
//! This library provides the source-level half of the coupling workflow:
//! - Read the SUEWS build manifest and recover the compilation-ordered list
//!   of `.f95` sources
//! - Concatenate those sources, plus the vendored SPARTACUS-Surface library,
//!   into the single driver file WRF's build system expects
//! - Strip `#ifdef` branches that only apply to the standalone SUEWS build
//! - Rename module definitions that collide once everything shares one file
//!
//! # Examples
//!
//! ```no_run
//! fn main() -> Result<(), wrfsuewsrs_drvgen::DrvGenError> {
//!     let driver = wrfsuewsrs_drvgen::merge(
//!         std::path::Path::new("../SUEWS"),
//!         std::path::Path::new("module_sf_suewsdrv.F"),
//!     )?;
//!     println!("driver written to {}", driver.display());
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod filter;
pub mod manifest;
pub mod merge;
pub mod registry;

pub use error::{DrvGenError, Result};
pub use manifest::SourceGroup;
pub use merge::{driver_file_list, merge, SourceMerger, DRIVER_FILE_NAME};
pub use registry::ModuleRegistry;
