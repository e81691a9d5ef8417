// wrfsuewsrs/src/cli/patch.rs

use crate::configure::{default_suews_lib_flags, inject_suews_link_flags, CONFIGURE_FILE_NAME};
use anyhow::Result;
use std::path::Path;

/// Append the SUEWS link flags to `<workdir>/configure.wrf`
pub fn patch_configure(workdir: &Path, lib_dir: Option<&Path>) -> Result<()> {
    let configure_path = workdir.join(CONFIGURE_FILE_NAME);
    if !configure_path.exists() {
        anyhow::bail!(
            "{} does not exist; run WRF's ./configure in {} first",
            configure_path.display(),
            workdir.display()
        );
    }

    println!("Patching {}", configure_path.display());

    let flags = default_suews_lib_flags(lib_dir);
    if inject_suews_link_flags(&configure_path, &flags)? {
        println!("  ✓ Appended '{}' to LIB_EXTERNAL", flags);
    } else {
        println!("  ✓ SUEWS link flags already present; file untouched");
    }
    Ok(())
}
