// wrfsuewsrs/src/configure.rs

//! Patching of WRF's generated `configure.wrf`.
//!
//! WRF's `./configure` writes the build settings file; the SUEWS static
//! library has to ride along on the external-libraries line for the coupled
//! model to link. Only that one logical line is touched, the rest of the
//! file is preserved as written.

use anyhow::{Context, Result};
use std::path::Path;

/// File written by WRF's `./configure` step.
pub const CONFIGURE_FILE_NAME: &str = "configure.wrf";

/// Assignment listing the external libraries WRF links against.
const LIB_EXTERNAL_KEY: &str = "LIB_EXTERNAL";

/// Linker flag for the SUEWS library; its presence marks a patched file.
const SUEWS_LIB_FLAG: &str = "-lsuews";

/// Link flags for the SUEWS static library. Without an explicit library
/// directory the SUEWS build's default library path inside the WRF tree is
/// referenced.
pub fn default_suews_lib_flags(lib_dir: Option<&Path>) -> String {
    match lib_dir {
        Some(dir) => format!("-L{} {}", dir.display(), SUEWS_LIB_FLAG),
        None => format!("-L$(WRF_SRC_ROOT_DIR)/suews/lib {}", SUEWS_LIB_FLAG),
    }
}

/// Append `flags` to the end of the `LIB_EXTERNAL` logical line, following
/// backslash continuations, and rewrite the file in place.
///
/// Returns `false` and leaves the file untouched when the SUEWS flag is
/// already present, so the patch can be rerun safely.
pub fn inject_suews_link_flags(configure_path: &Path, flags: &str) -> Result<bool> {
    let content = fs_err::read_to_string(configure_path)?;
    if content.contains(SUEWS_LIB_FLAG) {
        log::debug!(
            "{} already linked in {}",
            SUEWS_LIB_FLAG,
            configure_path.display()
        );
        return Ok(false);
    }

    let mut lines: Vec<String> = content.lines().map(String::from).collect();
    let start = lines
        .iter()
        .position(|line| line.trim_start().starts_with(LIB_EXTERNAL_KEY))
        .context(format!(
            "No {} assignment in {}",
            LIB_EXTERNAL_KEY,
            configure_path.display()
        ))?;

    // Follow continuations to the last physical line of the assignment.
    let mut end = start;
    while end + 1 < lines.len() && lines[end].trim_end().ends_with('\\') {
        end += 1;
    }
    let appended = format!("{} {}", lines[end].trim_end(), flags);
    lines[end] = appended;

    let mut patched = lines.join("\n");
    patched.push('\n');
    fs_err::write(configure_path, patched)?;
    Ok(true)
}
