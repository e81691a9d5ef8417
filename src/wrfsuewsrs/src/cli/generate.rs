// wrfsuewsrs/src/cli/generate.rs

use anyhow::{Context, Result};
use std::path::Path;
use wrfsuewsrs_drvgen::SourceMerger;

/// Merge the SUEWS sources into `<workdir>/<output_name>`
pub fn generate_driver(suews_dir: &Path, workdir: &Path, output_name: &str) -> Result<()> {
    if !suews_dir.exists() {
        anyhow::bail!("SUEWS source tree {} does not exist", suews_dir.display());
    }

    println!("Generating WRF-SUEWS driver from: {}", suews_dir.display());

    fs_err::create_dir_all(workdir).context(format!(
        "Failed to create working directory: {}",
        workdir.display()
    ))?;
    println!("  ✓ Working directory: {}", workdir.display());

    let merger = SourceMerger::new(suews_dir);
    let file_list = merger.file_list()?;
    println!(
        "  ✓ Resolved {} source files from the Makefile",
        file_list.len()
    );

    let target = workdir.join(output_name);
    let driver = merger.merge(&target).context(format!(
        "Failed to merge SUEWS sources into {}",
        target.display()
    ))?;
    println!("  ✓ Merged driver written");

    println!("\nDriver: {}", driver.display());
    Ok(())
}
