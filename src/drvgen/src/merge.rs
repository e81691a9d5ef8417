// wrfsuewsrs-drvgen/src/merge.rs

//! Assembly of the single-file SUEWS driver for WRF.
//!
//! WRF's build system compiles one source per physics scheme, so the whole
//! SUEWS kernel (plus the SPARTACUS-Surface radiation library it `use`s) is
//! concatenated into one Fortran file. Order matters twice over: modules must
//! be defined before they are used, and the dependency manifest already lists
//! the sources in compilation order, so that order is reused here.

use crate::error::{DrvGenError, Result};
use crate::filter::{ConditionFilter, LineAction};
use crate::manifest::{self, SourceGroup};
use crate::registry::ModuleRegistry;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Default file name of the merged driver, as WRF's phys/ directory expects.
pub const DRIVER_FILE_NAME: &str = "module_sf_suewsdrv.F";

/// Subdirectory of the SUEWS tree holding the manifest-listed sources.
const SOURCE_SUBDIR: &str = "src";

/// Generated by SUEWS' own versioning step; superseded by the synthetic
/// version module, so it must never be merged.
const VERSION_SOURCE: &str = "suews_ctrl_ver.f95";

/// Preprocessor symbols left undefined in the coupled build. Their `#ifdef`
/// branches are stripped and their `#else` branches kept.
const STRIPPED_CONDITIONS: [&str; 2] = ["wrf", "nc"];

/// Git tag recorded in the synthetic version module.
const GIT_COMMIT_TAG: &str = "WRF-SUEWS-2025";

/// Compiler identifier recorded in the synthetic version module.
const COMPILER_VER_TAG: &str = "WRF Coupled Version";

/// SPARTACUS-Surface sources vendored by SUEWS, as `(subdirectory, filename)`
/// pairs in definition-before-use order: kinds and I/O utilities, then the
/// matrix tools, then the canopy radiation scheme. `suews_phys_spartacus.f95`
/// `use`s these modules, so they are merged ahead of the manifest files.
pub const SPARTACUS_SOURCES: [(&str, &str); 22] = [
    ("ext_lib/spartacus-surface/utilities", "parkind1.F90"),
    ("ext_lib/spartacus-surface/utilities", "radiation_io.F90"),
    ("ext_lib/spartacus-surface/utilities", "print_matrix.F90"),
    ("ext_lib/spartacus-surface/radtool", "radtool_legendre_gauss.F90"),
    ("ext_lib/spartacus-surface/radtool", "radtool_matrix.F90"),
    ("ext_lib/spartacus-surface/radtool", "radtool_eigen_decomposition.F90"),
    ("ext_lib/spartacus-surface/radtool", "radtool_schur.F90"),
    ("ext_lib/spartacus-surface/radtool", "radtool_calc_matrices_lw_eb.F90"),
    ("ext_lib/spartacus-surface/radtool", "radtool_calc_matrices_sw_eb.F90"),
    ("ext_lib/spartacus-surface/radsurf", "radsurf_config.F90"),
    ("ext_lib/spartacus-surface/radsurf", "radsurf_canopy_properties.F90"),
    ("ext_lib/spartacus-surface/radsurf", "radsurf_sw_spectral_properties.F90"),
    ("ext_lib/spartacus-surface/radsurf", "radsurf_lw_spectral_properties.F90"),
    ("ext_lib/spartacus-surface/radsurf", "radsurf_boundary_conds_out.F90"),
    ("ext_lib/spartacus-surface/radsurf", "radsurf_canopy_flux.F90"),
    ("ext_lib/spartacus-surface/radsurf", "radsurf_norm_perim.F90"),
    ("ext_lib/spartacus-surface/radsurf", "radsurf_overlap.F90"),
    ("ext_lib/spartacus-surface/radsurf", "radsurf_view_factor.F90"),
    ("ext_lib/spartacus-surface/radsurf", "radsurf_simple_spectrum.F90"),
    ("ext_lib/spartacus-surface/radsurf", "radsurf_urban_sw.F90"),
    ("ext_lib/spartacus-surface/radsurf", "radsurf_urban_lw.F90"),
    ("ext_lib/spartacus-surface/radsurf", "radsurf_interface.F90"),
];

/// Merges the SUEWS sources under `source_dir` into one driver file.
pub struct SourceMerger {
    source_dir: PathBuf,
    section_markers: Vec<String>,
}

impl SourceMerger {
    /// Create a merger for the SUEWS tree at `source_dir`, reading the
    /// canonical manifest sections.
    pub fn new(source_dir: &Path) -> Self {
        Self {
            source_dir: source_dir.to_path_buf(),
            section_markers: SourceGroup::canonical_markers()
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }

    /// Override which manifest sections are merged, in the given order.
    pub fn with_section_markers(mut self, markers: &[&str]) -> Self {
        self.section_markers = markers.iter().map(|m| m.to_string()).collect();
        self
    }

    /// The manifest-derived file list for this tree, in merge order, with
    /// the generated version source dropped.
    pub fn file_list(&self) -> Result<Vec<String>> {
        let markers: Vec<&str> = self.section_markers.iter().map(String::as_str).collect();
        let manifest_path = self.source_dir.join(manifest::MANIFEST_NAME);
        let files = manifest::read_groups(&manifest_path, &markers)?;
        Ok(files.into_iter().filter(|f| f != VERSION_SOURCE).collect())
    }

    /// Merge into `target_path`, truncating any previous content, and return
    /// the written path. The target handle is closed before this returns,
    /// on the error paths included; a failed run leaves no open handle, only
    /// a partial file that must not be used.
    pub fn merge(&self, target_path: &Path) -> Result<PathBuf> {
        let file_list = self.file_list()?;
        let target = fs_err::File::create(target_path)?;
        let mut writer = BufWriter::new(target);
        self.write_merged(&file_list, &mut writer)?;
        writer.flush()?;
        Ok(target_path.to_path_buf())
    }

    /// Merge into an arbitrary writer instead of a file on disk.
    pub fn merge_to_writer<W: Write>(&self, writer: &mut W) -> Result<()> {
        let file_list = self.file_list()?;
        self.write_merged(&file_list, writer)
    }

    fn write_merged<W: Write>(&self, file_list: &[String], writer: &mut W) -> Result<()> {
        log::info!(
            "merging {} library and {} manifest sources",
            SPARTACUS_SOURCES.len(),
            file_list.len()
        );
        let mut registry = ModuleRegistry::new();
        write_version_header(writer)?;
        for (subdir, name) in SPARTACUS_SOURCES {
            let path = self.source_dir.join(subdir).join(name);
            append_source(&path, name, &mut registry, writer)?;
        }
        for name in file_list {
            let path = self.source_dir.join(SOURCE_SUBDIR).join(name);
            append_source(&path, name, &mut registry, writer)?;
        }
        log::debug!("registry holds {} module definitions", registry.len());
        Ok(())
    }
}

/// Merge the SUEWS tree at `source_dir` into `target_path`.
///
/// Convenience wrapper over [`SourceMerger`] with the canonical sections.
pub fn merge(source_dir: &Path, target_path: &Path) -> Result<PathBuf> {
    SourceMerger::new(source_dir).merge(target_path)
}

/// The ordered `.f95` list the canonical merge would process.
pub fn driver_file_list(source_dir: &Path) -> Result<Vec<String>> {
    SourceMerger::new(source_dir).file_list()
}

/// Synthetic stand-in for SUEWS' generated version module, pinning the
/// coupled build's identity. Written before any source so later `use
/// version` statements resolve.
fn write_version_header<W: Write>(writer: &mut W) -> Result<()> {
    writeln!(writer, "MODULE version")?;
    writeln!(writer, "IMPLICIT NONE")?;
    writeln!(writer, "CHARACTER(len=90) :: git_commit = '{}' ", GIT_COMMIT_TAG)?;
    writeln!(writer, "CHARACTER(len=90) :: compiler_ver = '{}' ", COMPILER_VER_TAG)?;
    writeln!(writer, "END MODULE version")?;
    writeln!(writer)?;
    Ok(())
}

/// Append one source file: filter guarded branches, resolve module-name
/// collisions, write a trailing blank separator.
fn append_source<W: Write>(
    path: &Path,
    filename: &str,
    registry: &mut ModuleRegistry,
    writer: &mut W,
) -> Result<()> {
    if !path.exists() {
        return Err(DrvGenError::SourceFileNotFound(path.to_path_buf()));
    }
    log::debug!("appending {}", path.display());
    let reader = BufReader::new(fs_err::File::open(path)?);
    append_lines(reader, filename, registry, writer)
}

fn append_lines<R: BufRead, W: Write>(
    reader: R,
    filename: &str,
    registry: &mut ModuleRegistry,
    writer: &mut W,
) -> Result<()> {
    let mut filters = STRIPPED_CONDITIONS.map(ConditionFilter::new);
    for line in reader.lines() {
        let line = line?;
        let mut action = LineAction::Keep;
        // Every filter sees every line so each keeps its own guard state.
        for filter in filters.iter_mut() {
            if filter.offer(&line) == LineAction::Drop {
                action = LineAction::Drop;
            }
        }
        if action == LineAction::Drop {
            continue;
        }
        writeln!(writer, "{}", registry.process_line(&line, filename))?;
    }
    writeln!(writer)?;
    Ok(())
}
