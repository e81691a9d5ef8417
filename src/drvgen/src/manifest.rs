// wrfsuewsrs-drvgen/src/manifest.rs

//! Reader for the SUEWS build-dependency manifest (the `Makefile` shipped in
//! the SUEWS source tree).
//!
//! The manifest assigns object-file lists to make variables, one section per
//! group of sources:
//!
//! ```make
//! UTILS = suews_ctrl_const.o \
//!         suews_util_time.o
//!
//! PHYS = suews_phys_snow.o suews_phys_waterdist.o
//! ```
//!
//! [`read_groups`] walks the sections in caller-supplied marker order, joins
//! backslash continuations, and returns the listed objects rewritten to their
//! `.f95` source names. The Makefile lists objects in compilation order, so
//! the returned list is also the order the sources must be merged in.

use crate::error::{DrvGenError, Result};
use lazy_static::lazy_static;
use regex::Regex;
use std::path::Path;

/// File name of the dependency manifest inside the SUEWS tree.
pub const MANIFEST_NAME: &str = "Makefile";

/// Lines scanned past the final section header before the section is cut at
/// the window boundary regardless.
const SECTION_LOOKAHEAD: usize = 10;

lazy_static! {
    /// An assignment whose right-hand side expands a make variable, e.g.
    /// `OTHERS = $(MODS)`. Such a line terminates the final section.
    static ref VARIABLE_ASSIGNMENT: Regex = Regex::new(r"=.*\$").unwrap();
}

/// A dependency section of the SUEWS Makefile.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceGroup {
    Utils,
    Phys,
    Driver,
    Test,
    Wrf,
}

impl SourceGroup {
    /// Merge order for the coupled driver: utilities first, then physics,
    /// then the driver and interface layers.
    pub const CANONICAL_ORDER: [SourceGroup; 5] = [
        SourceGroup::Utils,
        SourceGroup::Phys,
        SourceGroup::Driver,
        SourceGroup::Test,
        SourceGroup::Wrf,
    ];

    /// The assignment marker that opens this group's section in the manifest.
    pub fn marker(&self) -> &'static str {
        match self {
            SourceGroup::Utils => "UTILS =",
            SourceGroup::Phys => "PHYS =",
            SourceGroup::Driver => "DRIVER =",
            SourceGroup::Test => "TEST =",
            SourceGroup::Wrf => "WRF =",
        }
    }

    /// Section markers in canonical merge order.
    pub fn canonical_markers() -> Vec<&'static str> {
        Self::CANONICAL_ORDER.iter().map(|g| g.marker()).collect()
    }
}

/// Read the dependency manifest at `manifest_path` and return the `.f95`
/// source files listed by the given sections, in section order.
pub fn read_groups(manifest_path: &Path, section_markers: &[&str]) -> Result<Vec<String>> {
    if !manifest_path.exists() {
        return Err(DrvGenError::ManifestNotFound(manifest_path.to_path_buf()));
    }
    let content = fs_err::read_to_string(manifest_path)?;
    Ok(parse_groups(&content, section_markers))
}

/// Parse manifest text that has already been read into memory.
///
/// Sections are evaluated in the order `section_markers` lists them; a marker
/// with no matching line is skipped. An empty result is not an error, merging
/// nothing is a valid (if useless) request.
pub fn parse_groups(content: &str, section_markers: &[&str]) -> Vec<String> {
    let lines: Vec<String> = content
        .lines()
        .map(|raw| raw.replace('\t', " ").trim().to_string())
        .collect();

    let starts = section_starts(&lines, section_markers);
    let mut objects = Vec::new();
    for (i, &start) in starts.iter().enumerate() {
        let end = match starts.get(i + 1) {
            Some(&next) => next,
            None => final_section_end(&lines, start),
        };
        objects.extend(object_tokens(lines.get(start..end).unwrap_or(&[])));
    }

    if objects.is_empty() {
        log::warn!("dependency manifest lists no source files; merge list is empty");
    }

    objects.iter().map(|token| object_to_source(token)).collect()
}

/// Line index of each located section header, in marker order.
fn section_starts(lines: &[String], section_markers: &[&str]) -> Vec<usize> {
    section_markers
        .iter()
        .filter_map(|marker| lines.iter().position(|line| line.starts_with(marker)))
        .collect()
}

/// End (exclusive) of the section opened at `start` when no further section
/// header bounds it. Scans for a terminator line, giving up after
/// [`SECTION_LOOKAHEAD`] lines and cutting the section there.
fn final_section_end(lines: &[String], start: usize) -> usize {
    let window_end = (start + SECTION_LOOKAHEAD).min(lines.len());
    for idx in (start + 1)..window_end {
        if is_section_end(&lines[idx]) {
            return idx;
        }
    }
    window_end
}

fn is_section_end(line: &str) -> bool {
    line.is_empty() || is_comment(line) || VARIABLE_ASSIGNMENT.is_match(line)
}

fn is_comment(line: &str) -> bool {
    line.starts_with('#')
}

/// Object-file tokens of one section: continuations joined, the assignment's
/// right-hand side split on whitespace, and anything that is not a `.o` file
/// (make variables, flags) discarded.
fn object_tokens(block: &[String]) -> Vec<String> {
    let joined = block
        .iter()
        .filter(|line| !is_comment(line))
        .map(|line| line.replace('\\', ""))
        .collect::<Vec<_>>()
        .join(" ");
    let rhs = match joined.split_once('=') {
        Some((_, rhs)) => rhs,
        None => return Vec::new(),
    };
    rhs.split_whitespace()
        .filter(|token| token.ends_with(".o"))
        .map(|token| token.to_string())
        .collect()
}

/// Rewrite an object-file token to the source file it is compiled from.
fn object_to_source(token: &str) -> String {
    match token.strip_suffix(".o") {
        Some(stem) => format!("{}.f95", stem),
        None => token.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MARKERS: [&str; 2] = ["UTILS =", "PHYS ="];

    #[test]
    fn test_two_sections_in_marker_order() {
        let manifest = "\
# SUEWS build rules
FC = gfortran

UTILS = suews_ctrl_const.o suews_util_time.o

PHYS = suews_phys_snow.o
";
        let files = parse_groups(manifest, &MARKERS);
        assert_eq!(
            files,
            vec![
                "suews_ctrl_const.f95",
                "suews_util_time.f95",
                "suews_phys_snow.f95"
            ]
        );
    }

    #[test]
    fn test_backslash_continuations_joined() {
        let manifest = "\
UTILS = suews_ctrl_const.o \\
	suews_util_time.o \\
	suews_util_stringmod.o

PHYS = suews_phys_snow.o
";
        let files = parse_groups(manifest, &MARKERS);
        assert_eq!(
            files,
            vec![
                "suews_ctrl_const.f95",
                "suews_util_time.f95",
                "suews_util_stringmod.f95",
                "suews_phys_snow.f95"
            ]
        );
    }

    #[test]
    fn test_non_object_tokens_discarded() {
        let manifest = "UTILS = suews_ctrl_const.o $(EXTRA_MODS) -O2 notes.txt suews_util_time.o\n";
        let files = parse_groups(manifest, &["UTILS ="]);
        assert_eq!(files, vec!["suews_ctrl_const.f95", "suews_util_time.f95"]);
    }

    #[test]
    fn test_tabs_normalized_before_matching() {
        let manifest = "\tUTILS = suews_ctrl_const.o\n";
        let files = parse_groups(manifest, &["UTILS ="]);
        assert_eq!(files, vec!["suews_ctrl_const.f95"]);
    }

    #[test]
    fn test_comment_terminates_final_section_and_contributes_nothing() {
        let manifest = "\
UTILS = suews_ctrl_const.o \\
	suews_util_time.o
# PHYS objects below are not part of UTILS
	suews_phys_snow.o
";
        let files = parse_groups(manifest, &["UTILS ="]);
        assert_eq!(files, vec!["suews_ctrl_const.f95", "suews_util_time.f95"]);
    }

    #[test]
    fn test_variable_assignment_terminates_final_section() {
        let manifest = "\
UTILS = suews_ctrl_const.o
OTHERS = $(MODS)
	suews_util_time.o
";
        let files = parse_groups(manifest, &["UTILS ="]);
        assert_eq!(files, vec!["suews_ctrl_const.f95"]);
    }

    #[test]
    fn test_final_section_cut_at_lookahead_window() {
        let mut manifest = String::from("UTILS = u00.o \\\n");
        for i in 1..=12 {
            manifest.push_str(&format!("	u{:02}.o \\\n", i));
        }
        let files = parse_groups(&manifest, &["UTILS ="]);
        // Header plus nine continuation lines fit the window; the rest is cut.
        assert_eq!(files.len(), 10);
        assert_eq!(files.first().map(String::as_str), Some("u00.f95"));
        assert_eq!(files.last().map(String::as_str), Some("u09.f95"));
    }

    #[test]
    fn test_absent_marker_skipped() {
        let manifest = "PHYS = suews_phys_snow.o\n";
        let files = parse_groups(manifest, &MARKERS);
        assert_eq!(files, vec!["suews_phys_snow.f95"]);
    }

    #[test]
    fn test_no_sections_yields_empty_list() {
        let manifest = "FC = gfortran\nFFLAGS = -O2\n";
        assert!(parse_groups(manifest, &MARKERS).is_empty());
    }

    #[test]
    fn test_marker_must_start_the_line() {
        let manifest = "EXTRA_UTILS = other.o\nUTILS = suews_ctrl_const.o\n";
        let files = parse_groups(manifest, &["UTILS ="]);
        assert_eq!(files, vec!["suews_ctrl_const.f95"]);
    }

    #[test]
    fn test_canonical_marker_order() {
        assert_eq!(
            SourceGroup::canonical_markers(),
            vec!["UTILS =", "PHYS =", "DRIVER =", "TEST =", "WRF ="]
        );
    }

    #[test]
    fn test_read_groups_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let manifest_path = dir.path().join(MANIFEST_NAME);
        let mut file = std::fs::File::create(&manifest_path).unwrap();
        writeln!(file, "UTILS = suews_ctrl_const.o").unwrap();

        let files = read_groups(&manifest_path, &["UTILS ="]).unwrap();
        assert_eq!(files, vec!["suews_ctrl_const.f95"]);
    }

    #[test]
    fn test_missing_manifest_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let manifest_path = dir.path().join(MANIFEST_NAME);
        let err = read_groups(&manifest_path, &["UTILS ="]).unwrap_err();
        assert!(matches!(err, DrvGenError::ManifestNotFound(_)));
    }
}
