// wrfsuewsrs/src/workdir.rs

//! Naming of the date-stamped compilation directory.

use chrono::Local;
use std::path::PathBuf;

/// Prefix of coupling build directories, one per day.
pub const WORKDIR_PREFIX: &str = "compilation-";

/// Today's working directory, `compilation-YYYYMMDD`, relative to the
/// current directory. Reruns on the same day land in the same place.
pub fn default_working_dir() -> PathBuf {
    PathBuf::from(format!("{}{}", WORKDIR_PREFIX, Local::now().format("%Y%m%d")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_working_dir_is_date_stamped() {
        let dir = default_working_dir();
        let name = dir.to_string_lossy().into_owned();
        let stamp = name.strip_prefix(WORKDIR_PREFIX).expect("prefix");
        assert_eq!(stamp.len(), 8);
        assert!(stamp.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_same_day_calls_agree() {
        assert_eq!(default_working_dir(), default_working_dir());
    }
}
