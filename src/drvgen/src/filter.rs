// wrfsuewsrs-drvgen/src/filter.rs

//! Line filter for cpp-style `#ifdef` guards in the SUEWS sources.
//!
//! The merged driver is compiled with neither of the standalone-build symbols
//! defined, so for a filtered condition the `#ifdef` branch is discarded and
//! the `#else` branch, when present, is what survives. Directive lines
//! themselves are never emitted. Guards do not nest in the SUEWS sources and
//! nesting is not supported here.

/// Verdict on a single line offered to a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineAction {
    /// The line is outside this filter's guarded blocks; pass it on.
    Keep,
    /// The line is a directive or sits in a discarded branch; drop it.
    Drop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GuardState {
    Normal,
    InBlock,
    InElseBlock,
}

/// Single-level `#ifdef` filter for one preprocessor condition.
///
/// Feed every line of a file through [`offer`](Self::offer) in order; the
/// filter tracks whether the line falls inside `#ifdef <condition>` ...
/// `#else` ... `#endif` and answers with the action to take. Directives for
/// other conditions are left alone, on the understanding that guards never
/// nest.
#[derive(Debug)]
pub struct ConditionFilter {
    opener: String,
    state: GuardState,
}

impl ConditionFilter {
    pub fn new(condition: &str) -> Self {
        Self {
            opener: format!("#ifdef {}", condition),
            state: GuardState::Normal,
        }
    }

    /// Offer one line to the filter, advancing its state.
    pub fn offer(&mut self, line: &str) -> LineAction {
        let trimmed = line.trim_start();
        match self.state {
            GuardState::Normal => {
                if trimmed.starts_with(&self.opener) {
                    self.state = GuardState::InBlock;
                    LineAction::Drop
                } else {
                    LineAction::Keep
                }
            }
            GuardState::InBlock => {
                if trimmed.starts_with("#else") {
                    self.state = GuardState::InElseBlock;
                } else if trimmed.starts_with("#endif") {
                    self.state = GuardState::Normal;
                }
                LineAction::Drop
            }
            GuardState::InElseBlock => {
                if trimmed.starts_with("#endif") {
                    self.state = GuardState::Normal;
                    LineAction::Drop
                } else {
                    LineAction::Keep
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filtered(condition: &str, input: &str) -> Vec<String> {
        let mut filter = ConditionFilter::new(condition);
        input
            .lines()
            .filter(|line| filter.offer(line) == LineAction::Keep)
            .map(|line| line.to_string())
            .collect()
    }

    #[test]
    fn test_unguarded_lines_pass_through() {
        let input = "MODULE snow\nIMPLICIT NONE\nEND MODULE snow";
        assert_eq!(filtered("wrf", input), input.lines().collect::<Vec<_>>());
    }

    #[test]
    fn test_if_branch_dropped_without_else() {
        let input = "\
before
#ifdef wrf
USE module_wrf_error
#endif
after";
        assert_eq!(filtered("wrf", input), vec!["before", "after"]);
    }

    #[test]
    fn test_else_branch_survives() {
        let input = "\
#ifdef nc
CALL write_netcdf(state)
#else
CALL write_text(state)
#endif";
        assert_eq!(filtered("nc", input), vec!["CALL write_text(state)"]);
    }

    #[test]
    fn test_directive_lines_never_emitted() {
        let input = "#ifdef wrf\nx\n#else\ny\n#endif";
        let kept = filtered("wrf", input);
        assert!(kept.iter().all(|line| !line.trim_start().starts_with('#')));
    }

    #[test]
    fn test_indented_directives_recognized() {
        let input = "  #ifdef wrf\n  guarded\n  #endif\nkept";
        assert_eq!(filtered("wrf", input), vec!["kept"]);
    }

    #[test]
    fn test_foreign_condition_left_alone() {
        let input = "#ifdef nc\nnetcdf only\n#endif";
        let kept = filtered("wrf", input);
        assert_eq!(kept, vec!["#ifdef nc", "netcdf only", "#endif"]);
    }

    #[test]
    fn test_stray_endif_passes_through() {
        let input = "x\n#endif\ny";
        assert_eq!(filtered("wrf", input), vec!["x", "#endif", "y"]);
    }

    #[test]
    fn test_sequential_blocks_tracked_independently() {
        let input = "\
#ifdef wrf
a
#else
b
#endif
middle
#ifdef wrf
c
#endif
tail";
        assert_eq!(filtered("wrf", input), vec!["b", "middle", "tail"]);
    }
}
