//! Property-based tests for the status parser
//!
//! Random git output must never panic the parser, and well-formed lines must
//! come back unchanged and in order.

use gitview::repository::{parse_name_only, parse_name_status};
use gitview::FileStatus;
use proptest::prelude::*;

/// Path without newlines; tabs and spaces are allowed
fn path_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_./ \t-]{1,40}"
}

fn code_strategy() -> impl Strategy<Value = char> {
    prop::sample::select(vec!['A', 'M', 'D', 'C', 'R', 'U', 'T', 'N', 'B', 'X', 'Z'])
}

proptest! {
    #[test]
    fn test_parser_doesnt_panic_on_random_input(s in "\\PC*") {
        let _ = parse_name_status(&s);
        let _ = parse_name_only(&s);
    }

    #[test]
    fn test_well_formed_lines_round_trip(
        lines in prop::collection::vec((code_strategy(), path_strategy()), 0..30)
    ) {
        let raw: String = lines
            .iter()
            .map(|(code, path)| format!("{}\t{}\n", code, path))
            .collect();

        let records = parse_name_status(&raw);
        prop_assert_eq!(records.len(), lines.len());
        for (record, (code, path)) in records.iter().zip(&lines) {
            prop_assert_eq!(record.path(), path.as_str());
            prop_assert_eq!(record.status(), FileStatus::from_code(*code));
        }
    }

    #[test]
    fn test_lines_without_tab_are_skipped(
        garbage in prop::collection::vec("[A-Z][a-zA-Z0-9]{0,20}", 0..20)
    ) {
        let raw = garbage.join("\n");
        prop_assert!(parse_name_status(&raw).is_empty());
    }

    #[test]
    fn test_name_only_counts_non_empty_lines(
        paths in prop::collection::vec("[a-zA-Z0-9_./-]{0,30}", 0..30)
    ) {
        let raw = paths.join("\n");
        let expected = paths.iter().filter(|p| !p.is_empty()).count();
        let records = parse_name_only(&raw);
        prop_assert_eq!(records.len(), expected);
        prop_assert!(records.iter().all(|r| r.status() == FileStatus::Untracked));
    }
}
