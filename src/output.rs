//! CLI output formatting for convert and check results.
//!
//! Report lines go to stdout; diagnostics go through tracing to stderr.

use std::path::Path;

use cookie_checker_core::pipeline::CheckedSet;
use cookie_checker_core::store::MergeKind;
use cookie_checker_core::{CheckSummary, ConvertReport, Outcome};

fn merge_label(kind: MergeKind) -> &'static str {
    match kind {
        MergeKind::Created => "created",
        MergeKind::Appended => "appended",
    }
}

/// Lines describing a convert run: one per file, then a summary.
pub fn convert_lines(report: &ConvertReport, store_dir: &Path) -> Vec<String> {
    let mut lines = Vec::with_capacity(report.total() + 1);
    for converted in &report.converted {
        lines.push(format!(
            "[converted] {} ({}, {} record(s), {})",
            converted.key,
            converted.format,
            converted.records,
            merge_label(converted.merge)
        ));
    }
    for (name, error) in &report.failures {
        lines.push(format!("[failed] {name}: {error}"));
    }
    lines.push(format!(
        "Converted {}/{} file(s) into {}",
        report.converted_count(),
        report.total(),
        store_dir.display()
    ));
    lines
}

fn checked_line(key: &str, checked: &CheckedSet) -> String {
    match (checked.outcome, &checked.working_file) {
        (Outcome::Live(tier), Some(path)) => {
            format!("[live] {key}: {tier} -> {}", path.display())
        }
        (Outcome::Live(tier), None) => format!("[live] {key}: {tier}"),
        (Outcome::Invalid, _) => format!("[invalid] {key}"),
        (Outcome::Unreachable, _) => format!("[unreachable] {key}"),
    }
}

/// Lines describing a check run: one per set, a summary, then live counts
/// per tier.
pub fn check_lines(summary: &CheckSummary) -> Vec<String> {
    let mut lines = Vec::with_capacity(summary.total() + 6);
    for result in summary.results() {
        match &result.result {
            Ok(checked) => lines.push(checked_line(&result.key, checked)),
            Err(error) => lines.push(format!("[failed] {}: {error}", result.key)),
        }
    }
    lines.push(format!(
        "Checked {} cookie set(s): {} live, {} invalid, {} unreachable, {} failed",
        summary.total(),
        summary.live(),
        summary.invalid(),
        summary.unreachable(),
        summary.errored()
    ));
    for (tier, count) in summary.by_tier() {
        lines.push(format!("  {tier}: {count}"));
    }
    lines
}

/// Prints `lines` to stdout unless `quiet`.
pub fn emit(lines: &[String], quiet: bool) {
    if quiet {
        return;
    }
    for line in lines {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use cookie_checker_core::Tier;
    use cookie_checker_core::cookies::CookieFormat;
    use cookie_checker_core::pipeline::{ConvertedFile, PipelineError};

    use super::*;

    #[test]
    fn test_convert_lines_lists_files_and_summary() {
        let report = ConvertReport {
            converted: vec![ConvertedFile {
                key: "alice.txt".to_string(),
                format: CookieFormat::LegacyTabular,
                records: 3,
                merge: MergeKind::Created,
            }],
            failures: vec![(
                "bob.json".to_string(),
                PipelineError::MissingSet {
                    key: "bob.json".to_string(),
                },
            )],
        };

        let lines = convert_lines(&report, Path::new("store"));
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("[converted] alice.txt"));
        assert!(lines[0].contains("3 record(s)"));
        assert!(lines[0].contains("created"));
        assert!(lines[1].starts_with("[failed] bob.json"));
        assert_eq!(lines[2], "Converted 1/2 file(s) into store");
    }

    #[test]
    fn test_checked_line_live_names_tier_and_file() {
        let checked = CheckedSet {
            outcome: Outcome::Live(Tier::PremiumFamily),
            working_file: Some(PathBuf::from("working/a_Premium_Family")),
        };
        assert_eq!(
            checked_line("a", &checked),
            "[live] a: Premium Family -> working/a_Premium_Family"
        );
    }

    #[test]
    fn test_checked_line_invalid_and_unreachable() {
        let invalid = CheckedSet {
            outcome: Outcome::Invalid,
            working_file: None,
        };
        let unreachable = CheckedSet {
            outcome: Outcome::Unreachable,
            working_file: None,
        };
        assert_eq!(checked_line("k", &invalid), "[invalid] k");
        assert_eq!(checked_line("k", &unreachable), "[unreachable] k");
    }

    #[test]
    fn test_check_lines_empty_summary() {
        let lines = check_lines(&CheckSummary::default());
        assert_eq!(
            lines,
            vec!["Checked 0 cookie set(s): 0 live, 0 invalid, 0 unreachable, 0 failed".to_string()]
        );
    }
}
