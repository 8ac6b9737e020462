//! Discovery report rendering
//!
//! Turns a session snapshot into a markdown report for stakeholders. The
//! snapshot is self-contained, so rendering needs no catalog access.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};

use crate::snapshot::Snapshot;

/// Render a snapshot as a markdown discovery report.
pub fn render_markdown(snapshot: &Snapshot) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "# Landing Zone Discovery Report\n");
    let _ = writeln!(out, "- **Session**: `{}`", snapshot.session.id);
    let _ = writeln!(
        out,
        "- **Created**: {}",
        snapshot.session.created_at.format("%Y-%m-%d %H:%M UTC")
    );
    let _ = writeln!(
        out,
        "- **Completion**: {:.1}%\n",
        snapshot.session.completion
    );

    if let Some(summary) = &snapshot.summary {
        let _ = writeln!(out, "## Summary\n");
        let _ = writeln!(
            out,
            "{} of {} questions answered ({} documents analyzed).",
            summary.answered, summary.total_questions, summary.documents_analyzed
        );
        let _ = writeln!(
            out,
            "Critical questions: {}/{} ({:.0}%).\n",
            summary.critical_answered, summary.critical_total, summary.critical_percentage
        );

        if !summary.answers_by_source.is_empty() {
            let _ = writeln!(out, "| Source | Answers |");
            let _ = writeln!(out, "|--------|---------|");
            for (source, count) in &summary.answers_by_source {
                let _ = writeln!(out, "| {source} | {count} |");
            }
            let _ = writeln!(out);
        }

        let _ = writeln!(out, "## Completion by Category\n");
        let _ = writeln!(out, "| Category | Answered | Total | % |");
        let _ = writeln!(out, "|----------|----------|-------|---|");
        for category in &summary.by_category {
            let _ = writeln!(
                out,
                "| {} | {} | {} | {:.0}% |",
                category.category, category.answered, category.total, category.percentage
            );
        }
        let _ = writeln!(out);
    }

    // Answers grouped by category, categories alphabetical
    let mut grouped: BTreeMap<&str, Vec<&crate::snapshot::SnapshotAnswer>> = BTreeMap::new();
    for answer in &snapshot.answers {
        grouped.entry(answer.category.as_str()).or_default().push(answer);
    }

    if !grouped.is_empty() {
        let _ = writeln!(out, "## Answers\n");
        for (category, answers) in grouped {
            let heading = if category.is_empty() {
                "Uncategorized"
            } else {
                category
            };
            let _ = writeln!(out, "### {heading}\n");
            for answer in answers {
                let _ = writeln!(out, "**{}** ({})", answer.question, answer.question_id);
                let _ = writeln!(out, "> {}", answer.answer);
                let mut provenance = format!(
                    "source: {}, confidence: {:.0}%",
                    answer.source,
                    answer.confidence * 100.0
                );
                if let Some(doc) = &answer.document_reference {
                    let _ = write!(provenance, ", from: {doc}");
                }
                let _ = writeln!(out, "_{provenance}_\n");
            }
        }
    }

    let critical_missing: Vec<_> = snapshot
        .missing_information
        .iter()
        .filter(|m| m.priority == "critical")
        .collect();
    if !critical_missing.is_empty() {
        let _ = writeln!(out, "## Missing Critical Information\n");
        for missing in critical_missing {
            let _ = writeln!(out, "- **{}** ({})", missing.question, missing.question_id);
            if let Some(help) = &missing.help {
                let _ = writeln!(out, "  - {help}");
            }
        }
        let _ = writeln!(out);
    }

    out
}

/// Render and write a markdown report.
pub fn write_markdown(snapshot: &Snapshot, path: &Path) -> Result<()> {
    std::fs::write(path, render_markdown(snapshot))
        .with_context(|| format!("Failed to write report: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, Category, Priority, Question};
    use crate::session::{Answer, AnswerSource, Session};
    use crate::snapshot::export_session;

    fn snapshot() -> Snapshot {
        let catalog = Catalog::new(vec![
            Question::new("q1", Category::NetworkDesign, Priority::Critical, "IP ranges?"),
            Question::new("q2", Category::CostBudgeting, Priority::Critical, "Budget?"),
        ]);
        let mut session = Session::new("report-test");
        session.record(
            Answer::extracted(
                "q1",
                "10.0.0.0/16",
                AnswerSource::Document,
                0.9,
                Some("network.pdf".to_string()),
            ),
            catalog.len(),
        );
        export_session(&catalog, &session)
    }

    #[test]
    fn test_report_contains_answers_and_gaps() {
        let report = render_markdown(&snapshot());
        assert!(report.contains("# Landing Zone Discovery Report"));
        assert!(report.contains("10.0.0.0/16"));
        assert!(report.contains("network.pdf"));
        // The unanswered critical question shows up in the gaps section
        assert!(report.contains("Missing Critical Information"));
        assert!(report.contains("Budget?"));
    }

    #[test]
    fn test_report_without_summary_still_renders() {
        let mut snap = snapshot();
        snap.summary = None;
        let report = render_markdown(&snap);
        assert!(report.contains("## Answers"));
        assert!(!report.contains("## Summary"));
    }
}
