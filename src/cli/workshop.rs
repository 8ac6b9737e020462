//! Interactive workshop - guided discovery session in the terminal
//!
//! The full flow: resume or start a session, analyze uploaded documents,
//! review low-confidence extracted answers, walk the remaining gaps in
//! priority order, then export the snapshot and report.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use colored::Colorize;
use console::Term;
use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use indicatif::{ProgressBar, ProgressStyle};

use crate::analyze::{AnalyzeOptions, AnalysisReport, DocumentAnalyzer};
use crate::catalog::{Catalog, Priority, Question};
use crate::cli::WorkshopArgs;
use crate::collab::{FsDocumentStore, HttpOracle, KeywordIndex, PlainExtractor};
use crate::config::Config;
use crate::report;
use crate::session::{Workshop, WorkshopOptions};
use crate::snapshot::SnapshotStore;
use crate::validate::{Finding, Severity};

/// Snapshot store rooted at the configured (or default) session directory
pub fn snapshot_store(config: &Config) -> SnapshotStore {
    match config.session_dir() {
        Some(dir) => SnapshotStore::with_dir(dir),
        None => SnapshotStore::new(),
    }
}

/// Build the session manager with the auto-checkpoint hook wired to the
/// snapshot store.
pub fn build_workshop(config: &Config) -> Workshop {
    let catalog = Arc::new(Catalog::builtin());
    let options = WorkshopOptions {
        confidence_threshold: config.workshop.confidence_threshold,
        auto_save_interval: config.workshop.auto_save_interval,
    };
    let store = snapshot_store(config);

    Workshop::new(catalog, options).with_checkpoint_hook(Box::new(move |catalog, session| {
        let snapshot = crate::snapshot::export_session(catalog, session);
        store.save(&snapshot)?;
        Ok(())
    }))
}

/// Build the document analyzer from config. Fails with the missing
/// settings named when the analysis collaborators are not configured.
pub fn build_analyzer(
    config: &Config,
    docs_override: Option<&PathBuf>,
    no_search: bool,
) -> Result<DocumentAnalyzer> {
    let mut effective = config.clone();
    if let Some(docs) = docs_override {
        effective.documents.root = Some(docs.clone());
    }
    effective.validate_for_analysis()?;

    let root = effective
        .documents
        .root
        .context("documents.root missing after validation")?;
    let endpoint = effective
        .oracle
        .endpoint
        .context("oracle.endpoint missing after validation")?;

    let oracle = HttpOracle::new(endpoint, effective.oracle.model)
        .with_api_key(effective.oracle.api_key)
        .with_timeout(Duration::from_secs(effective.oracle.timeout_secs))
        .with_sampling(effective.oracle.temperature, effective.oracle.max_tokens);

    Ok(DocumentAnalyzer::new(
        Arc::new(FsDocumentStore::new(root)),
        Arc::new(PlainExtractor::new()),
        Arc::new(KeywordIndex::new()),
        Arc::new(oracle),
        AnalyzeOptions {
            use_search_index: !no_search && effective.workshop.use_search_index,
            search_top_k: effective.workshop.search_top_k,
            ..Default::default()
        },
    ))
}

enum AskOutcome {
    Answered,
    Skipped,
    Quit,
}

/// Run the interactive discovery workshop.
pub async fn run_workshop(config: &Config, args: &WorkshopArgs) -> Result<()> {
    let term = Term::stdout();
    term.clear_screen().ok();
    print_banner();

    let workshop = build_workshop(config);
    let store = snapshot_store(config);

    // Resume or start
    let has_previous = store.find_latest().ok().flatten().is_some();
    let session_id = if args.fresh || !has_previous {
        workshop.start(args.session.clone())
    } else if args.resume || confirm("Resume the previous session?", true)? {
        workshop.resume(&store)
    } else {
        workshop.start(args.session.clone())
    };
    println!("Session: {}\n", session_id.bright_cyan());

    // Document analysis
    if !args.skip_analysis {
        let analyzer = build_analyzer(config, args.docs.as_ref(), false)?;
        let report = run_analysis_step(&analyzer, &workshop).await;
        if let Some(report) = report {
            print_analysis_report(&report);
        }
    }

    // Review parked low-confidence answers
    let mut quit = review_pending(&workshop)?;

    // Walk the gaps, most urgent first
    if !quit {
        for priority in Priority::ALL {
            if quit {
                break;
            }
            let missing = workshop.missing_questions(Some(priority));
            if missing.is_empty() {
                continue;
            }
            println!(
                "\n{} {} questions remaining\n",
                missing.len().to_string().bright_yellow(),
                priority.to_string().to_uppercase().bright_yellow()
            );

            for question in missing {
                match ask_question(&workshop, &question)? {
                    AskOutcome::Quit => {
                        quit = true;
                        break;
                    }
                    AskOutcome::Answered | AskOutcome::Skipped => {}
                }
            }
        }
    }

    // Final snapshot + report
    let snapshot = workshop.snapshot()?;
    let path = store.save(&snapshot)?;
    println!("\nSnapshot saved: {}", path.display().to_string().green());

    if let Some(report_path) = &args.report {
        report::write_markdown(&snapshot, report_path)?;
        println!("Report written: {}", report_path.display().to_string().green());
    }

    print_summary(&workshop)?;
    println!("\n{}\n", "Thanks for using LZ Workshop!".bright_cyan());
    Ok(())
}

fn print_banner() {
    let banner = r#"
╔══════════════════════════════════════════════════════════════════════╗
║  LZ WORKSHOP - Cloud Landing Zone Discovery                          ║
║                                                                      ║
║  1. Document analysis   2. Review extracted answers                  ║
║  3. Guided Q&A          4. Discovery report                          ║
║                                                                      ║
║  At any prompt: ?help ?progress ?skip ?quit                          ║
╚══════════════════════════════════════════════════════════════════════╝
"#;
    println!("{}", banner.bright_cyan());
}

async fn run_analysis_step(
    analyzer: &DocumentAnalyzer,
    workshop: &Workshop,
) -> Option<AnalysisReport> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("Analyzing uploaded documents...");
    spinner.enable_steady_tick(Duration::from_millis(120));

    let result = analyzer.run(workshop).await;
    spinner.finish_and_clear();

    match result {
        Ok(report) => Some(report),
        Err(e) => {
            // A failed pass is recoverable: the Q&A can still run
            println!("{} {e:#}", "Document analysis failed:".yellow());
            None
        }
    }
}

fn print_analysis_report(report: &AnalysisReport) {
    println!(
        "Analyzed {} documents ({} unreadable): {} answers accepted, {} for review, {} errors",
        report.documents_processed.to_string().bright_white(),
        report.documents_failed,
        report.answers_accepted.to_string().green(),
        report.cached_for_review.to_string().yellow(),
        report.questions_errored,
    );
    if !report.used_search {
        println!("{}", "Search index unavailable - scanned document text directly".dimmed());
    }
}

/// Walk the pending-review cache: accept promotes, reject discards and
/// immediately asks for a fresh answer. Returns true if the user quit.
fn review_pending(workshop: &Workshop) -> Result<bool> {
    let pending = workshop.pending_review();
    if pending.is_empty() {
        return Ok(false);
    }

    println!(
        "\n{} extracted answers need review\n",
        pending.len().to_string().bright_yellow()
    );

    for candidate in pending {
        let question = match workshop.catalog().get(&candidate.question_id) {
            Ok(q) => q.clone(),
            Err(_) => continue,
        };

        println!("{}", question.prompt.bright_white());
        println!(
            "  extracted: {} {}",
            candidate.answer.cyan(),
            format!("({:.0}% confidence)", candidate.confidence * 100.0).dimmed()
        );
        if let Some(doc) = &candidate.document_reference {
            println!("  {}", format!("from {doc}").dimmed());
        }

        if confirm("Accept this answer?", false)? {
            workshop.accept_pending(&candidate.question_id)?;
        } else {
            workshop.reject_pending(&candidate.question_id)?;
            match ask_question(workshop, &question)? {
                AskOutcome::Quit => return Ok(true),
                _ => {}
            }
        }
        println!();
    }

    Ok(false)
}

fn ask_question(workshop: &Workshop, question: &Question) -> Result<AskOutcome> {
    println!(
        "{} {}",
        format!("[{}]", question.category).dimmed(),
        format!("({})", question.priority).dimmed()
    );
    println!("{}", question.prompt.bright_white());
    if let Some(help) = &question.help {
        println!("  {}", help.dimmed());
    }
    if !question.examples.is_empty() {
        println!("  {}", format!("e.g. {}", question.examples.join(" | ")).dimmed());
    }

    loop {
        let input: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("Your answer")
            .allow_empty(true)
            .interact_text()?;
        let input = input.trim().to_string();

        match input.as_str() {
            "" | "?skip" => return Ok(AskOutcome::Skipped),
            "?quit" => return Ok(AskOutcome::Quit),
            "?help" => {
                println!(
                    "  {}",
                    "?skip skip this question, ?progress show progress, ?quit finish up".dimmed()
                );
            }
            "?progress" => print_summary(workshop)?,
            _ => {
                let (_, findings) = workshop.record_user_answer(&question.id, &input)?;
                print_findings(&findings);
                return Ok(AskOutcome::Answered);
            }
        }
    }
}

pub fn print_findings(findings: &[Finding]) {
    for finding in findings {
        let line = match finding.severity {
            Severity::Success => format!("  ✓ {}", finding.message).green().to_string(),
            Severity::Info => format!("  ℹ {}", finding.message).cyan().to_string(),
            Severity::Warning => format!("  ⚠ {}", finding.message).yellow().to_string(),
            Severity::Error => format!("  ✗ {}", finding.message).red().to_string(),
        };
        println!("{line}");
        if let Some(recommendation) = &finding.recommendation {
            println!("    {}", recommendation.dimmed());
        }
    }
}

pub fn print_summary(workshop: &Workshop) -> Result<()> {
    let summary = workshop.summarize()?;

    println!("\n{}", "Discovery Progress".bright_white().underline());
    println!(
        "  {}/{} answered ({:.1}%)",
        summary.answered, summary.total_questions, summary.completion_percentage
    );
    println!(
        "  critical: {}/{} ({:.0}%)",
        summary.critical_answered, summary.critical_total, summary.critical_percentage
    );
    for category in &summary.by_category {
        let bar = progress_cell(category.percentage);
        println!(
            "  {bar} {:>3.0}%  {} ({}/{})",
            category.percentage, category.category, category.answered, category.total
        );
    }
    Ok(())
}

fn progress_cell(percentage: f64) -> String {
    let filled = (percentage / 10.0).round() as usize;
    let bar = format!("{}{}", "█".repeat(filled), "░".repeat(10 - filled.min(10)));
    if percentage >= 100.0 {
        bar.green().to_string()
    } else if percentage > 0.0 {
        bar.yellow().to_string()
    } else {
        bar.dimmed().to_string()
    }
}

fn confirm(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}
