//! LZ Workshop - interactive cloud landing zone discovery
//!
//! Analyzes uploaded documents for answers to the discovery framework,
//! guides the operator through remaining gaps with validated Q&A, and
//! exports a durable session snapshot plus a discovery report.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use lz_workshop::catalog::Catalog;
use lz_workshop::cli::{self, Cli, Commands, ExportFormat, WorkshopArgs};
use lz_workshop::cli::workshop::{build_analyzer, build_workshop, print_findings, print_summary, snapshot_store};
use lz_workshop::config::{self, Config};
use lz_workshop::report;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let directive = if cli.verbose {
        "lz_workshop=debug"
    } else {
        "lz_workshop=info"
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).compact())
        .with(EnvFilter::from_default_env().add_directive(directive.parse()?))
        .init();

    let config = match &cli.config {
        Some(path) => {
            let mut config = Config::load_from(path)?;
            config.apply_env();
            config
        }
        None => Config::load(),
    };

    match cli.command {
        Some(Commands::Workshop(args)) => {
            cli::workshop::run_workshop(&config, &args).await?;
        }
        Some(Commands::Analyze(args)) => {
            // Missing analysis settings are fatal here, named one by one
            let analyzer = build_analyzer(&config, args.docs.as_ref(), args.no_search)?;

            let workshop = build_workshop(&config);
            let store = snapshot_store(&config);
            if args.resume {
                workshop.resume(&store);
            } else {
                workshop.start(args.session.clone());
            }

            let report = analyzer.run(&workshop).await?;
            println!(
                "Analysis: {} accepted, {} cached for review, {} errors ({} documents, {} unreadable)",
                report.answers_accepted,
                report.cached_for_review,
                report.questions_errored,
                report.documents_processed,
                report.documents_failed,
            );

            let snapshot = workshop.snapshot()?;
            let path = store.save(&snapshot)?;
            println!("Snapshot saved: {}", path.display());
        }
        Some(Commands::Gaps(args)) => {
            let workshop = build_workshop(&config);
            workshop.resume(&snapshot_store(&config));

            let missing = workshop.missing_questions(args.priority.map(Into::into));
            if missing.is_empty() {
                println!("No gaps - everything in scope is answered.");
            } else {
                for question in missing {
                    println!(
                        "{:<10} [{:<8}] {}",
                        question.id, question.priority, question.prompt
                    );
                }
            }
        }
        Some(Commands::Summary) => {
            let workshop = build_workshop(&config);
            workshop.resume(&snapshot_store(&config));
            print_summary(&workshop)?;
        }
        Some(Commands::Questions(args)) => {
            let catalog = Catalog::builtin();
            let category = args.category.map(Into::into);
            let priority = args.priority.map(Into::into);

            for question in catalog.iter() {
                if category.is_some_and(|c| question.category != c) {
                    continue;
                }
                if priority.is_some_and(|p| question.priority != p) {
                    continue;
                }
                println!(
                    "{:<10} [{:<8}] {} - {}",
                    question.id, question.priority, question.category, question.prompt
                );
            }
        }
        Some(Commands::Answer(args)) => {
            let workshop = build_workshop(&config);
            let store = snapshot_store(&config);
            workshop.resume(&store);

            let text = args.text.join(" ");
            let (answer, findings) = workshop.record_user_answer(&args.id, &text)?;
            println!("Recorded answer for {}: {}", answer.question_id, answer.answer);
            print_findings(&findings);

            let snapshot = workshop.snapshot()?;
            store.save(&snapshot)?;
            println!("Completion: {:.1}%", snapshot.session.completion);
        }
        Some(Commands::Export(args)) => {
            let workshop = build_workshop(&config);
            workshop.resume(&snapshot_store(&config));
            let snapshot = workshop.snapshot()?;

            match args.format {
                ExportFormat::Json => {
                    let json = serde_json::to_string_pretty(&snapshot)?;
                    std::fs::write(&args.output, json)?;
                }
                ExportFormat::Markdown => {
                    report::write_markdown(&snapshot, &args.output)?;
                }
            }
            println!("Exported to {}", args.output.display());
        }
        Some(Commands::Import(args)) => {
            let store = snapshot_store(&config);
            let loaded = store.load(&args.input)?;

            let workshop = build_workshop(&config);
            let dropped = workshop.import_snapshot(&loaded);

            let snapshot = workshop.snapshot()?;
            let path = store.save(&snapshot)?;
            println!(
                "Imported {} answers ({} dropped for unknown question ids)",
                snapshot.answers.len(),
                dropped
            );
            println!("Now the latest session: {}", path.display());
        }
        Some(Commands::Config(args)) => {
            let path = cli.config.clone().unwrap_or_else(Config::default_path);
            if args.init && !path.exists() {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(&path, config::generate_sample_config())?;
                println!("Wrote sample config: {}", path.display());
            } else {
                println!(
                    "Config path: {} ({})",
                    path.display(),
                    if path.exists() { "exists" } else { "not found" }
                );
            }
        }
        None => {
            // Bare invocation drops into the interactive workshop
            cli::workshop::run_workshop(&config, &WorkshopArgs::default()).await?;
        }
    }

    Ok(())
}
