//! CLI module - Command line interface definitions and handlers

pub mod workshop;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::catalog::{Category, Priority};

/// LZ Workshop - interactive cloud landing zone discovery
///
/// Analyzes uploaded documents for answers to the discovery framework,
/// guides you through the remaining gaps, and exports a discovery report.
#[derive(Parser, Debug)]
#[command(name = "lz-workshop")]
#[command(version)]
#[command(about = "Interactive cloud landing zone discovery workshop", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Use a specific config file instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the interactive discovery workshop (default)
    Workshop(WorkshopArgs),

    /// Analyze documents without the interactive Q&A
    Analyze(AnalyzeArgs),

    /// Show unanswered questions from the latest session
    Gaps(GapsArgs),

    /// Show a progress summary of the latest session
    Summary,

    /// List the discovery question catalog
    Questions(QuestionsArgs),

    /// Record a single answer against the latest session
    Answer(AnswerArgs),

    /// Export the latest session as JSON or a markdown report
    Export(ExportArgs),

    /// Import a session snapshot and make it the latest session
    Import(ImportArgs),

    /// Show or initialize the configuration file
    Config(ConfigArgs),
}

#[derive(Debug, Clone, Default, Parser)]
pub struct WorkshopArgs {
    /// Session id to start with (default: generated)
    #[arg(long)]
    pub session: Option<String>,

    /// Resume the latest session without asking
    #[arg(long, short)]
    pub resume: bool,

    /// Always start a fresh session
    #[arg(long, conflicts_with = "resume")]
    pub fresh: bool,

    /// Skip the document analysis step
    #[arg(long)]
    pub skip_analysis: bool,

    /// Document directory (overrides config)
    #[arg(long, short)]
    pub docs: Option<PathBuf>,

    /// Write the final markdown report here
    #[arg(long)]
    pub report: Option<PathBuf>,
}

#[derive(Debug, Clone, Parser)]
pub struct AnalyzeArgs {
    /// Document directory (overrides config)
    #[arg(long, short)]
    pub docs: Option<PathBuf>,

    /// Skip the search index and scan extracted text directly
    #[arg(long)]
    pub no_search: bool,

    /// Resume the latest session instead of starting fresh
    #[arg(long, short)]
    pub resume: bool,

    /// Session id for a fresh session (default: generated)
    #[arg(long)]
    pub session: Option<String>,
}

#[derive(Debug, Clone, Parser)]
pub struct GapsArgs {
    /// Only show questions at this priority
    #[arg(long, short, value_enum)]
    pub priority: Option<PriorityArg>,
}

#[derive(Debug, Clone, Parser)]
pub struct QuestionsArgs {
    /// Filter by category
    #[arg(long, short, value_enum)]
    pub category: Option<CategoryArg>,

    /// Filter by priority
    #[arg(long, short, value_enum)]
    pub priority: Option<PriorityArg>,
}

#[derive(Debug, Clone, Parser)]
pub struct AnswerArgs {
    /// Question id (e.g. net_001)
    pub id: String,

    /// Answer text
    #[arg(required = true)]
    pub text: Vec<String>,
}

#[derive(Debug, Clone, Parser)]
pub struct ExportArgs {
    /// Output file path
    pub output: PathBuf,

    /// Export format
    #[arg(long, short, value_enum, default_value = "json")]
    pub format: ExportFormat,
}

#[derive(Debug, Clone, Parser)]
pub struct ImportArgs {
    /// Snapshot file to import
    pub input: PathBuf,
}

#[derive(Debug, Clone, Parser)]
pub struct ConfigArgs {
    /// Write a commented sample config if none exists
    #[arg(long)]
    pub init: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    Json,
    Markdown,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PriorityArg {
    Critical,
    High,
    Medium,
    Low,
}

impl From<PriorityArg> for Priority {
    fn from(arg: PriorityArg) -> Self {
        match arg {
            PriorityArg::Critical => Priority::Critical,
            PriorityArg::High => Priority::High,
            PriorityArg::Medium => Priority::Medium,
            PriorityArg::Low => Priority::Low,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CategoryArg {
    BusinessContext,
    NetworkDesign,
    SecurityIdentity,
    Governance,
    Compliance,
    Operations,
    WorkloadPlanning,
    CostBudgeting,
    Integration,
    DisasterRecovery,
}

impl From<CategoryArg> for Category {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::BusinessContext => Category::BusinessContext,
            CategoryArg::NetworkDesign => Category::NetworkDesign,
            CategoryArg::SecurityIdentity => Category::SecurityIdentity,
            CategoryArg::Governance => Category::Governance,
            CategoryArg::Compliance => Category::Compliance,
            CategoryArg::Operations => Category::Operations,
            CategoryArg::WorkloadPlanning => Category::WorkloadPlanning,
            CategoryArg::CostBudgeting => Category::CostBudgeting,
            CategoryArg::Integration => Category::Integration,
            CategoryArg::DisasterRecovery => Category::DisasterRecovery,
        }
    }
}
