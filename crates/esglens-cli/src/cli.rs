//! CLI argument definitions for esglens.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `capabilities` | Describe the server and its registered tools |
//! | `call` | Execute a registered tool by name |
//! | `seed` | Seed the six-company starter catalog |
//! | `companies list` | List companies with optional filters |
//! | `companies add` | Add a company to the dataset |
//!
//! # Examples
//!
//! ```bash
//! # Inspect the tool surface
//! esglens capabilities --pretty
//!
//! # Execute a tool with parameters
//! esglens call analyze_company -p symbol=TSLA
//!
//! # List low-risk companies
//! esglens companies list --risk Low
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// ESG-aware investment data service.
///
/// Exposes the company dataset through named tools with uniform JSON
/// envelopes, plus direct dataset inspection commands.
#[derive(Debug, Parser)]
#[command(
    name = "esglens",
    author,
    version,
    about = "ESG-aware investment data service"
)]
pub struct Cli {
    /// Path to the DuckDB database file.
    ///
    /// Defaults to `$ESGLENS_HOME/esglens.duckdb`, falling back to
    /// `$HOME/.esglens/esglens.duckdb`.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Describe the server and its registered tools.
    Capabilities,
    /// Execute a registered tool by name.
    Call(CallArgs),
    /// Seed the six-company starter catalog (skipped when data exists).
    Seed,
    /// Inspect and manage the company dataset.
    #[command(subcommand)]
    Companies(CompaniesCommand),
}

#[derive(Debug, Args)]
pub struct CallArgs {
    /// Tool name, e.g. get_companies or analyze_company.
    pub tool: String,

    /// Tool parameter as KEY=VALUE; repeatable.
    ///
    /// Values that parse as numbers are passed as numbers.
    #[arg(short = 'p', long = "param", value_name = "KEY=VALUE")]
    pub params: Vec<String>,
}

#[derive(Debug, Subcommand)]
pub enum CompaniesCommand {
    /// List companies with optional filters.
    List(ListArgs),
    /// Add a company to the dataset.
    Add(AddArgs),
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Case-insensitive industry filter.
    #[arg(long)]
    pub industry: Option<String>,

    /// Case-insensitive risk level filter.
    #[arg(long)]
    pub risk: Option<String>,

    /// Case-insensitive country filter.
    #[arg(long)]
    pub country: Option<String>,

    /// Keep companies with an ESG score at or above this value.
    #[arg(long)]
    pub min_esg: Option<f64>,
}

#[derive(Debug, Args)]
pub struct AddArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub symbol: String,

    #[arg(long)]
    pub industry: String,

    #[arg(long)]
    pub sector: String,

    #[arg(long)]
    pub country: String,

    /// Risk level: Low, Medium, High.
    #[arg(long)]
    pub risk_level: String,

    #[arg(long)]
    pub market_cap: f64,

    #[arg(long)]
    pub revenue: f64,

    /// ESG score in [0, 100].
    #[arg(long)]
    pub esg_score: f64,
}
