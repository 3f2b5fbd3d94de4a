//! # Excel Lab CLI (`lab`)
//!
//! Browses the course, inspects the reference PDF and retriever, runs labs,
//! and starts the HTTP server.
//!
//! ## Usage
//!
//! ```bash
//! lab --config ./config/lab.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `lab serve` | Start the HTTP server |
//! | `lab pages` | Show the loaded reference pages |
//! | `lab retrieve "<query>"` | Print the reference text a query retrieves |
//! | `lab catalog` | Print the course outline |
//! | `lab theory <module> <n>` | Print a theory view |
//! | `lab lab <module> <n> --context "..."` | Run a lab |
//!
//! ## Examples
//!
//! ```bash
//! # Which pages would a question pull in, and why?
//! lab retrieve "clean messy dates" --explain
//!
//! # See the exact prompt without calling the model
//! lab lab cleaning 1 --context "Names have extra spaces" --dry-run
//!
//! # Run it for real (needs API_KEY)
//! API_KEY=... lab lab cleaning 1 --context "Names have extra spaces"
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use excel_lab::{catalog, config, extract, lab, llm, search, server};

/// Excel Lab CLI: an AI-assisted Excel & data analysis course.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/lab.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "lab",
    about = "Excel & Data Analysis AI Power Suite: PDF-grounded theory and interactive prompt labs",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/lab.toml`. A missing file means defaults.
    #[arg(long, global = true, default_value = "./config/lab.toml")]
    config: PathBuf,

    /// Log at debug level (overridden by `RUST_LOG`).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server.
    ///
    /// Binds to `[server].bind` (or `LAB_BIND`).
    Serve,

    /// Show the loaded reference pages.
    Pages {
        /// Print one page (1-based) in full.
        #[arg(long)]
        page: Option<usize>,
    },

    /// Print the reference text retrieved for a query.
    Retrieve {
        /// Query text.
        query: String,

        /// Maximum pages to include.
        #[arg(long)]
        max_pages: Option<usize>,

        /// Character budget.
        #[arg(long)]
        max_chars: Option<usize>,

        /// Print the page ranking before the text.
        #[arg(long)]
        explain: bool,
    },

    /// Print the course outline.
    Catalog,

    /// Print a theory section.
    Theory {
        /// Module key (foundations, formulas, cleaning, advanced).
        module: String,
        /// Section number, 1-3.
        section: usize,
    },

    /// Run a lab.
    Lab {
        /// Module key (foundations, formulas, cleaning, advanced).
        module: String,
        /// Section number, 1-3.
        section: usize,

        /// The learner's input.
        #[arg(long)]
        context: String,

        /// Task control selections as `key=value` pairs.
        #[arg(long = "select", value_parser = parse_key_val)]
        selections: Vec<(String, String)>,

        /// Print the assembled prompt instead of calling the model.
        #[arg(long)]
        dry_run: bool,
    },
}

/// Parse a `key=value` pair for `--select` arguments.
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let pos = s
        .find('=')
        .ok_or_else(|| format!("invalid KEY=VALUE: no '=' found in '{}'", s))?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Commands that don't need the document
    if let Commands::Catalog = cli.command {
        catalog::run_catalog();
        return Ok(());
    }

    let cfg = config::load_config(&cli.config)?;
    let pages = Arc::new(
        extract::load_pages(&cfg.document.path)
            .with_context(|| format!("Failed to load {}", cfg.document.path.display()))?,
    );

    match cli.command {
        Commands::Catalog => unreachable!(),
        Commands::Pages { page } => {
            search::run_pages(&cfg.document.path, &pages, page)?;
        }
        Commands::Retrieve {
            query,
            max_pages,
            max_chars,
            explain,
        } => {
            let mut params = cfg.retrieval.params();
            if let Some(n) = max_pages {
                params.max_pages = n;
            }
            if let Some(n) = max_chars {
                params.max_chars = n;
            }
            search::run_retrieve(&pages, &params, &query, explain)?;
        }
        Commands::Theory { module, section } => {
            catalog::run_theory(&module, section, &pages)?;
        }
        Commands::Lab {
            module,
            section,
            context,
            selections,
            dry_run,
        } => {
            let client = llm::create_client(&cfg.llm)?;
            let runner = lab::LabRunner::new(pages, client, cfg.retrieval.params());
            lab::run_lab_command(&runner, &module, section, &context, selections, dry_run).await?;
        }
        Commands::Serve => {
            let client = llm::create_client(&cfg.llm)?;
            let runner = Arc::new(lab::LabRunner::new(
                pages.clone(),
                client,
                cfg.retrieval.params(),
            ));
            server::run_server(&cfg, pages, runner).await?;
        }
    }

    Ok(())
}
