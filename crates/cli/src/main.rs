use anyhow::{Context, Result};
use canteen_catalog::{KnowledgeBase, MenuItemSnapshot};
use canteen_engine::{build_strategy, StrategyKind};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

mod http_api;

#[derive(Parser)]
#[command(name = "canteen")]
#[command(about = "Cart recommendations for the canteen ordering system", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for JSON)
    #[arg(long, global = true)]
    quiet: bool,

    /// Knowledge base JSON file (defaults to the bundled pairing table)
    #[arg(long, global = true)]
    knowledge: Option<PathBuf>,

    /// Retrieval strategy
    #[arg(long, global = true, value_enum, default_value_t = StrategyArg::RuleBased)]
    strategy: StrategyArg,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StrategyArg {
    /// Curated pairings with category/popularity fallbacks
    RuleBased,
    /// Rule-based results topped up by embedding similarity
    Hybrid,
}

impl From<StrategyArg> for StrategyKind {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::RuleBased => StrategyKind::RuleBased,
            StrategyArg::Hybrid => StrategyKind::Hybrid,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the recommendation HTTP API
    Serve(ServeArgs),

    /// One-shot recommendations for a cart against a menu snapshot file
    Recommend(RecommendArgs),

    /// Show the curated association data for an item
    Info(InfoArgs),
}

#[derive(Args)]
struct ServeArgs {
    /// Bind address
    #[arg(long, default_value = "127.0.0.1:8080")]
    bind: String,

    /// Menu snapshot JSON file
    #[arg(long)]
    menu: PathBuf,
}

#[derive(Args)]
struct RecommendArgs {
    /// Menu snapshot JSON file
    #[arg(long)]
    menu: PathBuf,

    /// Cart item name (repeatable)
    #[arg(long = "cart", required = true)]
    cart: Vec<String>,

    /// Maximum number of recommendations
    #[arg(long, default_value_t = 5)]
    limit: usize,
}

#[derive(Args)]
struct InfoArgs {
    /// Item name (case-insensitive)
    item: String,
}

fn print_stdout(text: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

fn load_menu(path: &Path) -> Result<Vec<MenuItemSnapshot>> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read menu snapshot {path:?}"))?;
    serde_json::from_str(&data).with_context(|| format!("malformed menu snapshot {path:?}"))
}

/// Knowledge loading is fail-soft; only the choice of source lives here.
fn load_knowledge(path: Option<&Path>) -> KnowledgeBase {
    match path {
        Some(path) => KnowledgeBase::load(path),
        None => KnowledgeBase::builtin(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .target(env_logger::Target::Stderr)
        .init();

    let knowledge = load_knowledge(cli.knowledge.as_deref());
    let knowledge_items = knowledge.len();
    let strategy = build_strategy(cli.strategy.into(), knowledge);

    match cli.command {
        Commands::Serve(args) => {
            let menu = load_menu(&args.menu)?;
            log::info!(
                "Loaded {} menu rows, {} knowledge entries",
                menu.len(),
                knowledge_items
            );
            let state = Arc::new(http_api::AppState {
                strategy,
                menu,
                knowledge_items,
            });
            http_api::serve(&args.bind, state).await
        }
        Commands::Recommend(args) => {
            let menu = load_menu(&args.menu)?;
            let recs = strategy.recommend(&args.cart, &menu, args.limit);
            print_stdout(&serde_json::to_string_pretty(&recs)?)
        }
        Commands::Info(args) => match strategy.association_info(&args.item) {
            Some(info) => print_stdout(&serde_json::to_string_pretty(&info)?),
            None => {
                print_stdout(&format!("No association data for '{}'", args.item))?;
                std::process::exit(1);
            }
        },
    }
}
