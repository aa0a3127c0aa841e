use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use canteen_change_core::{
    Difficulty, EngineConfig, JsonFileStore, Navigator, NoEnricher, Product, SavingsGoal,
    SharedNavigator,
};

mod repl;
mod sink;

#[derive(Parser)]
#[command(name = "canteen-change")]
#[command(about = "Canteen change game - practice giving the right change")]
#[command(version)]
struct Cli {
    /// Save file (created on first save)
    #[arg(short, long, global = true, default_value = "canteen-save.json")]
    save: PathBuf,

    /// Engine config as JSON (defaults are used when omitted)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Starting difficulty: easy, medium or hard
    #[arg(short, long, global = true)]
    difficulty: Option<Difficulty>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play interactively, one command per line
    Play,

    /// Print the canteen menu with payments for every difficulty
    Menu,

    /// Print saved progress
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    let mut config = match &cli.config {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(difficulty) = cli.difficulty {
        config.difficulty = difficulty;
    }

    let mut navigator = Navigator::new(config, JsonFileStore::new(&cli.save))
        .context("invalid engine config")?;
    navigator.load();

    match cli.command {
        Some(Commands::Menu) => print_menu(),
        Some(Commands::Status) => print_status(&navigator),
        Some(Commands::Play) | None => {
            let shared = SharedNavigator::new(navigator, Arc::new(NoEnricher));
            repl::run(shared).await?;
        }
    }

    Ok(())
}

fn print_menu() {
    println!("{:<12} {:<18} {:>5}  easy medium hard", "item", "", "price");
    for product in Product::menu() {
        let paid: Vec<String> = Difficulty::ALL
            .iter()
            .map(|d| format!("{:>4}", d.amount_paid_for(product.price)))
            .collect();
        println!(
            "{:<12} {:<18} {:>5}  {}",
            product.name,
            product.english_name,
            product.price,
            paid.join("   ")
        );
    }
}

fn print_status(navigator: &Navigator) {
    let ledger = navigator.ledger();
    let analytics = navigator.analytics();
    println!("budget:          {}/{}", ledger.budget(), ledger.starting_budget());
    println!("purchases:       {}", ledger.purchases().len());
    println!("games played:    {}", navigator.games_played());
    println!(
        "lifetime:        {}/{} correct ({:.0}%)",
        analytics.total_correct(),
        analytics.total_attempts(),
        analytics.lifetime_accuracy() * 100.0
    );
    println!("change given:    {} coins", analytics.total_correct_change_saved());
    println!(
        "achievements:    {}/{}",
        navigator.achievements().unlocked_count(),
        navigator.achievements().len()
    );
    for achievement in navigator.achievements().iter() {
        let mark = if achievement.unlocked { "x" } else { " " };
        println!("  [{}] {} - {}", mark, achievement.title, achievement.subtitle);
    }
    let coins_per_session = ledger.coins_saved().max(1);
    println!("goals at {} coins per session:", coins_per_session);
    for goal in SavingsGoal::ALL {
        println!(
            "  {:<10} {:>4} coins  {} sessions",
            goal.id,
            goal.cost,
            goal.sessions_needed(coins_per_session)
        );
    }
}
