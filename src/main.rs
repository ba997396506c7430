// Reward Points - Command Line
// Points for single amounts, customer listings and per-customer reports
// over a JSON or CSV fixture.

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use reward_points::{
    format_date, is_known_month, last_n_months, load_data, paginate, sort_chronologically,
    Fixture, RewardsConfig, RewardsEngine, TracingSink,
};
use rust_decimal::Decimal;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "rewards", version, about = "Reward points calculator")]
struct Cli {
    /// JSON config file (rate schedule, page sizes, default period)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Fixture with customers and transactions (.json or .csv)
    #[arg(long, global = true, env = "REWARDS_FIXTURE")]
    fixture: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Points earned by a single purchase amount
    Points { amount: Decimal },

    /// Customers with their total points
    Customers {
        #[arg(long, default_value_t = 1)]
        page: usize,
    },

    /// Monthly rewards, statistics and transactions for one customer
    Report {
        customer_id: String,

        #[arg(long)]
        month: Option<String>,

        #[arg(long)]
        year: Option<i32>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        #[arg(long, default_value_t = 1)]
        page: usize,
    },

    /// The most recent months, oldest first
    Months {
        #[arg(long, default_value_t = 3)]
        count: u32,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => RewardsConfig::from_file(path)?,
        None => RewardsConfig::default(),
    }
    .apply_env();
    if let Some(path) = &cli.fixture {
        config.fixture_path = path.clone();
    }

    match cli.command {
        Command::Points { amount } => run_points(&config, amount),
        Command::Customers { page } => run_customers(&config, page),
        Command::Report {
            customer_id,
            month,
            year,
            json,
            page,
        } => run_report(&config, &customer_id, month, year, json, page),
        Command::Months { count } => {
            for period in last_n_months(count, Local::now().date_naive()) {
                println!("{:<10} {}  ({})", period.month, period.year, period.key);
            }
            Ok(())
        }
    }
}

fn load(config: &RewardsConfig) -> Result<Fixture> {
    let fixture = load_data(&config.fixture_path)?;
    info!(
        path = ?config.fixture_path,
        customers = fixture.customers.len(),
        transactions = fixture.transactions.len(),
        "fixture loaded"
    );
    Ok(fixture)
}

fn run_points(config: &RewardsConfig, amount: Decimal) -> Result<()> {
    let engine = RewardsEngine::with_sink(config.schedule.clone(), TracingSink);
    let points = engine.calculate_rewards(amount);
    let tier = config.schedule.tier_for(amount);

    println!("💰 ${} → {} points ({:?})", amount, points, tier);
    Ok(())
}

fn run_customers(config: &RewardsConfig, page: usize) -> Result<()> {
    let fixture = load(config)?;
    let summaries = fixture.customers_with_points(&config.schedule);
    let page = paginate(&summaries, page, config.customers_per_page);

    println!("👥 Customers (page {} of {})", page.current_page, page.total_pages);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    for customer in &page.items {
        println!(
            "{:<8} {:<24} {:>10} pts  {:>3} transactions",
            customer.id, customer.name, customer.total_points, customer.transaction_count
        );
    }
    println!(
        "\nShowing {}-{} of {}",
        page.start_index, page.end_index, page.total_items
    );
    Ok(())
}

fn run_report(
    config: &RewardsConfig,
    customer_id: &str,
    month: Option<String>,
    year: Option<i32>,
    json: bool,
    page: usize,
) -> Result<()> {
    let fixture = load(config)?;
    let customer = fixture
        .customer(customer_id)
        .with_context(|| format!("Unknown customer: {}", customer_id))?;

    let period = match (month, year) {
        (None, None) => None,
        (month, year) => {
            let month = month.unwrap_or_else(|| config.default_month.clone());
            if !is_known_month(&month) {
                bail!("Unknown month: {:?}", month);
            }
            Some((month, year.unwrap_or(config.default_year)))
        }
    };

    let engine = RewardsEngine::with_sink(config.schedule.clone(), TracingSink);
    let transactions = fixture.transactions_for(customer_id);
    let mut report = engine.report(
        &transactions,
        period.as_ref().map(|(month, year)| (month.as_str(), *year)),
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    sort_chronologically(&mut report.rewards_by_month);

    println!("🏆 Rewards for {} ({})", customer.name, customer.id);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Total points: {}", report.total_rewards);

    println!("\n📅 By month:");
    for bucket in &report.rewards_by_month {
        println!(
            "  {:<16} {:>10} pts  {:>3} transactions",
            bucket.month_label, bucket.total_points, bucket.transaction_count
        );
    }

    let stats = &report.statistics;
    println!("\n📊 Points per transaction:");
    println!(
        "  min {}  max {}  average {}  over {} transactions",
        stats.min, stats.max, stats.average, stats.count
    );

    let heading = match &period {
        Some((month, year)) => format!("{} {}", month, year),
        None => "all time".to_string(),
    };
    let page = paginate(&report.filtered_rewards, page, config.transactions_per_page);
    println!(
        "\n🧾 Transactions, {} (page {} of {}):",
        heading, page.current_page, page.total_pages
    );
    for rewarded in &page.items {
        let tx = &rewarded.transaction;
        let amount = tx
            .amount
            .map(|a| format!("${}", a))
            .unwrap_or_else(|| "invalid".to_string());
        println!(
            "  {:<8} {:<20} {:>10} {:>8} pts",
            tx.id,
            format_date(&tx.date),
            amount,
            rewarded.points
        );
    }
    println!(
        "  {} of {} transactions in period",
        page.items.len(),
        report.filtered_transaction_count
    );
    Ok(())
}
