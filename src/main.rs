use anyhow::{bail, Context};
use chrono::{Local, Months, NaiveDate};
use clap::Parser;
use dotenv::dotenv;
use serde_json::json;
use std::sync::Arc;

use alphaflow::fund::analysts::{self, PortfolioManagerNode, RiskManagementNode};
use alphaflow::fund::graph::GraphBuilder;
use alphaflow::fund::portfolio::Portfolio;
use alphaflow::fund::run::{FundRunner, RunRequest};
use alphaflow::llm::{get_model_info, Provider};

#[derive(Parser, Debug)]
#[command(author, version, about = "Run the multi-analyst trading workflow", long_about = None)]
struct Args {
    /// Comma-separated list of stock ticker symbols
    #[arg(long)]
    ticker: String,

    /// Start date (YYYY-MM-DD). Defaults to 3 months before end date
    #[arg(long)]
    start_date: Option<String>,

    /// End date (YYYY-MM-DD). Defaults to today
    #[arg(long)]
    end_date: Option<String>,

    /// Initial cash position
    #[arg(long, default_value_t = 10000.0)]
    initial_cash: f64,

    /// Initial margin requirement
    #[arg(long, default_value_t = 0.0)]
    margin_requirement: f64,

    /// Show reasoning from each analyst
    #[arg(long)]
    show_reasoning: bool,

    /// Comma-separated list of analyst identifiers. Defaults to all
    #[arg(long)]
    analysts: Option<String>,

    /// Model to use (e.g. gpt-4o, claude-3-5-sonnet-latest)
    #[arg(long, default_value = "gpt-4o")]
    model: String,
}

fn parse_date(value: &str, label: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("{} must be in YYYY-MM-DD format", label))
}

fn split_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();

    let tickers = split_csv(&args.ticker);
    if tickers.is_empty() {
        bail!("at least one ticker is required");
    }

    let end_date = match &args.end_date {
        Some(value) => parse_date(value, "End date")?,
        None => Local::now().date_naive(),
    };
    let start_date = match &args.start_date {
        Some(value) => parse_date(value, "Start date")?,
        None => end_date
            .checked_sub_months(Months::new(3))
            .unwrap_or(end_date),
    };

    let registry = analysts::default_registry();
    let selected = match &args.analysts {
        Some(value) => split_csv(value),
        None => registry.ids().to_vec(),
    };

    // Unknown models proceed with an Unknown provider label; the client
    // layer falls back to name-prefix inference at call time
    let provider = match get_model_info(&args.model) {
        Some(info) => {
            log::info!("Selected {} model: {}", info.provider, args.model);
            info.provider
        }
        None => {
            log::warn!("Unknown model {}, proceeding anyway", args.model);
            Provider::Unknown
        }
    };

    let portfolio = Portfolio::new(args.initial_cash, args.margin_requirement, &tickers);

    let builder = GraphBuilder::new(
        registry,
        Arc::new(RiskManagementNode),
        Arc::new(PortfolioManagerNode),
    );
    let runner = FundRunner::new(builder);

    // Ctrl-C cancels the in-flight run instead of killing it mid-merge
    let cancel = runner.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("interrupt received, cancelling run");
            cancel.cancel();
        }
    });

    let outcome = runner
        .run(RunRequest {
            tickers,
            start_date,
            end_date,
            portfolio,
            show_reasoning: args.show_reasoning,
            selected_analysts: selected,
            model_name: args.model.clone(),
            model_provider: provider.as_str().to_string(),
        })
        .await?;

    for warning in &outcome.warnings {
        log::warn!("analyst {} failed: {}", warning.node, warning.error);
    }

    println!(
        "{}",
        serde_json::to_string_pretty(&json!({
            "decisions": outcome.decisions,
            "analyst_signals": outcome.analyst_signals,
        }))?
    );

    Ok(())
}
