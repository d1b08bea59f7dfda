use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use core_types::Granularity;
use database::{connect, LedgerRepository};
use engine::DashboardEngine;
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

/// The main entry point for the ladder metrics dashboard.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from a .env file, if one is present.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = configuration::load_config()?;
    let db_pool = connect().await?;
    let engine = DashboardEngine::new(LedgerRepository::new(db_pool), &config);

    // Parse command-line arguments and execute the appropriate command.
    let cli = Cli::parse();
    match cli.command {
        Commands::Overview(args) => handle_overview(&engine, args).await?,
        Commands::Assets(args) => handle_assets(&engine, args).await?,
        Commands::Trend(args) => handle_trend(&engine, args).await?,
        Commands::Users(args) => handle_users(&engine, args).await?,
    }

    Ok(())
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Windowed financial and customer metrics over the savings ledger.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Platform-wide volumes, AUM and depositor cohorts for a window.
    Overview(WindowArgs),
    /// Per-asset-type metrics with revenue estimates.
    Assets(WindowArgs),
    /// Transaction volume trend bucketed by day, week or month.
    Trend(TrendArgs),
    /// Registration, KYC and segmentation views of the customer base.
    Users(WindowArgs),
}

#[derive(Parser)]
struct WindowArgs {
    /// Start of the reporting window (format: YYYY-MM-DD, default: launch).
    #[arg(long)]
    from: Option<NaiveDate>,

    /// End of the reporting window (format: YYYY-MM-DD, default: today).
    #[arg(long)]
    to: Option<NaiveDate>,
}

#[derive(Parser)]
struct TrendArgs {
    #[command(flatten)]
    window: WindowArgs,

    /// Bucket size: day, week or month.
    #[arg(long, default_value = "day")]
    granularity: Granularity,
}

// ==============================================================================
// Command Handlers
// ==============================================================================

/// Renders the general metrics report. The two categories load concurrently
/// and degrade independently: a failed category prints as its zeroed default
/// instead of taking the whole report down.
async fn handle_overview(engine: &DashboardEngine, args: WindowArgs) -> anyhow::Result<()> {
    let window = engine.window(args.from, args.to)?;
    println!("Overview for {} to {}", window.start(), window.end());

    let (general, counts) = tokio::join!(
        engine.general_metrics(&window),
        engine.user_counts(&window)
    );
    let general = general.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "general metrics unavailable, showing defaults");
        Default::default()
    });
    let counts = counts.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "user counts unavailable, showing defaults");
        Default::default()
    });

    if let Ok(Some(first)) = engine.first_transaction_date().await {
        println!("First recorded transaction: {first}");
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec!["Registered users".to_string(), counts.registered_users.to_string()]);
    table.add_row(vec!["KYC users".to_string(), counts.kyc_users.to_string()]);
    table.add_row(vec!["Asset types".to_string(), general.asset_type_count.to_string()]);
    table.add_row(vec!["Deposits".to_string(), general.deposit_count.to_string()]);
    table.add_row(vec!["Deposit value (GHS)".to_string(), money(general.deposit_value_ghs)]);
    table.add_row(vec!["Deposit value (USD)".to_string(), money(general.deposit_value_usd)]);
    table.add_row(vec!["Withdrawals".to_string(), general.withdrawal_count.to_string()]);
    table.add_row(vec!["Withdrawal value (GHS)".to_string(), money(general.withdrawal_value_ghs)]);
    table.add_row(vec!["Withdrawal value (USD)".to_string(), money(general.withdrawal_value_usd)]);
    table.add_row(vec!["AUM (GHS)".to_string(), money(general.aum_ghs)]);
    table.add_row(vec!["AUM (USD)".to_string(), money(general.aum_usd)]);
    table.add_row(vec!["Depositors".to_string(), general.total_depositors.to_string()]);
    table.add_row(vec!["Withdrawers".to_string(), general.total_withdrawers.to_string()]);
    table.add_row(vec!["New depositors".to_string(), general.new_depositors.to_string()]);
    table.add_row(vec!["Recurring depositors".to_string(), general.recurring_depositors.to_string()]);
    table.add_row(vec!["Avg deposit (GHS)".to_string(), money(general.avg_deposit_value_ghs)]);
    table.add_row(vec!["Avg withdrawal (GHS)".to_string(), money(general.avg_withdrawal_value_ghs)]);
    println!("{table}");
    Ok(())
}

async fn handle_assets(engine: &DashboardEngine, args: WindowArgs) -> anyhow::Result<()> {
    let window = engine.window(args.from, args.to)?;
    println!("Asset metrics for {} to {}", window.start(), window.end());

    let rows = engine.asset_metrics(&window).await?;
    if rows.is_empty() {
        println!("No qualifying transactions in this window.");
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        "Asset type",
        "Deposits",
        "Deposit GHS",
        "Deposit USD",
        "Withdrawals",
        "AUM GHS",
        "Depositors",
        "New",
        "Recurring",
        "Est. revenue",
        "Maint. fees GHS",
        "Early w/d fees USD",
    ]);
    for row in rows {
        table.add_row(vec![
            row.asset_type.clone(),
            row.deposit_count.to_string(),
            money(row.deposit_value_ghs),
            money(row.deposit_value_usd),
            row.withdrawal_count.to_string(),
            money(row.aum_ghs),
            row.total_depositors.to_string(),
            row.new_depositors.to_string(),
            row.recurring_depositors.to_string(),
            money(row.estimated_revenue),
            money(row.maintenance_fees_ghs),
            money(row.early_withdrawal_fees_usd),
        ]);
    }
    println!("{table}");
    Ok(())
}

async fn handle_trend(engine: &DashboardEngine, args: TrendArgs) -> anyhow::Result<()> {
    let window = engine.window(args.window.from, args.window.to)?;
    println!(
        "Volume trend ({}) for {} to {}",
        args.granularity.as_str(),
        window.start(),
        window.end()
    );

    let points = engine.trend(&window, args.granularity).await?;
    if points.is_empty() {
        println!("No qualifying transactions in this window.");
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Period", "Type", "Amount (GHS)"]);
    for point in points {
        table.add_row(vec![
            point.period.to_string(),
            point.effective_type.as_str().to_string(),
            money(point.total_amount),
        ]);
    }
    println!("{table}");
    Ok(())
}

async fn handle_users(engine: &DashboardEngine, args: WindowArgs) -> anyhow::Result<()> {
    let window = engine.window(args.from, args.to)?;
    println!("User metrics for {} to {}", window.start(), window.end());

    let (counts, by_type, insights) = tokio::join!(
        engine.user_counts(&window),
        engine.users_by_asset_type(&window),
        engine.user_insights(&window)
    );
    let counts = counts.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "user counts unavailable, showing defaults");
        Default::default()
    });
    let by_type = by_type.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "asset-type segmentation unavailable, showing defaults");
        Vec::new()
    });
    let insights = insights.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "user insights unavailable, showing defaults");
        Vec::new()
    });

    println!(
        "Registered: {}   KYC completed: {}",
        counts.registered_users, counts.kyc_users
    );

    if !by_type.is_empty() {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec!["Asset type", "Users"]);
        for row in &by_type {
            table.add_row(vec![row.asset_type.clone(), row.total_users.to_string()]);
        }
        println!("{table}");
    }

    if !insights.is_empty() {
        let active = insights.iter().filter(|i| i.is_active).count();
        let recent = insights.iter().filter(|i| i.is_recent).count();
        println!(
            "Signups in window: {} ({} active, {} recently active)",
            insights.len(),
            active,
            recent
        );

        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec![
            "Customer", "Gender", "Country", "Use", "Employment", "Signed up", "Active", "Recent",
        ]);
        for insight in &insights {
            table.add_row(vec![
                insight.customer_id.to_string(),
                insight.gender.clone().unwrap_or_default(),
                insight.country.clone().unwrap_or_default(),
                insight.use_option.clone().unwrap_or_default(),
                insight.employment_status.clone().unwrap_or_default(),
                insight.created_at.date_naive().to_string(),
                yes_no(insight.is_active),
                yes_no(insight.is_recent),
            ]);
        }
        println!("{table}");
    }

    Ok(())
}

fn money(amount: Decimal) -> String {
    amount.round_dp(2).to_string()
}

fn yes_no(flag: bool) -> String {
    let label = if flag { "yes" } else { "no" };
    label.to_string()
}
