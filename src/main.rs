use analyzer::{AnalysisRequest, AnalysisResult, Analyzer};
use anyhow::Context;
use clap::{Parser, Subcommand};
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};
use configuration::{Config, Delimiter};
use core_types::RiskLevel;
use risk::PlanGoalResolver;
use rust_decimal::Decimal;
use std::path::PathBuf;

/// The main entry point for the operations analyst.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file, if there is one.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => configuration::load_config_from(path),
        None => configuration::load_config(),
    }
    .context("Failed to load configuration")?;
    let _log_guard = configuration::init_tracing(&config.logging)?;

    // Execute the appropriate command
    match cli.command {
        Commands::Analyze(args) => handle_analyze(args, &config).await,
        Commands::Plans => handle_plans(&config),
        Commands::Serve(args) => handle_serve(args, config).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Evaluates funded-account traders from their brokerage operations export.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file to use instead of ./config.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyse an operations export and print the verdict.
    Analyze(AnalyzeArgs),
    /// Print the plan goal table with each tier's daily limits.
    Plans,
    /// Start the HTTP API.
    Serve(ServeArgs),
}

#[derive(Parser)]
struct AnalyzeArgs {
    /// The operations export to analyse.
    #[arg(long)]
    file: PathBuf,

    /// Internal id of the client the export belongs to.
    #[arg(long)]
    client_id: String,

    /// Profit goal in currency units.
    #[arg(long, conflicts_with = "plan", required_unless_present = "plan")]
    goal: Option<Decimal>,

    /// Plan whose goal applies (e.g. "50K"); unknown plans use the default goal.
    #[arg(long)]
    plan: Option<String>,

    /// Field separator of the export; detected from the header row by default.
    #[arg(long, value_enum)]
    delimiter: Option<Delimiter>,

    /// Print the full result as JSON instead of tables.
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct ServeArgs {
    /// Port to listen on, overriding the configuration.
    #[arg(long)]
    port: Option<u16>,
}

// ==============================================================================
// Command Logic
// ==============================================================================

async fn handle_analyze(args: AnalyzeArgs, config: &Config) -> anyhow::Result<()> {
    let goal = match (args.goal, &args.plan) {
        (Some(goal), _) => goal,
        (None, Some(plan)) => {
            let plans = PlanGoalResolver::new(&config.plans, &config.risk_policy)?;
            plans.resolve(plan).goal.value()
        }
        (None, None) => anyhow::bail!("either --goal or --plan is required"),
    };

    let file = std::fs::read(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    let clients = web_server::client_repository(config).await?;
    let mut analyzer = Analyzer::new(config, clients)?;
    if let Some(delimiter) = args.delimiter {
        analyzer = analyzer.with_delimiter(delimiter);
    }

    let result = analyzer
        .analyze(AnalysisRequest {
            file,
            client_id: args.client_id,
            goal,
        })
        .await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_report(&result);
    }
    Ok(())
}

fn handle_plans(config: &Config) -> anyhow::Result<()> {
    let plans = PlanGoalResolver::new(&config.plans, &config.risk_policy)?;

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Plan",
        "Category",
        "Goal",
        "Daily attention limit",
        "Daily elimination limit",
    ]);
    for plan in plans.summaries() {
        table.add_row(vec![
            Cell::new(&plan.id),
            Cell::new(plan.category),
            Cell::new(money(plan.goal)),
            Cell::new(money(plan.daily_attention_limit)),
            Cell::new(money(plan.daily_elimination_limit)),
        ]);
    }
    println!("{table}");
    println!("Unknown plans use the default goal of {}.", money(plans.default_goal().value()));
    Ok(())
}

async fn handle_serve(args: ServeArgs, mut config: Config) -> anyhow::Result<()> {
    if let Some(port) = args.port {
        config.server.port = port;
    }
    web_server::run_server(config).await
}

// ==============================================================================
// Report Rendering
// ==============================================================================

fn print_report(result: &AnalysisResult) {
    let client = &result.client;
    println!("Client:   {} ({})", client.name, client.id);
    println!("CPF:      {}", client.cpf);
    println!("Plan:     {} on {}", client.plan, client.platform);
    println!();

    let mut days = Table::new();
    days.load_preset(UTF8_FULL).set_header(vec![
        "Date", "Ops", "Result", "Costs", "Net", "% of goal", "Risk",
    ]);
    for day in &result.metrics.daily_results {
        let color = match day.risk_level {
            RiskLevel::Safe => Color::Green,
            RiskLevel::Warning => Color::Yellow,
            RiskLevel::Violation => Color::Red,
        };
        days.add_row(vec![
            Cell::new(day.date),
            Cell::new(day.operations),
            Cell::new(money(day.result)),
            Cell::new(money(day.costs)),
            Cell::new(money(day.net_result)),
            Cell::new(format!("{}%", day.percent_of_goal.round_dp(2))),
            Cell::new(day.risk_level).fg(color),
        ]);
    }
    println!("{days}");

    let metrics = &result.metrics;
    let validation = &result.validation;
    let mut summary = Table::new();
    summary.load_preset(UTF8_FULL).set_header(vec!["Criterion", "Value", "Passed"]);
    summary.add_row(vec![
        Cell::new("Days operated"),
        Cell::new(metrics.days_operated),
        passed(validation.minimum_days),
    ]);
    summary.add_row(vec![
        Cell::new("Net result vs goal"),
        Cell::new(format!(
            "{} / {}",
            money(metrics.total_net_result),
            money(metrics.goal_amount)
        )),
        passed(validation.total_goal_reached),
    ]);
    summary.add_row(vec![
        Cell::new("Daily limit"),
        Cell::new(format!(
            "{} violation(s), {} warning(s)",
            result.violations.len(),
            result.warnings.len()
        )),
        passed(validation.daily_limit_respected),
    ]);
    println!("{summary}");

    println!(
        "Gross {} - costs {} = net {}",
        money(metrics.total_result),
        money(metrics.total_costs),
        money(metrics.total_net_result)
    );
    if result.ingestion.rows_skipped > 0 {
        println!(
            "{} of {} rows were skipped:",
            result.ingestion.rows_skipped, result.ingestion.rows_read
        );
        for row in &result.ingestion.skipped {
            println!("  line {}: {}", row.line, row.reason);
        }
    }
    println!(
        "Verdict: {}",
        if validation.approved { "APPROVED" } else { "REJECTED" }
    );
}

fn passed(ok: bool) -> Cell {
    if ok {
        Cell::new("yes").fg(Color::Green)
    } else {
        Cell::new("no").fg(Color::Red)
    }
}

fn money(value: Decimal) -> String {
    format!("R$ {}", value.round_dp(2))
}
