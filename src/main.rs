use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use finance_manager::cli::{
    handle_budget_command, handle_report_command, handle_transaction_command, BudgetCommands,
    ReportCommands, TransactionCommands,
};
use finance_manager::config::{FinancePaths, Settings};
use finance_manager::ledger::Ledger;
use finance_manager::storage::Storage;

#[derive(Parser)]
#[command(
    name = "finance",
    version,
    about = "Personal finance tracker for income, expenses and budgets",
    long_about = "Records income and expense transactions, tracks budgets per \
                  category and produces totals, category, monthly and budget \
                  reports from the command line."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Transaction management commands
    #[command(subcommand, alias = "txn")]
    Transaction(TransactionCommands),

    /// Budget management commands
    #[command(subcommand)]
    Budget(BudgetCommands),

    /// Reports over the recorded transactions
    #[command(subcommand)]
    Report(ReportCommands),

    /// Create the data directory and default settings
    Init,

    /// Show current configuration and paths
    Config,
}

fn init_tracing() {
    let fmt_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let paths = FinancePaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    let command = match cli.command {
        Some(command) => command,
        None => {
            println!("finance - income, expense and budget tracking");
            println!();
            println!("Run 'finance --help' for usage information.");
            return Ok(());
        }
    };

    match command {
        Commands::Init => {
            println!("Initializing finance data at: {}", paths.base_dir().display());
            let storage = Storage::new(&paths)?;
            settings.save(&paths)?;

            let (ledger, _) = Ledger::open(&storage)?;
            ledger.save(&storage)?;
            println!("Initialization complete!");
        }
        Commands::Config => {
            println!("Finance Manager Configuration");
            println!("=============================");
            println!("Base directory:    {}", paths.base_dir().display());
            println!("Settings file:     {}", paths.settings_file().display());
            println!("Transactions file: {}", paths.transactions_file().display());
            println!("Budgets file:      {}", paths.budgets_file().display());
            println!("Chart file:        {}", paths.chart_file().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol: {}", settings.currency_symbol);
            println!("  Chart width:     {}", settings.chart_width);
        }
        command => {
            let storage = Storage::new(&paths)?;
            let (mut ledger, summary) = Ledger::open(&storage)?;

            if summary.skipped_count() > 0 {
                eprintln!(
                    "Warning: skipped {} malformed row(s) in {}; they are kept in the file until corrected",
                    summary.skipped_count(),
                    storage.transactions_path().display()
                );
                for row in &summary.skipped_rows {
                    eprintln!("  line {}: {}", row.line, row.reason);
                }
            }

            match command {
                Commands::Transaction(cmd) => {
                    handle_transaction_command(&mut ledger, &storage, &settings, cmd)?
                }
                Commands::Budget(cmd) => {
                    handle_budget_command(&mut ledger, &storage, &settings, cmd)?
                }
                Commands::Report(cmd) => {
                    handle_report_command(&ledger, &settings, &paths.chart_file(), cmd)?
                }
                Commands::Init | Commands::Config => {}
            }
        }
    }

    Ok(())
}
