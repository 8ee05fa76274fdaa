//! CLI commands for reports
//!
//! Terminal output by default; `--output` writes CSV (or the chart) to a file.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use clap::Subcommand;

use crate::chart::{export_chart_file, TextBarChart};
use crate::config::Settings;
use crate::error::{FinanceError, FinanceResult};
use crate::ledger::Ledger;
use crate::models::TransactionKind;
use crate::reports::{export_history_csv, format_history, ReportEngine};

/// Report subcommands
#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Total income, total expenses and net
    Totals,

    /// Amounts per category
    Categories {
        /// Which kind of transaction to break down
        #[arg(short, long, default_value = "expense")]
        kind: String,

        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Income and expenses per month
    Monthly {
        /// Show the twelve months of one year instead of every active month
        #[arg(short, long)]
        year: Option<i32>,

        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Allocated vs spent for each budget
    #[command(alias = "budget")]
    Budgets,

    /// Write the category spending chart
    Chart {
        /// Chart file (defaults to category_spending.txt in the data directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Handle report commands
pub fn handle_report_command(
    ledger: &Ledger,
    settings: &Settings,
    default_chart_path: &Path,
    cmd: ReportCommands,
) -> FinanceResult<()> {
    let engine = ReportEngine::new(ledger);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        ReportCommands::Totals => {
            print!("{}", engine.total_income_expense().format_terminal(symbol));
        }

        ReportCommands::Categories { kind, output } => {
            let kind: TransactionKind = kind.parse()?;
            let report = engine.category_breakdown(kind);

            if let Some(path) = output {
                report.export_csv(create_export_file(&path)?)?;
                println!("Category report exported to: {}", path.display());
            } else {
                print!("{}", report.format_terminal(symbol));
            }
        }

        ReportCommands::Monthly { year, output } => match (year, output) {
            (Some(year), Some(path)) => {
                engine.monthly_summary(year).export_csv(create_export_file(&path)?)?;
                println!("Monthly report exported to: {}", path.display());
            }
            (Some(year), None) => {
                print!("{}", engine.monthly_summary(year).format_terminal(symbol));
            }
            (None, Some(path)) => {
                export_history_csv(&engine.monthly_history(), create_export_file(&path)?)?;
                println!("Monthly report exported to: {}", path.display());
            }
            (None, None) => {
                print!("{}", format_history(&engine.monthly_history(), symbol));
            }
        },

        ReportCommands::Budgets => {
            print!("{}", engine.budget_status().format_terminal(symbol));
        }

        ReportCommands::Chart { output } => {
            let path = output.unwrap_or_else(|| default_chart_path.to_path_buf());
            let chart = TextBarChart::new(settings.chart_width, settings.currency_symbol.clone());
            let breakdown = engine.category_breakdown(TransactionKind::Expense);

            export_chart_file(&chart, &breakdown, &path)?;
            print!("{}", chart.render_to_string(&breakdown));
            println!("Chart saved to: {}", path.display());
        }
    }

    Ok(())
}

fn create_export_file(path: &Path) -> FinanceResult<BufWriter<File>> {
    let file = File::create(path).map_err(|e| {
        FinanceError::Export(format!("Failed to create file {}: {}", path.display(), e))
    })?;
    Ok(BufWriter::new(file))
}
