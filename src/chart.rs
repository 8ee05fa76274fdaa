//! Spending chart export
//!
//! Renders the per-category expense breakdown as a horizontal bar chart.

use std::io::Write;
use std::path::Path;

use crate::display::report::{format_bar, format_percentage, truncate};
use crate::error::{FinanceError, FinanceResult};
use crate::reports::CategoryBreakdown;
use crate::storage::write_atomic;

/// Something that can draw a category breakdown
pub trait ChartExporter {
    fn render(&self, breakdown: &CategoryBreakdown, writer: &mut dyn Write) -> FinanceResult<()>;
}

/// Plain-text horizontal bar chart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBarChart {
    /// Width of the longest bar in characters
    pub width: usize,
    pub currency_symbol: String,
}

const LABEL_WIDTH: usize = 20;

impl TextBarChart {
    pub fn new(width: usize, currency_symbol: impl Into<String>) -> Self {
        Self {
            width,
            currency_symbol: currency_symbol.into(),
        }
    }

    /// Render to a string
    pub fn render_to_string(&self, breakdown: &CategoryBreakdown) -> String {
        if breakdown.is_empty() {
            return "No expenses to chart.\n".to_string();
        }

        let entries = breakdown.ordered();
        // ordered() puts the largest category first
        let max = entries.first().map(|e| e.amount.as_f64()).unwrap_or(0.0);

        let mut output = String::from("Category Spending Distribution\n\n");
        for entry in &entries {
            let share = breakdown.share_of(entry.category).unwrap_or(0.0);
            output.push_str(&format!(
                "{:<label$} {} {:>12} {:>6}\n",
                truncate(entry.category, LABEL_WIDTH),
                format_bar(entry.amount.as_f64(), max, self.width),
                entry.amount.format_with_symbol(&self.currency_symbol),
                format_percentage(share),
                label = LABEL_WIDTH
            ));
        }
        output
    }
}

impl Default for TextBarChart {
    fn default() -> Self {
        Self::new(40, "$")
    }
}

impl ChartExporter for TextBarChart {
    fn render(&self, breakdown: &CategoryBreakdown, writer: &mut dyn Write) -> FinanceResult<()> {
        writer
            .write_all(self.render_to_string(breakdown).as_bytes())
            .map_err(|e| FinanceError::Export(format!("Failed to write chart: {}", e)))
    }
}

/// Render a chart into `path`, replacing any previous chart
pub fn export_chart_file<E: ChartExporter + ?Sized>(
    exporter: &E,
    breakdown: &CategoryBreakdown,
    path: &Path,
) -> FinanceResult<()> {
    write_atomic(path, |writer| exporter.render(breakdown, writer))?;
    tracing::debug!(path = %path.display(), "wrote spending chart");
    Ok(())
}
