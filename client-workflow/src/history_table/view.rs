use super::PAGE_SIZE;
use crate::{
    config::ClientConfig,
    result_view::{people_label, result_image_url},
};
use detection_api_caller::json::detection::DetectionResult;
use itertools::Itertools;
use std::fmt::{self, Display};

const NO_HISTORY_MESSAGE: &str = "No detection history found.";
const LOADING_MESSAGE: &str = "Loading history...";
const COLUMN_TITLES: [&str; 5] = ["ID", "Timestamp", "People Detected", "Confidence", "Result"];

/// What the history table shows, in order of precedence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryView {
    Loading,
    Error(String),
    Empty,
    Table(HistoryTableView),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRow {
    pub id: String,
    pub timestamp: String,
    pub people: String,
    pub confidence: String,
    pub result_url: String,
}

impl HistoryRow {
    fn new(config: &ClientConfig, item: &DetectionResult) -> Self {
        Self {
            id: item.id.to_string(),
            timestamp: utils::time::format_short(&item.timestamp),
            people: people_label(item.num_people),
            confidence: item.confidence_threshold.to_string(),
            result_url: result_image_url(config, item),
        }
    }

    fn cells(&self) -> [&str; 5] {
        [
            &self.id,
            &self.timestamp,
            &self.people,
            &self.confidence,
            &self.result_url,
        ]
    }
}

/// 1-based positions of the shown items within the whole history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSummary {
    pub first: u64,
    pub last: u64,
    pub total: u64,
}

impl PageSummary {
    #[must_use]
    pub fn new(current_page: u32, items_on_page: usize, total: u64) -> Self {
        let first = u64::from(current_page.saturating_sub(1)) * u64::from(PAGE_SIZE) + 1;
        let shown = u64::try_from(items_on_page).unwrap_or(u64::MAX);
        Self {
            first,
            last: first.saturating_add(shown).saturating_sub(1),
            total,
        }
    }
}

impl Display for PageSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Showing {} to {} of {} entries",
            self.first, self.last, self.total
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryTableView {
    pub rows: Vec<HistoryRow>,
    pub summary: PageSummary,
    pub current_page: u32,
    pub total_pages: u32,
    pub previous_enabled: bool,
    pub next_enabled: bool,
}

impl HistoryTableView {
    #[must_use]
    pub fn new(
        config: &ClientConfig,
        items: &[DetectionResult],
        summary: PageSummary,
        current_page: u32,
        total_pages: u32,
        previous_enabled: bool,
        next_enabled: bool,
    ) -> Self {
        Self {
            rows: items.iter().map(|i| HistoryRow::new(config, i)).collect(),
            summary,
            current_page,
            total_pages,
            previous_enabled,
            next_enabled,
        }
    }

    fn column_widths(&self) -> [usize; 5] {
        let mut widths = COLUMN_TITLES.map(str::len);
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row.cells()) {
                *width = (*width).max(cell.chars().count());
            }
        }
        widths
    }

    fn pager_line(&self) -> String {
        let button = |label: &str, enabled: bool| {
            if enabled {
                format!("[{label}]")
            } else {
                format!("({label})")
            }
        };

        format!(
            "{}  Page {} of {}  {}",
            button("Previous", self.previous_enabled),
            self.current_page,
            self.total_pages,
            button("Next", self.next_enabled)
        )
    }
}

fn format_row(cells: [&str; 5], widths: &[usize; 5]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .join(" | ")
        .trim_end()
        .to_string()
}

impl Display for HistoryTableView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths = self.column_widths();

        writeln!(f, "{}", format_row(COLUMN_TITLES, &widths))?;
        writeln!(
            f,
            "{}",
            widths.iter().map(|w| "-".repeat(*w)).join("-+-")
        )?;
        for row in &self.rows {
            writeln!(f, "{}", format_row(row.cells(), &widths))?;
        }
        writeln!(f)?;
        writeln!(f, "{}", self.summary)?;
        write!(f, "{}", self.pager_line())
    }
}

impl Display for HistoryView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryView::Loading => write!(f, "{LOADING_MESSAGE}"),
            HistoryView::Error(message) => write!(f, "{message}"),
            HistoryView::Empty => write!(f, "{NO_HISTORY_MESSAGE}"),
            HistoryView::Table(table) => write!(f, "{table}"),
        }
    }
}
