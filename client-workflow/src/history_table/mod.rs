//! Paginated detection history.
//!
//! [`HistoryTable`] is the synchronous state machine: it hands out a [`FetchRequest`]
//! for every fetch it wants and accepts results only for the latest one.
//! [`handler::HistoryTableHandler`] drives it with real api calls.

pub mod handler;
mod view;

pub use view::{HistoryRow, HistoryTableView, HistoryView, PageSummary};

use crate::config::ClientConfig;
use chrono::NaiveDateTime;
use detection_api_caller::{
    error::RequestError,
    json::{
        detection::DetectionResult,
        history::{HistoryPage, HistoryQuery},
    },
};
use utils::struct_name;

const STRUCT_NAME: &str = struct_name!(HistoryTable);

pub const PAGE_SIZE: u32 = 10;
pub const LOAD_ERROR_MESSAGE: &str = "Failed to load detection history. Please try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Previous,
    Next,
    Page(u32),
}

/// Optional server-side filters applied to every page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HistoryFilters {
    pub min_people: Option<u32>,
    pub max_people: Option<u32>,
    pub date_from: Option<NaiveDateTime>,
    pub date_to: Option<NaiveDateTime>,
}

/// One fetch the table is waiting for. Only the latest generation is ever applied.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    generation: u64,
    query: HistoryQuery,
}

impl FetchRequest {
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn page(&self) -> u32 {
        self.query.page
    }

    pub fn query(&self) -> HistoryQuery {
        self.query.clone()
    }
}

#[must_use]
#[derive(Debug, Clone)]
pub struct HistoryTable {
    items: Vec<DetectionResult>,
    loading: bool,
    error: Option<String>,
    current_page: u32,
    total_pages: u32,
    total_items: u64,

    filters: HistoryFilters,
    generation: u64,
}

impl Default for HistoryTable {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryTable {
    pub fn new() -> Self {
        Self::starting_at(1, HistoryFilters::default())
    }

    /// `first_page` is not validated; there is no page count before the first response
    pub fn starting_at(first_page: u32, filters: HistoryFilters) -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
            current_page: first_page.max(1),
            total_pages: 0,
            total_items: 0,
            filters,
            generation: 0,
        }
    }

    /// First fetch of the current page
    pub fn mount(&mut self) -> FetchRequest {
        self.begin_fetch()
    }

    /// Fetches the current page again, e.g. after an error
    pub fn reload(&mut self) -> FetchRequest {
        self.begin_fetch()
    }

    fn begin_fetch(&mut self) -> FetchRequest {
        self.loading = true;
        self.generation += 1;

        tracing::debug!(
            "{STRUCT_NAME}: fetching page {} (generation {})",
            self.current_page,
            self.generation
        );

        FetchRequest {
            generation: self.generation,
            query: HistoryQuery {
                min_people: self.filters.min_people,
                max_people: self.filters.max_people,
                date_from: self.filters.date_from,
                date_to: self.filters.date_to,
                ..HistoryQuery::page(self.current_page, PAGE_SIZE)
            },
        }
    }

    /// Applies a fetch result. Returns false, changing nothing, if a newer fetch was
    /// started after `request`.
    pub fn apply(
        &mut self,
        request: &FetchRequest,
        result: Result<HistoryPage, RequestError>,
    ) -> bool {
        if request.generation != self.generation {
            tracing::debug!(
                "{STRUCT_NAME}: dropping stale response for page {} (generation {}, latest {})",
                request.page(),
                request.generation,
                self.generation
            );
            return false;
        }

        match result {
            Ok(page) => {
                self.total_items = page.total;
                self.total_pages = total_pages_for(page.total);
                self.items = page.items;
                self.error = None;
            }
            Err(e) => {
                // Items of the previous page stay as they were
                tracing::error!("{STRUCT_NAME}: failed to fetch history: {e}");
                self.error = Some(LOAD_ERROR_MESSAGE.to_string());
            }
        }

        self.loading = false;
        true
    }

    /// Starts a fetch if the target page is a valid page other than the current one
    pub fn navigate(&mut self, navigation: Navigation) -> Option<FetchRequest> {
        let target = match navigation {
            Navigation::Previous => {
                if !self.can_go_previous() {
                    return None;
                }
                self.current_page - 1
            }
            Navigation::Next => {
                if !self.can_go_next() {
                    return None;
                }
                self.current_page + 1
            }
            Navigation::Page(page) => page,
        };

        self.go_to(target)
    }

    pub fn go_to(&mut self, page: u32) -> Option<FetchRequest> {
        if page < 1 || page > self.total_pages || page == self.current_page {
            tracing::debug!(
                "{STRUCT_NAME}: ignoring navigation to page {page} (current {}, total {})",
                self.current_page,
                self.total_pages
            );
            return None;
        }

        self.current_page = page;
        Some(self.begin_fetch())
    }

    pub fn previous_page(&mut self) -> Option<FetchRequest> {
        self.navigate(Navigation::Previous)
    }

    pub fn next_page(&mut self) -> Option<FetchRequest> {
        self.navigate(Navigation::Next)
    }

    #[must_use]
    pub fn can_go_previous(&self) -> bool {
        self.current_page > 1
    }

    #[must_use]
    pub fn can_go_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    #[must_use]
    pub fn items(&self) -> &[DetectionResult] {
        &self.items
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    #[must_use]
    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.total_items
    }

    /// Loading wins over an error, an error wins over (stale) data
    pub fn render(&self, config: &ClientConfig) -> HistoryView {
        if self.loading {
            return HistoryView::Loading;
        }

        if let Some(error) = &self.error {
            return HistoryView::Error(error.clone());
        }

        if self.items.is_empty() {
            return HistoryView::Empty;
        }

        HistoryView::Table(HistoryTableView::new(
            config,
            &self.items,
            PageSummary::new(self.current_page, self.items.len(), self.total_items),
            self.current_page,
            self.total_pages,
            self.can_go_previous(),
            self.can_go_next(),
        ))
    }
}

#[must_use]
pub fn total_pages_for(total_items: u64) -> u32 {
    u32::try_from(total_items.div_ceil(u64::from(PAGE_SIZE))).unwrap_or(u32::MAX)
}
