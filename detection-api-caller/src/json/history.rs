use super::detection::DetectionResult;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Query parameters of the history listing. Filters are only sent when set.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryQuery {
    pub page: u32,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_people: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_people: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_from: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_to: Option<NaiveDateTime>,
}

impl HistoryQuery {
    pub fn page(page: u32, limit: u32) -> Self {
        Self {
            page,
            limit,
            ..Self::default()
        }
    }
}

impl Default for HistoryQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_PAGE_SIZE,
            min_people: None,
            max_people: None,
            date_from: None,
            date_to: None,
        }
    }
}

/// The history endpoint has answered with two different shapes over time
#[must_use]
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum HistoryPayload {
    Envelope {
        items: Vec<DetectionResult>,
        /// Missing or `null` counts as 0
        #[serde(default)]
        total: Option<u64>,
        #[serde(default)]
        page: Option<u32>,
        #[serde(default)]
        limit: Option<u32>,
        #[serde(default)]
        total_pages: Option<u32>,
    },
    /// Bare array, without any count of the whole history
    Legacy(Vec<DetectionResult>),
}

/// One page of history, independent of the shape it arrived in
#[must_use]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HistoryPage {
    pub items: Vec<DetectionResult>,
    pub total: u64,
}

impl HistoryPayload {
    pub fn normalize(self) -> HistoryPage {
        match self {
            HistoryPayload::Envelope { items, total, .. } => HistoryPage {
                items,
                total: total.unwrap_or(0),
            },
            HistoryPayload::Legacy(items) => HistoryPage { items, total: 0 },
        }
    }
}

impl From<HistoryPayload> for HistoryPage {
    fn from(payload: HistoryPayload) -> Self {
        payload.normalize()
    }
}
