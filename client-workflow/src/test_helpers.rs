use detection_api_caller::json::{detection::DetectionResult, history::HistoryPage};
use utils::time::parse_timestamp;

pub fn make_detection(id: i64, num_people: u32) -> DetectionResult {
    DetectionResult {
        id,
        timestamp: parse_timestamp("2024-05-01T10:20:30").unwrap(),
        num_people,
        confidence_threshold: 0.5,
        result_image_path: format!("results/{id}.jpg"),
        original_image_path: Some(format!("uploads/{id}.jpg")),
    }
}

/// Items of the given page, with ids that make the page recognizable
pub fn make_history_page(page: u32, items_count: usize, total: u64) -> HistoryPage {
    let first_id = i64::from(page) * 100;
    HistoryPage {
        items: (0..items_count)
            .map(|i| make_detection(first_id + i64::try_from(i).unwrap(), 1))
            .collect(),
        total,
    }
}
