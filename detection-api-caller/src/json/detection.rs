use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize, de::Error};

pub type DetectionId = i64;

/// One person-detection run, as stored by the backend
#[must_use]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub id: DetectionId,
    #[serde(deserialize_with = "timestamp_from_str")]
    pub timestamp: NaiveDateTime,
    pub num_people: u32,
    pub confidence_threshold: f64,
    /// Relative to the api base url
    pub result_image_path: String,
    #[serde(default)]
    pub original_image_path: Option<String>,
}

fn timestamp_from_str<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    utils::time::parse_timestamp(&s)
        .map_err(|e| D::Error::custom(format!("Invalid timestamp `{s}`: {e}")))
}
