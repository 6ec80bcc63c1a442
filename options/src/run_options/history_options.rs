use chrono::NaiveDateTime;
use clap::Parser;
use utils::time::parse_timestamp;

#[derive(Parser, Clone, Debug)]
pub struct HistoryOptions {
    /// Page to show, starting at 1
    #[clap(long, short('p'), default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub page: u32,

    /// Only detections with at least this many people
    #[clap(long)]
    pub min_people: Option<u32>,

    /// Only detections with at most this many people
    #[clap(long)]
    pub max_people: Option<u32>,

    /// Only detections at or after this time, e.g. 2024-05-01T00:00:00
    #[clap(long, value_parser = parse_timestamp)]
    pub date_from: Option<NaiveDateTime>,

    /// Only detections at or before this time
    #[clap(long, value_parser = parse_timestamp)]
    pub date_to: Option<NaiveDateTime>,
}
