use clap::Parser;
use std::path::PathBuf;

const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.5;

#[derive(Parser, Clone, Debug)]
pub struct UploadOptions {
    /// The image to run person detection on
    pub file_path: PathBuf,

    /// Detector confidence threshold. Clamped to [0.1, 0.9] in steps of 0.1
    #[clap(long, short('t'), default_value_t = DEFAULT_CONFIDENCE_THRESHOLD)]
    pub confidence_threshold: f64,
}
