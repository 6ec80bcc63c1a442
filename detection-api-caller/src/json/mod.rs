pub mod detection;
pub mod error_body;
pub mod history;
pub mod status;
