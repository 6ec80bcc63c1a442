pub mod detection_api;
