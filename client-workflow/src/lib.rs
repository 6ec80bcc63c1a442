pub mod config;
pub mod history_table;
pub mod pages;
pub mod result_view;
pub mod runner;
pub mod traits;
pub mod upload_form;

#[cfg(test)]
mod test_helpers;
