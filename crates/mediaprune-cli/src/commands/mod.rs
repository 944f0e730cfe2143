pub mod config;
pub mod enrich;
pub mod prompts;
pub mod review;
pub mod scan;
pub mod scan_ui;
pub mod summary;
