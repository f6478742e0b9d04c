pub mod config;
pub mod dims;
pub mod report;
