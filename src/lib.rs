pub mod check;
pub mod config;
pub mod logging;
pub mod manifest;
pub mod report;
pub mod version;
