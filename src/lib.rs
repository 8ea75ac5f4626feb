//! Desktop client for the chemical equipment backend.
//!
//! Uploads equipment CSVs, shows the latest summary as a table and charts,
//! lists recent uploads and saves the generated PDF report.

/// Backend endpoints and wire types.
pub mod api;
/// Application directory resolution.
pub mod app_dirs;
/// Credential gate shown before any page.
pub mod auth;
/// Settings file handling.
pub mod config;
/// Credential pair and its persistence.
pub mod credentials;
/// Saving downloaded payloads to disk.
pub mod download;
/// egui front end.
pub mod egui_app;
mod fs_util;
mod http_client;
/// Tracing setup.
pub mod logging;
