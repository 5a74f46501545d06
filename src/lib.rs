//! Revit version report.
//!
//! For each project id read from a CSV file, finds the first Revit model
//! under the project's "Project Files" folder together with the Revit
//! project version recorded for it, and writes the results as JSON.
//!
//! # Modules
//!
//! - `api`: project and data-management endpoints
//! - `auth`: client-credentials token exchange
//! - `commands`: command line definition
//! - `configuration`: configuration from env, dotenv and YAML
//! - `error`: the top-level error and its exit codes
//! - `exit_codes`: process exit codes per failure class
//! - `http_utils`: shared HTTP client, URL building and response decoding
//! - `input`: project ids from CSV
//! - `model`: API payloads and the report record
//! - `report`: per-project report loop and JSON output
//! - `search`: depth-first search for the first Revit model
//! - `token_cache`: bearer token reuse and refresh

pub mod api;
pub mod auth;
pub mod commands;
pub mod configuration;
pub mod error;
pub mod exit_codes;
pub mod http_utils;
pub mod input;
pub mod model;
pub mod report;
pub mod search;
pub mod token_cache;
