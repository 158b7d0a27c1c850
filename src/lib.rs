//! # synodl
//!
//! Command-line client for Synology Download Station and File Station.
//!
//! The library half of the crate wraps the NAS web API behind typed calls
//! ([`SynoClient`]) and provides the concurrent task-submission pipeline
//! ([`submit`]) used by the `file` and `url` commands: a bounded channel
//! feeding a fixed worker pool, with per-item failures collected and
//! reported without aborting the batch.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use synodl::{BatchOptions, Config, SubmitSource, SynoClient, submit_batch};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(&Config::default_path()?)?;
//!     let mut client = SynoClient::new(&config)?;
//!     client.login().await?;
//!
//!     let client = Arc::new(client);
//!     let source = SubmitSource::Url("http://example.com/file.iso".to_string());
//!     let report = submit_batch(client.clone(), source, BatchOptions::single()).await?;
//!     println!("{} attempted, {} failed", report.attempted, report.failures.len());
//!
//!     client.logout().await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// HTTP/JSON plumbing and session management
pub mod client;
/// Configuration types
pub mod config;
/// Download Station task operations
pub mod download_station;
/// Error types
pub mod error;
/// File Station operations
pub mod file_station;
/// CLI output formatting
pub mod format;
/// Concurrent task-submission pipeline
pub mod submit;

// Re-export commonly used types
pub use client::SynoClient;
pub use config::Config;
pub use download_station::{ActionResult, DownloadTask, TaskCreator};
pub use error::{ApiScope, Error, Result};
pub use submit::{BatchOptions, BatchReport, SubmissionFailure, SubmitSource, submit_batch};
