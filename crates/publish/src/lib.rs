//! Publish orchestration for static site deployment.
//!
//! This crate implements the **business logic** of a publish run. It is a
//! library crate with no transport dependencies — hosting platforms plug in
//! through the [`Backend`] trait:
//!
//! 1. **Scan** — build the local manifest (paths + content fingerprints)
//! 2. **Diff** — compare against the remote manifest when the backend can
//!    list one, otherwise upload everything
//! 3. **Upload** — per file, with exactly one retry before recording a
//!    failure; one failed file never cancels the rest of the run
//! 4. **Report** — a single aggregated [`PublishResult`]

pub mod backend;
pub mod error;
pub mod publisher;
pub mod types;

pub use backend::{Backend, ProbeReport, UploadOutcome};
pub use error::PublishError;
pub use publisher::{BackendFactory, Publisher};
pub use types::{PublishEvent, PublishResult, UploadTask};
