//! Deployment backends.
//!
//! Each hosting platform implements `siteship_publish::Backend` once; the
//! [`factory`] module selects the variant from `Settings.platform`. The
//! in-memory and local-directory backends double as reference
//! implementations of the full capability set.

pub mod dir;
pub mod factory;
pub mod git_api;
pub mod memory;
pub mod netlify;
mod paths;

pub use dir::DirBackend;
pub use factory::{backend_for, publisher_for};
pub use git_api::GitApiBackend;
pub use memory::MemoryBackend;
pub use netlify::NetlifyBackend;
