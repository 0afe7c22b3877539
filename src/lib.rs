//! # ziproute Core Library
//!
//! This crate packs selected parts of a filesystem tree into ZIP archives
//! and unpacks them again. Both directions run every entry through a
//! caller-supplied [`router::Router`] that can rename or exclude it, and the
//! [`runner`] executes many independent jobs concurrently, reducing their
//! outcomes to a single summary.
//!
//! ## Key Modules
//!
//! - [`archive`]: builds an archive from glob-selected tree entries.
//! - [`extract`]: unpacks archives back onto the filesystem.
//! - [`router`]: the path-routing contract applied in both directions.
//! - [`enumerate`]: glob expansion of the tree being packed.
//! - [`runner`]: concurrent execution and aggregation of jobs.
//!
//! ## Example
//!
//! ```no_run
//! use ziproute::common::JobConfig;
//! use ziproute::runner::{self, Job};
//!
//! # async fn demo() {
//! let config = JobConfig {
//!     cwd: None,
//!     dest: "dist/site.zip".into(),
//!     src: vec!["assets/**/*".into()],
//!     dot: false,
//!     options: Default::default(),
//! };
//! let summary = runner::run(vec![Job::Pack(config)]).await;
//! assert!(summary.ok());
//! # }
//! ```

pub mod archive;
pub mod cli;
pub mod common;
pub mod enumerate;
pub mod error;
pub use error::PackError;

pub mod extract;
pub mod router;
pub mod runner;

// Cross-platform permission-bit helpers
pub mod fsx;
