//! repo-explorer: browse GitHub repositories through a small JSON API
//!
//! Clones repositories into a scratch directory, serves their file trees and
//! file contents without letting callers escape the checkout, computes
//! language statistics, and hands the interesting parts to a chat model for
//! summaries and questions.

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod fetch;
pub mod github_api;
pub mod important;
pub mod llm;
pub mod scan;
pub mod server;
pub mod stats;
pub mod utils;

pub use error::{ExplorerError, Result};
