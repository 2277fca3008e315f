//! stagectl - Project stage administration console
//!
//! This library provides the core functionality for stagectl, including:
//! - Data models for project stages and reference enumerations
//! - A blocking REST client and configuration for the backend
//! - Repository traits, with an in-memory backend for tests
//! - The stage list: loading, create/edit/delete dialogs, and reordering
//!   with optimistic updates and reload-on-failure
//! - CLI command parsing and execution
//!
//! # Example
//!
//! ```no_run
//! use stagectl::cli::run;
//!
//! fn main() {
//!     if let Err(e) = run() {
//!         eprintln!("Error: {}", e);
//!         std::process::exit(1);
//!     }
//! }
//! ```

pub mod api;
pub mod models;
pub mod repo;
pub mod stages;
pub mod cli;
pub mod utils;
