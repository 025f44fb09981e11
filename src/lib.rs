//! University Platform - user registration service
//!
//! Registers students, professors and administrators: validates the
//! request, hashes the password, derives the avatar URL and persists the
//! user under a bounded deadline.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Identifiers, the user entity and password hashing
//! - **services**: The create-user use case
//! - **infra**: Postgres persistence, migrations and object storage URLs
//! - **api**: HTTP handlers, extractors and routes
//! - **errors**: Centralized error taxonomy
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Id, Password, User, UserType};
pub use errors::{AppError, AppResult, ErrorKind};
