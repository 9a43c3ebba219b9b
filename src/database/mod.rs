//! eztag database layer.
//!
//! Provides SQLite connection management and schema migrations for the
//! durable part of the session (the encrypted access token).
//!
//! # Usage
//!
//! ```no_run
//! use eztag::database::Database;
//!
//! let db = Database::open("eztag.db").expect("failed to open database");
//! let db = Database::open_in_memory().expect("failed to open in-memory database");
//! let conn = db.connection();
//! ```

pub mod connection;
pub mod migrations;

pub use connection::Database;
