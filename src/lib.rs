//! eztag: browse your GitHub repositories and create annotated tags on
//! recently active branches.
//!
//! This library crate exposes all modules for use by the RPC binary and
//! integration tests.

pub mod app;
pub mod database;
pub mod managers;
pub mod platform;
pub mod services;
pub mod rpc_handler;
pub mod types;
