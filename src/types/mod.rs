// eztag shared type definitions
// Each submodule defines types used across the application.

pub mod credential;
pub mod errors;
pub mod github;
pub mod navigation;
pub mod session;
pub mod settings;
