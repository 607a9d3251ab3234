// Application layer - credential handling and the service API that the web
// layer (or the CLI) calls into.

pub mod auth;
pub mod error;
pub mod service;

pub use error::*;
pub use service::*;
