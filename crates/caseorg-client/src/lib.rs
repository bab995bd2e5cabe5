//! Backend contracts for the case browser.
//!
//! The browser core only ever talks to a [`Backend`]. [`HttpBackend`] is the
//! production transport; tests substitute an in-memory implementation.

pub mod backend;
pub mod error;
pub mod http;

pub use backend::Backend;
pub use error::{ApiError, Result};
pub use http::HttpBackend;
