//! HTTP client for the ads management API.
//!
//! Holds the explicit session (bearer token plus user id), the REST client
//! that attaches it, and the [`AdsBackend`] seam the dashboard talks through.

pub mod backend;
pub mod client;
pub mod error;
pub mod session;

pub use backend::AdsBackend;
pub use client::ApiClient;
pub use error::{ClientError, ClientResult};
pub use reqwest::StatusCode;
pub use session::{FileSessionStore, MemorySessionStore, Session, SessionHandle, SessionStore};
