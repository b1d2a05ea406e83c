//! Ads management backend: campaigns, ad sets, creatives and ads.
//!
//! Serves the REST API the console talks to. Data is held in memory per
//! user; deletes cascade server-side in one transaction.

pub mod auth;
pub mod handlers;
pub mod models;
pub mod router;
pub mod server;
pub mod store;

pub use handlers::ManagementState;
pub use router::management_router;
pub use server::ManagementServer;
pub use store::{ManagementStore, StoreError};
