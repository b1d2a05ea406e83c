//! Console-side state for the ads dashboard.
//!
//! The entity cache holds the last-fetched snapshot; every local change goes
//! through [`EntityCache::apply`]. The delete workflow, list rendering and
//! form submission all work on top of it and an [`ads_client::AdsBackend`].

pub mod cache;
pub mod delete;
pub mod forms;
pub mod loader;
pub mod lookup;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

pub use cache::{EntityCache, Mutation};
pub use delete::{Confirm, DeleteOutcome, DeleteRequest, DeleteState, DeleteWorkflow, WorkflowError};
pub use forms::{
    fetch_entity, submit_ad, submit_ad_creative, submit_ad_set, submit_campaign, Acknowledgment,
    FormAction, FormError,
};
pub use loader::{load_dashboard, load_section};
pub use lookup::{NameLookup, UNKNOWN};
pub use view::{RowView, SectionView};
