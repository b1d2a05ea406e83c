pub mod config;
pub mod error;
pub mod types;
pub mod validation;

pub use config::{AppConfig, CascadeMode};
pub use error::{CoreError, CoreResult};
pub use types::{Ad, AdCreative, AdSet, Campaign, Entity, EntityId, EntityKind, Removal};
pub use validation::{Form, ValidationError};
