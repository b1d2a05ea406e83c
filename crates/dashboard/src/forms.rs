//! Create/edit submission: validate, one backend call, mirror into the cache.

use ads_client::{AdsBackend, ClientError};
use ads_core::types::{Entity, EntityId, EntityKind};
use ads_core::validation::{AdCreativeForm, AdForm, AdSetForm, CampaignForm, Form};
use ads_core::ValidationError;
use thiserror::Error;
use tracing::info;

use crate::cache::{EntityCache, Mutation};

#[derive(Debug, Error)]
pub enum FormError {
    /// Shown inline; no backend call was made.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Backend(#[from] ClientError),
}

impl FormError {
    pub fn needs_login(&self) -> bool {
        matches!(self, FormError::Backend(e) if e.needs_login())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    Create,
    Update(EntityId),
}

/// Success notice offering the way back to the list.
#[derive(Debug, Clone, PartialEq)]
pub struct Acknowledgment {
    pub entity: Entity,
    pub message: String,
}

impl Acknowledgment {
    fn new(action: FormAction, entity: Entity) -> Self {
        let verb = match action {
            FormAction::Create => "created",
            FormAction::Update(_) => "updated",
        };
        Self {
            message: format!("{} {verb} successfully!", entity.kind().noun()),
            entity,
        }
    }

    pub fn back_hint(&self) -> String {
        format!("Back to Dashboard: {} list", self.entity.kind().title())
    }
}

fn finish(cache: &mut EntityCache, action: FormAction, entity: Entity) -> Acknowledgment {
    info!(kind = %entity.kind(), id = entity.id(), ?action, "Form submitted");
    cache.apply(Mutation::Upsert(entity.clone()));
    Acknowledgment::new(action, entity)
}

pub async fn submit_campaign(
    backend: &dyn AdsBackend,
    cache: &mut EntityCache,
    action: FormAction,
    form: &CampaignForm,
) -> Result<Acknowledgment, FormError> {
    let request = form.validate()?;
    let campaign = match action {
        FormAction::Create => backend.create_campaign(&request).await?,
        FormAction::Update(id) => backend.update_campaign(id, &request).await?,
    };
    Ok(finish(cache, action, Entity::Campaign(campaign)))
}

pub async fn submit_ad_set(
    backend: &dyn AdsBackend,
    cache: &mut EntityCache,
    action: FormAction,
    form: &AdSetForm,
) -> Result<Acknowledgment, FormError> {
    let request = form.validate()?;
    let ad_set = match action {
        FormAction::Create => backend.create_ad_set(&request).await?,
        FormAction::Update(id) => backend.update_ad_set(id, &request).await?,
    };
    Ok(finish(cache, action, Entity::AdSet(ad_set)))
}

pub async fn submit_ad_creative(
    backend: &dyn AdsBackend,
    cache: &mut EntityCache,
    action: FormAction,
    form: &AdCreativeForm,
) -> Result<Acknowledgment, FormError> {
    let request = form.validate()?;
    let creative = match action {
        FormAction::Create => backend.create_ad_creative(&request).await?,
        FormAction::Update(id) => backend.update_ad_creative(id, &request).await?,
    };
    Ok(finish(cache, action, Entity::AdCreative(creative)))
}

pub async fn submit_ad(
    backend: &dyn AdsBackend,
    cache: &mut EntityCache,
    action: FormAction,
    form: &AdForm,
) -> Result<Acknowledgment, FormError> {
    let request = form.validate()?;
    let ad = match action {
        FormAction::Create => backend.create_ad(&request).await?,
        FormAction::Update(id) => backend.update_ad(id, &request).await?,
    };
    Ok(finish(cache, action, Entity::Ad(ad)))
}

/// Fetch one entity for an edit form.
pub async fn fetch_entity(
    backend: &dyn AdsBackend,
    kind: EntityKind,
    id: EntityId,
) -> Result<Entity, ClientError> {
    Ok(match kind {
        EntityKind::Campaign => Entity::Campaign(backend.get_campaign(id).await?),
        EntityKind::AdSet => Entity::AdSet(backend.get_ad_set(id).await?),
        EntityKind::AdCreative => Entity::AdCreative(backend.get_ad_creative(id).await?),
        EntityKind::Ad => Entity::Ad(backend.get_ad(id).await?),
    })
}
