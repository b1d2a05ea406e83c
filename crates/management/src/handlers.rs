//! Axum REST handlers for the ads API.

use std::sync::Arc;
use std::time::Instant;

use ads_core::types::*;
use ads_core::validation::{CredentialsForm, Form};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use tracing::warn;

use crate::auth::{AuthError, AuthService};
use crate::models::{AuthUser, CredentialsBody, ErrorResponse, HealthResponse};
use crate::store::{ManagementStore, StoreError};

/// Shared state for every handler and the auth middleware.
#[derive(Clone)]
pub struct ManagementState {
    pub store: Arc<ManagementStore>,
    pub auth: Arc<AuthService>,
    pub seed_demo_data: bool,
    pub started_at: Instant,
}

impl ManagementState {
    pub fn new(token_ttl_hours: i64, seed_demo_data: bool) -> Self {
        Self {
            store: Arc::new(ManagementStore::new()),
            auth: Arc::new(AuthService::new(token_ttl_hours)),
            seed_demo_data,
            started_at: Instant::now(),
        }
    }
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);
pub type ApiResult<T> = Result<T, ApiError>;

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

fn store_error(e: StoreError) -> ApiError {
    let status = match e {
        StoreError::NotFound(_) => StatusCode::NOT_FOUND,
        StoreError::Invalid(_) => StatusCode::BAD_REQUEST,
    };
    api_error(status, e.to_string())
}

fn auth_error(e: AuthError) -> ApiError {
    api_error(e.status(), e.to_string())
}

fn created(kind: EntityKind) {
    metrics::counter!("ads_management.entities.created", "kind" => kind.label()).increment(1);
}

// ─── Health ────────────────────────────────────────────────────────────────

pub async fn health_check(State(state): State<ManagementState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.started_at.elapsed().as_secs(),
    })
}

// ─── Auth ──────────────────────────────────────────────────────────────────

pub async fn register(
    State(state): State<ManagementState>,
    Json(body): Json<CredentialsBody>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    let credentials = CredentialsForm::from(body)
        .validate()
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))?;
    let user = state.auth.register(&credentials).map_err(auth_error)?;
    if state.seed_demo_data {
        if let Err(e) = state.store.seed_demo_data(user.id) {
            warn!(user_id = user.id, error = %e, "Failed to seed demo data");
        }
    }
    metrics::counter!("ads_management.users.registered").increment(1);
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User created successfully".to_string(),
        }),
    ))
}

pub async fn login(
    State(state): State<ManagementState>,
    Json(body): Json<CredentialsBody>,
) -> ApiResult<Json<LoginResponse>> {
    let credentials = CredentialsForm::from(body)
        .validate()
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))?;
    state.auth.login(&credentials).map(Json).map_err(auth_error)
}

// ─── Campaigns ─────────────────────────────────────────────────────────────

pub async fn list_campaigns(
    State(state): State<ManagementState>,
    Extension(user): Extension<AuthUser>,
) -> Json<Vec<Campaign>> {
    Json(state.store.list_campaigns(user.id))
}

pub async fn get_campaign(
    State(state): State<ManagementState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<EntityId>,
) -> ApiResult<Json<Campaign>> {
    state.store.get_campaign(user.id, id).map(Json).map_err(store_error)
}

pub async fn create_campaign(
    State(state): State<ManagementState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<CampaignRequest>,
) -> ApiResult<(StatusCode, Json<Campaign>)> {
    let campaign = state.store.create_campaign(user.id, req).map_err(store_error)?;
    created(EntityKind::Campaign);
    Ok((StatusCode::CREATED, Json(campaign)))
}

pub async fn update_campaign(
    State(state): State<ManagementState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<EntityId>,
    Json(req): Json<CampaignRequest>,
) -> ApiResult<Json<Campaign>> {
    state
        .store
        .update_campaign(user.id, id, req)
        .map(Json)
        .map_err(store_error)
}

pub async fn delete_campaign(
    state: State<ManagementState>,
    user: Extension<AuthUser>,
    Path(id): Path<EntityId>,
) -> ApiResult<Json<DeleteResponse>> {
    delete_entity(state, user, EntityKind::Campaign, id)
}

// ─── Ad sets ───────────────────────────────────────────────────────────────

pub async fn list_ad_sets(
    State(state): State<ManagementState>,
    Extension(user): Extension<AuthUser>,
) -> Json<Vec<AdSet>> {
    Json(state.store.list_ad_sets(user.id))
}

pub async fn get_ad_set(
    State(state): State<ManagementState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<EntityId>,
) -> ApiResult<Json<AdSet>> {
    state.store.get_ad_set(user.id, id).map(Json).map_err(store_error)
}

pub async fn create_ad_set(
    State(state): State<ManagementState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<AdSetRequest>,
) -> ApiResult<(StatusCode, Json<AdSet>)> {
    let ad_set = state.store.create_ad_set(user.id, req).map_err(store_error)?;
    created(EntityKind::AdSet);
    Ok((StatusCode::CREATED, Json(ad_set)))
}

pub async fn update_ad_set(
    State(state): State<ManagementState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<EntityId>,
    Json(req): Json<AdSetRequest>,
) -> ApiResult<Json<AdSet>> {
    state
        .store
        .update_ad_set(user.id, id, req)
        .map(Json)
        .map_err(store_error)
}

pub async fn delete_ad_set(
    state: State<ManagementState>,
    user: Extension<AuthUser>,
    Path(id): Path<EntityId>,
) -> ApiResult<Json<DeleteResponse>> {
    delete_entity(state, user, EntityKind::AdSet, id)
}

// ─── Creatives ─────────────────────────────────────────────────────────────

pub async fn list_ad_creatives(
    State(state): State<ManagementState>,
    Extension(user): Extension<AuthUser>,
) -> Json<Vec<AdCreative>> {
    Json(state.store.list_ad_creatives(user.id))
}

pub async fn get_ad_creative(
    State(state): State<ManagementState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<EntityId>,
) -> ApiResult<Json<AdCreative>> {
    state
        .store
        .get_ad_creative(user.id, id)
        .map(Json)
        .map_err(store_error)
}

pub async fn create_ad_creative(
    State(state): State<ManagementState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<AdCreativeRequest>,
) -> ApiResult<(StatusCode, Json<AdCreative>)> {
    let creative = state.store.create_ad_creative(user.id, req).map_err(store_error)?;
    created(EntityKind::AdCreative);
    Ok((StatusCode::CREATED, Json(creative)))
}

pub async fn update_ad_creative(
    State(state): State<ManagementState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<EntityId>,
    Json(req): Json<AdCreativeRequest>,
) -> ApiResult<Json<AdCreative>> {
    state
        .store
        .update_ad_creative(user.id, id, req)
        .map(Json)
        .map_err(store_error)
}

pub async fn delete_ad_creative(
    state: State<ManagementState>,
    user: Extension<AuthUser>,
    Path(id): Path<EntityId>,
) -> ApiResult<Json<DeleteResponse>> {
    delete_entity(state, user, EntityKind::AdCreative, id)
}

// ─── Ads ───────────────────────────────────────────────────────────────────

pub async fn list_ads(
    State(state): State<ManagementState>,
    Extension(user): Extension<AuthUser>,
) -> Json<Vec<Ad>> {
    Json(state.store.list_ads(user.id))
}

pub async fn get_ad(
    State(state): State<ManagementState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<EntityId>,
) -> ApiResult<Json<Ad>> {
    state.store.get_ad(user.id, id).map(Json).map_err(store_error)
}

pub async fn create_ad(
    State(state): State<ManagementState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<AdRequest>,
) -> ApiResult<(StatusCode, Json<Ad>)> {
    let ad = state.store.create_ad(user.id, req).map_err(store_error)?;
    created(EntityKind::Ad);
    Ok((StatusCode::CREATED, Json(ad)))
}

pub async fn update_ad(
    State(state): State<ManagementState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<EntityId>,
    Json(req): Json<AdRequest>,
) -> ApiResult<Json<Ad>> {
    state
        .store
        .update_ad(user.id, id, req)
        .map(Json)
        .map_err(store_error)
}

/// Serves both `DELETE /api/ads/{id}` and the older `/api/delete-ad/{id}`.
pub async fn delete_ad(
    state: State<ManagementState>,
    user: Extension<AuthUser>,
    Path(id): Path<EntityId>,
) -> ApiResult<Json<DeleteResponse>> {
    delete_entity(state, user, EntityKind::Ad, id)
}

fn delete_entity(
    State(state): State<ManagementState>,
    Extension(user): Extension<AuthUser>,
    kind: EntityKind,
    id: EntityId,
) -> ApiResult<Json<DeleteResponse>> {
    let removed = state.store.delete(user.id, kind, id).map_err(store_error)?;
    for removed_kind in EntityKind::ALL {
        let count = removed.ids(removed_kind).len() as u64;
        if count > 0 {
            metrics::counter!("ads_management.entities.deleted", "kind" => removed_kind.label())
                .increment(count);
        }
    }
    Ok(Json(DeleteResponse {
        message: format!("{} deleted successfully", kind.noun()),
        removed,
    }))
}
