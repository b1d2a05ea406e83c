//! Ads API router. Everything under `/api/` except login and register
//! requires a bearer token.

use crate::auth;
use crate::handlers::{self, ManagementState};
use axum::middleware;
use axum::routing::{delete, get, post};
use axum::Router;

pub fn management_router(state: ManagementState) -> Router {
    let protected = Router::new()
        // Campaigns
        .route("/api/campaigns", get(handlers::list_campaigns).post(handlers::create_campaign))
        .route("/api/campaigns/{id}", get(handlers::get_campaign).put(handlers::update_campaign).delete(handlers::delete_campaign))
        // Ad sets ("ad groups")
        .route("/api/ad-groups", get(handlers::list_ad_sets).post(handlers::create_ad_set))
        .route("/api/ad-groups/{id}", get(handlers::get_ad_set).put(handlers::update_ad_set).delete(handlers::delete_ad_set))
        .route("/api/ad-sets", get(handlers::list_ad_sets))
        // Creatives
        .route("/api/ad-creatives", get(handlers::list_ad_creatives).post(handlers::create_ad_creative))
        .route("/api/ad-creatives/{id}", get(handlers::get_ad_creative).put(handlers::update_ad_creative).delete(handlers::delete_ad_creative))
        // Ads
        .route("/api/ads", get(handlers::list_ads))
        .route("/api/ads/{id}", delete(handlers::delete_ad))
        .route("/api/delete-ad/{id}", delete(handlers::delete_ad))
        .route("/api/ad/{id}", get(handlers::get_ad))
        .route("/api/create-ad", post(handlers::create_ad))
        .route("/api/edit-ad/{id}", post(handlers::update_ad))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::auth_middleware));

    Router::new()
        .route("/api/login", post(handlers::login))
        .route("/api/register", post(handlers::register))
        .route("/health", get(handlers::health_check))
        .merge(protected)
        .with_state(state)
}
