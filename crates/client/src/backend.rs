//! The backend seam used by the dashboard: typed CRUD per entity kind.

use ads_core::types::{
    Ad, AdCreative, AdCreativeRequest, AdRequest, AdSet, AdSetRequest, Campaign, CampaignRequest,
    DeleteResponse, EntityId, EntityKind,
};
use async_trait::async_trait;

use crate::client::ApiClient;
use crate::error::ClientResult;

#[async_trait]
pub trait AdsBackend: Send + Sync {
    async fn list_campaigns(&self) -> ClientResult<Vec<Campaign>>;
    async fn get_campaign(&self, id: EntityId) -> ClientResult<Campaign>;
    async fn create_campaign(&self, request: &CampaignRequest) -> ClientResult<Campaign>;
    async fn update_campaign(&self, id: EntityId, request: &CampaignRequest) -> ClientResult<Campaign>;

    async fn list_ad_sets(&self) -> ClientResult<Vec<AdSet>>;
    async fn get_ad_set(&self, id: EntityId) -> ClientResult<AdSet>;
    async fn create_ad_set(&self, request: &AdSetRequest) -> ClientResult<AdSet>;
    async fn update_ad_set(&self, id: EntityId, request: &AdSetRequest) -> ClientResult<AdSet>;
    /// Ad sets offered as choices on the ad form.
    async fn ad_set_options(&self) -> ClientResult<Vec<AdSet>>;

    async fn list_ad_creatives(&self) -> ClientResult<Vec<AdCreative>>;
    async fn get_ad_creative(&self, id: EntityId) -> ClientResult<AdCreative>;
    async fn create_ad_creative(&self, request: &AdCreativeRequest) -> ClientResult<AdCreative>;
    async fn update_ad_creative(
        &self,
        id: EntityId,
        request: &AdCreativeRequest,
    ) -> ClientResult<AdCreative>;

    async fn list_ads(&self) -> ClientResult<Vec<Ad>>;
    async fn get_ad(&self, id: EntityId) -> ClientResult<Ad>;
    async fn create_ad(&self, request: &AdRequest) -> ClientResult<Ad>;
    async fn update_ad(&self, id: EntityId, request: &AdRequest) -> ClientResult<Ad>;

    /// Delete one entity. Whether dependents go with it is up to the backend.
    async fn delete(&self, kind: EntityKind, id: EntityId) -> ClientResult<DeleteResponse>;
}

fn item_path(kind: EntityKind, id: EntityId) -> String {
    format!("/api/{}/{id}", kind.collection())
}

fn collection_path(kind: EntityKind) -> String {
    format!("/api/{}", kind.collection())
}

#[async_trait]
impl AdsBackend for ApiClient {
    async fn list_campaigns(&self) -> ClientResult<Vec<Campaign>> {
        self.get(&collection_path(EntityKind::Campaign)).await
    }

    async fn get_campaign(&self, id: EntityId) -> ClientResult<Campaign> {
        self.get(&item_path(EntityKind::Campaign, id)).await
    }

    async fn create_campaign(&self, request: &CampaignRequest) -> ClientResult<Campaign> {
        self.post(&collection_path(EntityKind::Campaign), request).await
    }

    async fn update_campaign(&self, id: EntityId, request: &CampaignRequest) -> ClientResult<Campaign> {
        self.put(&item_path(EntityKind::Campaign, id), request).await
    }

    async fn list_ad_sets(&self) -> ClientResult<Vec<AdSet>> {
        self.get(&collection_path(EntityKind::AdSet)).await
    }

    async fn get_ad_set(&self, id: EntityId) -> ClientResult<AdSet> {
        self.get(&item_path(EntityKind::AdSet, id)).await
    }

    async fn create_ad_set(&self, request: &AdSetRequest) -> ClientResult<AdSet> {
        self.post(&collection_path(EntityKind::AdSet), request).await
    }

    async fn update_ad_set(&self, id: EntityId, request: &AdSetRequest) -> ClientResult<AdSet> {
        self.put(&item_path(EntityKind::AdSet, id), request).await
    }

    async fn ad_set_options(&self) -> ClientResult<Vec<AdSet>> {
        self.get("/api/ad-sets").await
    }

    async fn list_ad_creatives(&self) -> ClientResult<Vec<AdCreative>> {
        self.get(&collection_path(EntityKind::AdCreative)).await
    }

    async fn get_ad_creative(&self, id: EntityId) -> ClientResult<AdCreative> {
        self.get(&item_path(EntityKind::AdCreative, id)).await
    }

    async fn create_ad_creative(&self, request: &AdCreativeRequest) -> ClientResult<AdCreative> {
        self.post(&collection_path(EntityKind::AdCreative), request).await
    }

    async fn update_ad_creative(
        &self,
        id: EntityId,
        request: &AdCreativeRequest,
    ) -> ClientResult<AdCreative> {
        self.put(&item_path(EntityKind::AdCreative, id), request).await
    }

    async fn list_ads(&self) -> ClientResult<Vec<Ad>> {
        self.get(&collection_path(EntityKind::Ad)).await
    }

    // Ads are fetched, created and edited through their own routes.
    async fn get_ad(&self, id: EntityId) -> ClientResult<Ad> {
        self.get(&format!("/api/ad/{id}")).await
    }

    async fn create_ad(&self, request: &AdRequest) -> ClientResult<Ad> {
        self.post("/api/create-ad", request).await
    }

    async fn update_ad(&self, id: EntityId, request: &AdRequest) -> ClientResult<Ad> {
        self.post(&format!("/api/edit-ad/{id}"), request).await
    }

    async fn delete(&self, kind: EntityKind, id: EntityId) -> ClientResult<DeleteResponse> {
        ApiClient::delete(self, &item_path(kind, id)).await
    }
}
