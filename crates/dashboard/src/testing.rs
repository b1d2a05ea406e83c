//! In-process fakes shared by the unit tests.

use std::collections::HashSet;

use ads_client::{AdsBackend, ClientError, ClientResult, StatusCode};
use ads_core::types::*;
use async_trait::async_trait;
use parking_lot::Mutex;

use crate::cache::EntityCache;

pub fn campaign(id: EntityId, name: &str) -> Campaign {
    Campaign {
        id,
        name: name.to_string(),
        objective: CampaignObjective::Sales,
        status: EntityStatus::Active,
        special_ad_categories: "NONE".to_string(),
        meta_campaign_id: None,
        user_id: None,
    }
}

pub fn ad_set(id: EntityId, campaign_id: EntityId, name: &str) -> AdSet {
    AdSet {
        id,
        name: name.to_string(),
        campaign_id,
        status: EntityStatus::Paused,
        daily_budget: 40.0,
        countries: vec![Country::UnitedStates],
        billing_event: Some(BillingEvent::Impressions),
        bid_strategy: Some(BidStrategy::LowestCostWithoutCap),
        bid_amount: None,
        roas_average_floor: None,
        optimization_goal: None,
        targeting: Some(Targeting::for_countries(&[Country::UnitedStates])),
        meta_ad_group_id: None,
        user_id: None,
    }
}

pub fn creative(id: EntityId, name: &str) -> AdCreative {
    AdCreative {
        id,
        name: name.to_string(),
        link: "https://shop.example".to_string(),
        message: "Now on sale".to_string(),
        image: "https://cdn.example/banner.png".to_string(),
        caption: Some("Limited time".to_string()),
        cta_type: CallToAction::ShopNow,
        creative_id: None,
        page_id: None,
        user_id: None,
    }
}

pub fn ad(id: EntityId, ad_set_id: EntityId, creative_id: EntityId, name: &str) -> Ad {
    Ad {
        id,
        name: name.to_string(),
        status: EntityStatus::Active,
        ad_group_id: ad_set_id,
        ad_creative_id: creative_id,
        meta_ad_id: None,
        user_id: None,
    }
}

/// Two campaigns. Campaign 1 owns ad sets 10 and 11, campaign 2 owns 20.
/// Creative 50 is used by ads 100, 102 and 200; creative 51 by ad 101.
pub fn fixture() -> EntityCache {
    EntityCache::from_parts(
        vec![campaign(1, "Spring Sale"), campaign(2, "Brand")],
        vec![
            ad_set(10, 1, "US Prospecting"),
            ad_set(11, 1, "US Retargeting"),
            ad_set(20, 2, "Awareness"),
        ],
        vec![creative(50, "Banner"), creative(51, "Carousel")],
        vec![
            ad(100, 10, 50, "Banner A"),
            ad(101, 10, 51, "Carousel A"),
            ad(102, 11, 50, "Banner B"),
            ad(200, 20, 50, "Banner C"),
        ],
    )
}

/// Backend fake that serves a fixed snapshot and records every call.
#[derive(Default)]
pub struct RecordingBackend {
    pub snapshot: EntityCache,
    calls: Mutex<Vec<String>>,
    failing: Mutex<HashSet<(EntityKind, EntityId)>>,
    fail_lists: Mutex<bool>,
    next_id: Mutex<EntityId>,
}

impl RecordingBackend {
    pub fn new(snapshot: EntityCache) -> Self {
        Self {
            snapshot,
            next_id: Mutex::new(1000),
            ..Default::default()
        }
    }

    /// Make `DELETE` of this entity fail with a 500.
    pub fn fail_delete(&self, kind: EntityKind, id: EntityId) {
        self.failing.lock().insert((kind, id));
    }

    pub fn fail_lists(&self) {
        *self.fail_lists.lock() = true;
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().push(call);
    }

    fn allocate(&self) -> EntityId {
        let mut next = self.next_id.lock();
        *next += 1;
        *next
    }

    fn list<T>(&self, what: &str, items: Vec<T>) -> ClientResult<Vec<T>> {
        self.record(format!("list {what}"));
        if *self.fail_lists.lock() && what == "ads" {
            return Err(ClientError::Api {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: "An error occurred".to_string(),
            });
        }
        Ok(items)
    }

    fn missing(kind: EntityKind) -> ClientError {
        ClientError::Api {
            status: StatusCode::NOT_FOUND,
            message: format!("{} not found", kind.label()),
        }
    }
}

#[async_trait]
impl AdsBackend for RecordingBackend {
    async fn list_campaigns(&self) -> ClientResult<Vec<Campaign>> {
        self.list("campaigns", self.snapshot.campaigns().cloned().collect())
    }

    async fn get_campaign(&self, id: EntityId) -> ClientResult<Campaign> {
        self.record(format!("get campaign {id}"));
        self.snapshot
            .campaigns()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| Self::missing(EntityKind::Campaign))
    }

    async fn create_campaign(&self, request: &CampaignRequest) -> ClientResult<Campaign> {
        self.record(format!("create campaign {}", request.name));
        let mut created = campaign(self.allocate(), &request.name);
        created.objective = request.objective;
        created.status = request.status;
        Ok(created)
    }

    async fn update_campaign(&self, id: EntityId, request: &CampaignRequest) -> ClientResult<Campaign> {
        self.record(format!("update campaign {id}"));
        let mut updated = self.get_campaign(id).await?;
        updated.name = request.name.clone();
        updated.objective = request.objective;
        updated.status = request.status;
        Ok(updated)
    }

    async fn list_ad_sets(&self) -> ClientResult<Vec<AdSet>> {
        self.list("ad sets", self.snapshot.ad_sets().cloned().collect())
    }

    async fn get_ad_set(&self, id: EntityId) -> ClientResult<AdSet> {
        self.record(format!("get ad set {id}"));
        self.snapshot
            .ad_sets()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| Self::missing(EntityKind::AdSet))
    }

    async fn create_ad_set(&self, request: &AdSetRequest) -> ClientResult<AdSet> {
        self.record(format!("create ad set {}", request.name));
        Ok(ad_set(self.allocate(), request.campaign_id, &request.name))
    }

    async fn update_ad_set(&self, id: EntityId, request: &AdSetRequest) -> ClientResult<AdSet> {
        self.record(format!("update ad set {id}"));
        Ok(ad_set(id, request.campaign_id, &request.name))
    }

    async fn ad_set_options(&self) -> ClientResult<Vec<AdSet>> {
        self.list("ad set options", self.snapshot.ad_sets().cloned().collect())
    }

    async fn list_ad_creatives(&self) -> ClientResult<Vec<AdCreative>> {
        self.list("ad creatives", self.snapshot.ad_creatives().cloned().collect())
    }

    async fn get_ad_creative(&self, id: EntityId) -> ClientResult<AdCreative> {
        self.record(format!("get ad creative {id}"));
        self.snapshot
            .ad_creatives()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| Self::missing(EntityKind::AdCreative))
    }

    async fn create_ad_creative(&self, request: &AdCreativeRequest) -> ClientResult<AdCreative> {
        self.record(format!("create ad creative {}", request.name));
        Ok(creative(self.allocate(), &request.name))
    }

    async fn update_ad_creative(
        &self,
        id: EntityId,
        request: &AdCreativeRequest,
    ) -> ClientResult<AdCreative> {
        self.record(format!("update ad creative {id}"));
        Ok(creative(id, &request.name))
    }

    async fn list_ads(&self) -> ClientResult<Vec<Ad>> {
        self.list("ads", self.snapshot.ads().cloned().collect())
    }

    async fn get_ad(&self, id: EntityId) -> ClientResult<Ad> {
        self.record(format!("get ad {id}"));
        self.snapshot
            .ads()
            .find(|a| a.id == id)
            .cloned()
            .ok_or_else(|| Self::missing(EntityKind::Ad))
    }

    async fn create_ad(&self, request: &AdRequest) -> ClientResult<Ad> {
        self.record(format!("create ad {}", request.name));
        Ok(ad(self.allocate(), request.ad_set_id, request.creative_id, &request.name))
    }

    async fn update_ad(&self, id: EntityId, request: &AdRequest) -> ClientResult<Ad> {
        self.record(format!("update ad {id}"));
        Ok(ad(id, request.ad_set_id, request.creative_id, &request.name))
    }

    async fn delete(&self, kind: EntityKind, id: EntityId) -> ClientResult<DeleteResponse> {
        self.record(format!("delete {} {id}", kind.label()));
        if self.failing.lock().contains(&(kind, id)) {
            return Err(ClientError::Api {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: "Failed to delete from the Meta API or database.".to_string(),
            });
        }
        let mut removed = Removal::default();
        removed.push(kind, id);
        Ok(DeleteResponse {
            message: format!("{} deleted successfully", kind.label()),
            removed,
        })
    }
}
