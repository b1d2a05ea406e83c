//! In-memory ads store, scoped per user.
//!
//! All four tables sit behind one lock so a cascading delete removes the
//! root and every dependent atomically.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};

use ads_core::types::*;
use ads_core::ValidationError;
use parking_lot::RwLock;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("{}", not_found_message(.0))]
    NotFound(EntityKind),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

fn not_found_message(kind: &EntityKind) -> &'static str {
    match kind {
        EntityKind::Campaign => "Campaign not found",
        EntityKind::AdSet => "Ad group not found",
        EntityKind::AdCreative => "Ad creative not found",
        EntityKind::Ad => "Ad not found",
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Default)]
struct Tables {
    campaigns: BTreeMap<EntityId, Campaign>,
    ad_sets: BTreeMap<EntityId, AdSet>,
    ad_creatives: BTreeMap<EntityId, AdCreative>,
    ads: BTreeMap<EntityId, Ad>,
}

fn owned<T>(record: Option<&T>, owner: impl Fn(&T) -> Option<EntityId>, user: EntityId) -> bool {
    record.is_some_and(|r| owner(r) == Some(user))
}

impl Tables {
    fn campaign(&self, user: EntityId, id: EntityId) -> StoreResult<&Campaign> {
        self.campaigns
            .get(&id)
            .filter(|c| c.user_id == Some(user))
            .ok_or(StoreError::NotFound(EntityKind::Campaign))
    }

    fn ad_set(&self, user: EntityId, id: EntityId) -> StoreResult<&AdSet> {
        self.ad_sets
            .get(&id)
            .filter(|s| s.user_id == Some(user))
            .ok_or(StoreError::NotFound(EntityKind::AdSet))
    }

    fn ad_creative(&self, user: EntityId, id: EntityId) -> StoreResult<&AdCreative> {
        self.ad_creatives
            .get(&id)
            .filter(|c| c.user_id == Some(user))
            .ok_or(StoreError::NotFound(EntityKind::AdCreative))
    }

    fn ad(&self, user: EntityId, id: EntityId) -> StoreResult<&Ad> {
        self.ads
            .get(&id)
            .filter(|a| a.user_id == Some(user))
            .ok_or(StoreError::NotFound(EntityKind::Ad))
    }

    fn exists(&self, user: EntityId, kind: EntityKind, id: EntityId) -> bool {
        match kind {
            EntityKind::Campaign => owned(self.campaigns.get(&id), |c| c.user_id, user),
            EntityKind::AdSet => owned(self.ad_sets.get(&id), |s| s.user_id, user),
            EntityKind::AdCreative => owned(self.ad_creatives.get(&id), |c| c.user_id, user),
            EntityKind::Ad => owned(self.ads.get(&id), |a| a.user_id, user),
        }
    }

    fn dependents(&self, kind: EntityKind, id: EntityId) -> Removal {
        let mut removal = Removal::default();
        removal.push(kind, id);
        match kind {
            EntityKind::Campaign => {
                for ad_set in self.ad_sets.values().filter(|s| s.campaign_id == id) {
                    removal.push(EntityKind::AdSet, ad_set.id);
                    for ad in self.ads.values().filter(|a| a.ad_group_id == ad_set.id) {
                        removal.push(EntityKind::Ad, ad.id);
                    }
                }
            }
            EntityKind::AdSet => {
                for ad in self.ads.values().filter(|a| a.ad_group_id == id) {
                    removal.push(EntityKind::Ad, ad.id);
                }
            }
            EntityKind::AdCreative => {
                for ad in self.ads.values().filter(|a| a.ad_creative_id == id) {
                    removal.push(EntityKind::Ad, ad.id);
                }
            }
            EntityKind::Ad => {}
        }
        removal
    }
}

/// Thread-safe in-memory store for campaigns, ad sets, creatives and ads.
pub struct ManagementStore {
    tables: RwLock<Tables>,
    next_id: AtomicI64,
}

impl Default for ManagementStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ManagementStore {
    pub fn new() -> Self {
        info!("Ads store initialized (in-memory, development mode)");
        Self {
            tables: RwLock::new(Tables::default()),
            next_id: AtomicI64::new(1),
        }
    }

    fn allocate_id(&self) -> EntityId {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    // ─── Campaigns ─────────────────────────────────────────────────────────

    pub fn list_campaigns(&self, user: EntityId) -> Vec<Campaign> {
        let tables = self.tables.read();
        tables
            .campaigns
            .values()
            .filter(|c| c.user_id == Some(user))
            .cloned()
            .collect()
    }

    pub fn get_campaign(&self, user: EntityId, id: EntityId) -> StoreResult<Campaign> {
        self.tables.read().campaign(user, id).cloned()
    }

    pub fn create_campaign(&self, user: EntityId, req: CampaignRequest) -> StoreResult<Campaign> {
        req.check()?;
        let campaign = Campaign {
            id: self.allocate_id(),
            name: req.name,
            objective: req.objective,
            status: req.status,
            special_ad_categories: "NONE".to_string(),
            meta_campaign_id: None,
            user_id: Some(user),
        };
        self.tables
            .write()
            .campaigns
            .insert(campaign.id, campaign.clone());
        Ok(campaign)
    }

    pub fn update_campaign(
        &self,
        user: EntityId,
        id: EntityId,
        req: CampaignRequest,
    ) -> StoreResult<Campaign> {
        req.check()?;
        let mut tables = self.tables.write();
        tables.campaign(user, id)?;
        let campaign = tables
            .campaigns
            .get_mut(&id)
            .ok_or(StoreError::NotFound(EntityKind::Campaign))?;
        campaign.name = req.name;
        campaign.objective = req.objective;
        campaign.status = req.status;
        Ok(campaign.clone())
    }

    // ─── Ad sets ───────────────────────────────────────────────────────────

    pub fn list_ad_sets(&self, user: EntityId) -> Vec<AdSet> {
        let tables = self.tables.read();
        tables
            .ad_sets
            .values()
            .filter(|s| s.user_id == Some(user))
            .cloned()
            .collect()
    }

    pub fn get_ad_set(&self, user: EntityId, id: EntityId) -> StoreResult<AdSet> {
        self.tables.read().ad_set(user, id).cloned()
    }

    pub fn create_ad_set(&self, user: EntityId, req: AdSetRequest) -> StoreResult<AdSet> {
        req.check()?;
        let mut tables = self.tables.write();
        tables.campaign(user, req.campaign_id)?;
        let ad_set = AdSet {
            id: self.allocate_id(),
            name: req.name,
            campaign_id: req.campaign_id,
            status: EntityStatus::Paused,
            daily_budget: req.daily_budget,
            targeting: Some(
                req.targeting
                    .unwrap_or_else(|| Targeting::for_countries(&req.countries)),
            ),
            countries: req.countries,
            billing_event: Some(req.billing_event),
            bid_strategy: Some(req.bid_strategy),
            bid_amount: req.bid_amount,
            roas_average_floor: req.roas_average_floor,
            optimization_goal: req.optimization_goal,
            meta_ad_group_id: None,
            user_id: Some(user),
        };
        tables.ad_sets.insert(ad_set.id, ad_set.clone());
        Ok(ad_set)
    }

    pub fn update_ad_set(&self, user: EntityId, id: EntityId, req: AdSetRequest) -> StoreResult<AdSet> {
        req.check()?;
        let mut tables = self.tables.write();
        tables.ad_set(user, id)?;
        tables.campaign(user, req.campaign_id)?;
        let ad_set = tables
            .ad_sets
            .get_mut(&id)
            .ok_or(StoreError::NotFound(EntityKind::AdSet))?;
        ad_set.targeting = Some(
            req.targeting
                .unwrap_or_else(|| Targeting::for_countries(&req.countries)),
        );
        ad_set.name = req.name;
        ad_set.campaign_id = req.campaign_id;
        ad_set.daily_budget = req.daily_budget;
        ad_set.countries = req.countries;
        ad_set.billing_event = Some(req.billing_event);
        ad_set.bid_strategy = Some(req.bid_strategy);
        ad_set.bid_amount = req.bid_amount;
        ad_set.roas_average_floor = req.roas_average_floor;
        ad_set.optimization_goal = req.optimization_goal;
        Ok(ad_set.clone())
    }

    // ─── Creatives ─────────────────────────────────────────────────────────

    pub fn list_ad_creatives(&self, user: EntityId) -> Vec<AdCreative> {
        let tables = self.tables.read();
        tables
            .ad_creatives
            .values()
            .filter(|c| c.user_id == Some(user))
            .cloned()
            .collect()
    }

    pub fn get_ad_creative(&self, user: EntityId, id: EntityId) -> StoreResult<AdCreative> {
        self.tables.read().ad_creative(user, id).cloned()
    }

    pub fn create_ad_creative(&self, user: EntityId, req: AdCreativeRequest) -> StoreResult<AdCreative> {
        req.check()?;
        let creative = AdCreative {
            id: self.allocate_id(),
            name: req.name,
            link: req.link,
            message: req.message,
            image: req.image,
            caption: Some(req.caption),
            cta_type: req.cta_type,
            creative_id: None,
            page_id: None,
            user_id: Some(user),
        };
        self.tables
            .write()
            .ad_creatives
            .insert(creative.id, creative.clone());
        Ok(creative)
    }

    pub fn update_ad_creative(
        &self,
        user: EntityId,
        id: EntityId,
        req: AdCreativeRequest,
    ) -> StoreResult<AdCreative> {
        req.check()?;
        let mut tables = self.tables.write();
        tables.ad_creative(user, id)?;
        let creative = tables
            .ad_creatives
            .get_mut(&id)
            .ok_or(StoreError::NotFound(EntityKind::AdCreative))?;
        creative.name = req.name;
        creative.link = req.link;
        creative.message = req.message;
        creative.image = req.image;
        creative.caption = Some(req.caption);
        creative.cta_type = req.cta_type;
        Ok(creative.clone())
    }

    // ─── Ads ───────────────────────────────────────────────────────────────

    pub fn list_ads(&self, user: EntityId) -> Vec<Ad> {
        let tables = self.tables.read();
        tables
            .ads
            .values()
            .filter(|a| a.user_id == Some(user))
            .cloned()
            .collect()
    }

    pub fn get_ad(&self, user: EntityId, id: EntityId) -> StoreResult<Ad> {
        self.tables.read().ad(user, id).cloned()
    }

    pub fn create_ad(&self, user: EntityId, req: AdRequest) -> StoreResult<Ad> {
        req.check()?;
        let mut tables = self.tables.write();
        tables.ad_set(user, req.ad_set_id)?;
        tables.ad_creative(user, req.creative_id)?;
        let ad = Ad {
            id: self.allocate_id(),
            name: req.name,
            status: req.status,
            ad_group_id: req.ad_set_id,
            ad_creative_id: req.creative_id,
            meta_ad_id: None,
            user_id: Some(user),
        };
        tables.ads.insert(ad.id, ad.clone());
        Ok(ad)
    }

    pub fn update_ad(&self, user: EntityId, id: EntityId, req: AdRequest) -> StoreResult<Ad> {
        req.check()?;
        let mut tables = self.tables.write();
        tables.ad(user, id)?;
        tables.ad_set(user, req.ad_set_id)?;
        tables.ad_creative(user, req.creative_id)?;
        let ad = tables
            .ads
            .get_mut(&id)
            .ok_or(StoreError::NotFound(EntityKind::Ad))?;
        ad.name = req.name;
        ad.status = req.status;
        ad.ad_group_id = req.ad_set_id;
        ad.ad_creative_id = req.creative_id;
        Ok(ad.clone())
    }

    // ─── Delete ────────────────────────────────────────────────────────────

    /// Delete an entity and everything that depends on it in one step.
    pub fn delete(&self, user: EntityId, kind: EntityKind, id: EntityId) -> StoreResult<Removal> {
        let mut tables = self.tables.write();
        if !tables.exists(user, kind, id) {
            return Err(StoreError::NotFound(kind));
        }
        let removal = tables.dependents(kind, id);
        for id in &removal.campaigns {
            tables.campaigns.remove(id);
        }
        for id in &removal.ad_sets {
            tables.ad_sets.remove(id);
        }
        for id in &removal.ad_creatives {
            tables.ad_creatives.remove(id);
        }
        for id in &removal.ads {
            tables.ads.remove(id);
        }
        info!(user, %kind, id, removed = %removal, "Cascade delete");
        Ok(removal)
    }

    // ─── Demo data ─────────────────────────────────────────────────────────

    /// Give a freshly registered user a small campaign tree to look at.
    pub fn seed_demo_data(&self, user: EntityId) -> StoreResult<()> {
        let campaign = self.create_campaign(
            user,
            CampaignRequest {
                name: "Spring Sale".to_string(),
                objective: CampaignObjective::Sales,
                status: EntityStatus::Active,
            },
        )?;
        let ad_set = self.create_ad_set(
            user,
            AdSetRequest {
                name: "US Prospecting".to_string(),
                campaign_id: campaign.id,
                daily_budget: 50.0,
                countries: vec![Country::UnitedStates, Country::Canada],
                billing_event: BillingEvent::Impressions,
                bid_strategy: BidStrategy::LowestCostWithoutCap,
                bid_amount: None,
                roas_average_floor: None,
                optimization_goal: Some(OptimizationGoal::LinkClicks),
                targeting: None,
            },
        )?;
        let creative = self.create_ad_creative(
            user,
            AdCreativeRequest {
                name: "Spring Banner".to_string(),
                link: "https://shop.example.com/spring".to_string(),
                message: "Fresh styles for spring".to_string(),
                image: "https://cdn.example.com/spring.png".to_string(),
                caption: "shop.example.com".to_string(),
                cta_type: CallToAction::ShopNow,
            },
        )?;
        self.create_ad(
            user,
            AdRequest {
                name: "Spring Banner - US".to_string(),
                ad_set_id: ad_set.id,
                creative_id: creative.id,
                status: EntityStatus::Active,
            },
        )?;
        info!(user, "Seeded demo data");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: EntityId = 1;
    const BOB: EntityId = 2;

    fn ad_set_request(campaign_id: EntityId) -> AdSetRequest {
        AdSetRequest {
            name: "Retargeting".to_string(),
            campaign_id,
            daily_budget: 20.0,
            countries: vec![Country::France],
            billing_event: BillingEvent::LinkClicks,
            bid_strategy: BidStrategy::CostCap,
            bid_amount: None,
            roas_average_floor: None,
            optimization_goal: None,
            targeting: None,
        }
    }

    fn ad_request(ad_set_id: EntityId, creative_id: EntityId) -> AdRequest {
        AdRequest {
            name: "Ad".to_string(),
            ad_set_id,
            creative_id,
            status: EntityStatus::Paused,
        }
    }

    #[test]
    fn test_campaign_delete_cascades() {
        let store = ManagementStore::new();
        store.seed_demo_data(ALICE).unwrap();
        let campaign = store.list_campaigns(ALICE)[0].clone();
        let second = store.create_ad_set(ALICE, ad_set_request(campaign.id)).unwrap();
        let creative = store.list_ad_creatives(ALICE)[0].clone();
        store.create_ad(ALICE, ad_request(second.id, creative.id)).unwrap();

        let removal = store.delete(ALICE, EntityKind::Campaign, campaign.id).unwrap();
        assert_eq!(removal.campaigns, vec![campaign.id]);
        assert_eq!(removal.ad_sets.len(), 2);
        assert_eq!(removal.ads.len(), 2);
        assert!(store.list_ad_sets(ALICE).is_empty());
        assert!(store.list_ads(ALICE).is_empty());
        // Creatives are independent of campaigns.
        assert_eq!(store.list_ad_creatives(ALICE).len(), 1);
    }

    #[test]
    fn test_creative_delete_removes_referencing_ads() {
        let store = ManagementStore::new();
        store.seed_demo_data(ALICE).unwrap();
        let creative = store.list_ad_creatives(ALICE)[0].clone();

        let removal = store.delete(ALICE, EntityKind::AdCreative, creative.id).unwrap();
        assert_eq!(removal.ads.len(), 1);
        assert!(store.list_ads(ALICE).is_empty());
        assert_eq!(store.list_ad_sets(ALICE).len(), 1);
    }

    #[test]
    fn test_records_are_scoped_per_user() {
        let store = ManagementStore::new();
        store.seed_demo_data(ALICE).unwrap();
        let campaign = store.list_campaigns(ALICE)[0].clone();

        assert!(store.list_campaigns(BOB).is_empty());
        assert_eq!(
            store.get_campaign(BOB, campaign.id),
            Err(StoreError::NotFound(EntityKind::Campaign))
        );
        assert_eq!(
            store.delete(BOB, EntityKind::Campaign, campaign.id),
            Err(StoreError::NotFound(EntityKind::Campaign))
        );
        assert_eq!(
            store.create_ad_set(BOB, ad_set_request(campaign.id)).unwrap_err().to_string(),
            "Campaign not found"
        );
    }

    #[test]
    fn test_referential_checks() {
        let store = ManagementStore::new();
        store.seed_demo_data(ALICE).unwrap();
        let ad_set = store.list_ad_sets(ALICE)[0].clone();

        let err = store.create_ad(ALICE, ad_request(999, 1)).unwrap_err();
        assert_eq!(err.to_string(), "Ad group not found");
        let err = store.create_ad(ALICE, ad_request(ad_set.id, 999)).unwrap_err();
        assert_eq!(err.to_string(), "Ad creative not found");
    }

    #[test]
    fn test_bid_strategy_rules_enforced() {
        let store = ManagementStore::new();
        let campaign = store.create_campaign(
            ALICE,
            CampaignRequest {
                name: "C".to_string(),
                objective: CampaignObjective::Leads,
                status: EntityStatus::Paused,
            },
        )
        .unwrap();
        let mut req = ad_set_request(campaign.id);
        req.bid_strategy = BidStrategy::LowestCostWithBidCap;
        assert_eq!(
            store.create_ad_set(ALICE, req.clone()),
            Err(StoreError::Invalid(ValidationError::BidAmountRequired))
        );
        req.bid_amount = Some(1.25);
        let created = store.create_ad_set(ALICE, req).unwrap();
        assert_eq!(
            created.targeting.unwrap().geo_locations.countries,
            vec!["FR".to_string()]
        );
    }

    #[test]
    fn test_update_keeps_id() {
        let store = ManagementStore::new();
        store.seed_demo_data(ALICE).unwrap();
        let ad = store.list_ads(ALICE)[0].clone();
        let mut req = ad_request(ad.ad_group_id, ad.ad_creative_id);
        req.name = "Renamed".to_string();
        let updated = store.update_ad(ALICE, ad.id, req).unwrap();
        assert_eq!(updated.id, ad.id);
        assert_eq!(store.get_ad(ALICE, ad.id).unwrap().name, "Renamed");
    }

    #[test]
    fn test_blank_names_rejected() {
        let store = ManagementStore::new();
        store.seed_demo_data(ALICE).unwrap();

        let err = store
            .create_campaign(
                ALICE,
                CampaignRequest {
                    name: "  ".to_string(),
                    objective: CampaignObjective::Leads,
                    status: EntityStatus::Paused,
                },
            )
            .unwrap_err();
        assert_eq!(err, StoreError::Invalid(ValidationError::NameRequired));

        let blank_creative = AdCreativeRequest {
            name: String::new(),
            link: "https://shop.example.com".to_string(),
            message: "Hi".to_string(),
            image: "https://cdn.example.com/a.png".to_string(),
            caption: "shop.example.com".to_string(),
            cta_type: CallToAction::LearnMore,
        };
        assert_eq!(
            store.create_ad_creative(ALICE, blank_creative),
            Err(StoreError::Invalid(ValidationError::MissingFields))
        );

        let ad = store.list_ads(ALICE)[0].clone();
        let mut req = ad_request(ad.ad_group_id, ad.ad_creative_id);
        req.name = String::new();
        assert_eq!(
            store.update_ad(ALICE, ad.id, req.clone()),
            Err(StoreError::Invalid(ValidationError::MissingFields))
        );
        assert_eq!(
            store.create_ad(ALICE, req),
            Err(StoreError::Invalid(ValidationError::MissingFields))
        );

        assert_eq!(store.list_campaigns(ALICE).len(), 1);
        assert_eq!(store.list_ad_creatives(ALICE).len(), 1);
        assert_eq!(store.get_ad(ALICE, ad.id).unwrap().name, ad.name);
    }
}
