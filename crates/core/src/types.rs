//! Ads domain types: campaigns, ad sets, creatives, ads and their wire payloads.

use serde::{Deserialize, Serialize};
use std::fmt;

pub type EntityId = i64;

/// Declares a closed set of platform values with a fixed wire string each.
macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| wanted.to_string())
            }
        }
    };
}

// ─── Enumerations ──────────────────────────────────────────────────────────

wire_enum! {
    /// Delivery status shared by campaigns, ad sets and ads.
    EntityStatus {
        Active => "ACTIVE",
        Paused => "PAUSED",
    }
}

wire_enum! {
    CampaignObjective {
        Traffic => "OUTCOME_TRAFFIC",
        Sales => "OUTCOME_SALES",
        Leads => "OUTCOME_LEADS",
        Engagement => "OUTCOME_ENGAGEMENT",
        Awareness => "OUTCOME_AWARENESS",
        AppPromotion => "OUTCOME_APP_PROMOTION",
    }
}

impl CampaignObjective {
    pub fn label(&self) -> &'static str {
        match self {
            CampaignObjective::Traffic => "Traffic",
            CampaignObjective::Sales => "Sales",
            CampaignObjective::Leads => "Leads",
            CampaignObjective::Engagement => "Engagement",
            CampaignObjective::Awareness => "Awareness",
            CampaignObjective::AppPromotion => "App Promotion",
        }
    }
}

wire_enum! {
    BillingEvent {
        Impressions => "IMPRESSIONS",
        LinkClicks => "LINK_CLICKS",
        PageLikes => "PAGE_LIKES",
        PostEngagement => "POST_ENGAGEMENT",
        VideoViews => "VIDEO_VIEWS",
    }
}

wire_enum! {
    BidStrategy {
        LowestCostWithoutCap => "LOWEST_COST_WITHOUT_CAP",
        CostCap => "COST_CAP",
        LowestCostWithMinRoas => "LOWEST_COST_WITH_MIN_ROAS",
        LowestCostWithBidCap => "LOWEST_COST_WITH_BID_CAP",
    }
}

wire_enum! {
    OptimizationGoal {
        None => "NONE",
        AppInstalls => "APP_INSTALLS",
        AdRecallLift => "AD_RECALL_LIFT",
        EngagedUsers => "ENGAGED_USERS",
        EventResponses => "EVENT_RESPONSES",
        Impressions => "IMPRESSIONS",
        LeadGeneration => "LEAD_GENERATION",
        QualityLead => "QUALITY_LEAD",
        LinkClicks => "LINK_CLICKS",
        OffsiteConversions => "OFFSITE_CONVERSIONS",
        PageLikes => "PAGE_LIKES",
        PostEngagement => "POST_ENGAGEMENT",
        QualityCall => "QUALITY_CALL",
        Reach => "REACH",
        LandingPageViews => "LANDING_PAGE_VIEWS",
        VisitInstagramProfile => "VISIT_INSTAGRAM_PROFILE",
        Value => "VALUE",
        Thruplay => "THRUPLAY",
        DerivedEvents => "DERIVED_EVENTS",
        AppInstallsAndOffsiteConversions => "APP_INSTALLS_AND_OFFSITE_CONVERSIONS",
        Conversations => "CONVERSATIONS",
        InAppValue => "IN_APP_VALUE",
        MessagingPurchaseConversion => "MESSAGING_PURCHASE_CONVERSION",
        Subscribers => "SUBSCRIBERS",
        RemindersSet => "REMINDERS_SET",
        MeaningfulCallAttempt => "MEANINGFUL_CALL_ATTEMPT",
        ProfileVisit => "PROFILE_VISIT",
        ProfileAndPageEngagement => "PROFILE_AND_PAGE_ENGAGEMENT",
        MessagingAppointmentConversion => "MESSAGING_APPOINTMENT_CONVERSION",
    }
}

wire_enum! {
    CallToAction {
        ShopNow => "SHOP_NOW",
        LearnMore => "LEARN_MORE",
        SignUp => "SIGN_UP",
    }
}

wire_enum! {
    /// Targetable countries. The wire form is the display name; the
    /// geo-targeting payload carries the ISO code.
    Country {
        UnitedStates => "United States",
        Canada => "Canada",
        UnitedKingdom => "United Kingdom",
        Australia => "Australia",
        Germany => "Germany",
        France => "France",
    }
}

impl Country {
    pub fn code(&self) -> &'static str {
        match self {
            Country::UnitedStates => "US",
            Country::Canada => "CA",
            Country::UnitedKingdom => "GB",
            Country::Australia => "AU",
            Country::Germany => "DE",
            Country::France => "FR",
        }
    }

    /// Parse either the display name or the ISO code.
    pub fn parse(value: &str) -> Option<Self> {
        let wanted = value.trim();
        value
            .parse::<Country>()
            .ok()
            .or_else(|| Self::ALL.iter().copied().find(|c| c.code().eq_ignore_ascii_case(wanted)))
    }
}

// ─── Entity kinds ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Campaign,
    AdSet,
    AdCreative,
    Ad,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Campaign,
        EntityKind::AdSet,
        EntityKind::AdCreative,
        EntityKind::Ad,
    ];

    /// Lower-case singular noun used in prompts and messages.
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Campaign => "campaign",
            EntityKind::AdSet => "ad set",
            EntityKind::AdCreative => "ad creative",
            EntityKind::Ad => "ad",
        }
    }

    /// Capitalised singular noun for notices, e.g. "Ad set created successfully!".
    pub fn noun(&self) -> &'static str {
        match self {
            EntityKind::Campaign => "Campaign",
            EntityKind::AdSet => "Ad set",
            EntityKind::AdCreative => "Ad creative",
            EntityKind::Ad => "Ad",
        }
    }

    /// Section heading for list views.
    pub fn title(&self) -> &'static str {
        match self {
            EntityKind::Campaign => "Campaigns",
            EntityKind::AdSet => "Ad Sets",
            EntityKind::AdCreative => "Ad Creatives",
            EntityKind::Ad => "Ads",
        }
    }

    /// Collection segment under `/api/` for list, fetch, update and delete.
    pub fn collection(&self) -> &'static str {
        match self {
            EntityKind::Campaign => "campaigns",
            EntityKind::AdSet => "ad-groups",
            EntityKind::AdCreative => "ad-creatives",
            EntityKind::Ad => "ads",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ─── Campaign ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: EntityId,
    pub name: String,
    pub objective: CampaignObjective,
    pub status: EntityStatus,
    #[serde(default = "default_special_ad_categories")]
    pub special_ad_categories: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_campaign_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<EntityId>,
}

fn default_special_ad_categories() -> String {
    "NONE".to_string()
}

// ─── Ad set ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoLocations {
    #[serde(default)]
    pub countries: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Targeting {
    pub geo_locations: GeoLocations,
}

impl Targeting {
    pub fn for_countries(countries: &[Country]) -> Self {
        Self {
            geo_locations: GeoLocations {
                countries: countries.iter().map(|c| c.code().to_string()).collect(),
            },
        }
    }
}

/// An ad set ("ad group"): budget, targeting and bidding scoped to one campaign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdSet {
    pub id: EntityId,
    pub name: String,
    pub campaign_id: EntityId,
    #[serde(default = "default_ad_set_status")]
    pub status: EntityStatus,
    pub daily_budget: f64,
    #[serde(default)]
    pub countries: Vec<Country>,
    #[serde(default)]
    pub billing_event: Option<BillingEvent>,
    #[serde(default)]
    pub bid_strategy: Option<BidStrategy>,
    #[serde(default)]
    pub bid_amount: Option<f64>,
    #[serde(default)]
    pub roas_average_floor: Option<f64>,
    #[serde(default)]
    pub optimization_goal: Option<OptimizationGoal>,
    #[serde(default)]
    pub targeting: Option<Targeting>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_ad_group_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<EntityId>,
}

fn default_ad_set_status() -> EntityStatus {
    EntityStatus::Paused
}

// ─── Creative ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdCreative {
    pub id: EntityId,
    pub name: String,
    pub link: String,
    pub message: String,
    pub image: String,
    #[serde(default)]
    pub caption: Option<String>,
    pub cta_type: CallToAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creative_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<EntityId>,
}

// ─── Ad ────────────────────────────────────────────────────────────────────

/// Binds one ad set to one creative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ad {
    pub id: EntityId,
    pub name: String,
    pub status: EntityStatus,
    pub ad_group_id: EntityId,
    pub ad_creative_id: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_ad_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<EntityId>,
}

// ─── Any entity ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Campaign(Campaign),
    AdSet(AdSet),
    AdCreative(AdCreative),
    Ad(Ad),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Campaign(_) => EntityKind::Campaign,
            Entity::AdSet(_) => EntityKind::AdSet,
            Entity::AdCreative(_) => EntityKind::AdCreative,
            Entity::Ad(_) => EntityKind::Ad,
        }
    }

    pub fn id(&self) -> EntityId {
        match self {
            Entity::Campaign(c) => c.id,
            Entity::AdSet(s) => s.id,
            Entity::AdCreative(c) => c.id,
            Entity::Ad(a) => a.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Entity::Campaign(c) => &c.name,
            Entity::AdSet(s) => &s.name,
            Entity::AdCreative(c) => &c.name,
            Entity::Ad(a) => &a.name,
        }
    }
}

/// Ids removed by one cascading delete, grouped by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Removal {
    #[serde(default)]
    pub campaigns: Vec<EntityId>,
    #[serde(default)]
    pub ad_sets: Vec<EntityId>,
    #[serde(default)]
    pub ad_creatives: Vec<EntityId>,
    #[serde(default)]
    pub ads: Vec<EntityId>,
}

impl Removal {
    pub fn ids(&self, kind: EntityKind) -> &[EntityId] {
        match kind {
            EntityKind::Campaign => &self.campaigns,
            EntityKind::AdSet => &self.ad_sets,
            EntityKind::AdCreative => &self.ad_creatives,
            EntityKind::Ad => &self.ads,
        }
    }

    pub fn push(&mut self, kind: EntityKind, id: EntityId) {
        let ids = match kind {
            EntityKind::Campaign => &mut self.campaigns,
            EntityKind::AdSet => &mut self.ad_sets,
            EntityKind::AdCreative => &mut self.ad_creatives,
            EntityKind::Ad => &mut self.ads,
        };
        if !ids.contains(&id) {
            ids.push(id);
        }
    }

    pub fn total(&self) -> usize {
        self.campaigns.len() + self.ad_sets.len() + self.ad_creatives.len() + self.ads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

impl fmt::Display for Removal {
    /// e.g. `1 campaign, 2 ad sets, 5 ads`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = EntityKind::ALL
            .iter()
            .filter_map(|kind| {
                let count = self.ids(*kind).len();
                match count {
                    0 => None,
                    1 => Some(format!("1 {}", kind.label())),
                    n => Some(format!("{n} {}s", kind.label())),
                }
            })
            .collect();
        if parts.is_empty() {
            f.write_str("nothing")
        } else {
            f.write_str(&parts.join(", "))
        }
    }
}

// ─── API Request/Response types ────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignRequest {
    pub name: String,
    pub objective: CampaignObjective,
    pub status: EntityStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdSetRequest {
    pub name: String,
    pub campaign_id: EntityId,
    pub daily_budget: f64,
    pub countries: Vec<Country>,
    pub billing_event: BillingEvent,
    pub bid_strategy: BidStrategy,
    #[serde(default)]
    pub bid_amount: Option<f64>,
    #[serde(default)]
    pub roas_average_floor: Option<f64>,
    #[serde(default)]
    pub optimization_goal: Option<OptimizationGoal>,
    #[serde(default)]
    pub targeting: Option<Targeting>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdCreativeRequest {
    pub name: String,
    pub link: String,
    pub message: String,
    pub image: String,
    pub caption: String,
    pub cta_type: CallToAction,
}

/// Payload for `POST /api/create-ad` and `POST /api/edit-ad/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdRequest {
    pub name: String,
    #[serde(rename = "adsetId")]
    pub ad_set_id: EntityId,
    #[serde(rename = "creativeId")]
    pub creative_id: EntityId,
    pub status: EntityStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: EntityId,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub message: String,
    pub user: UserInfo,
    pub access_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Body of a successful delete. Both fields are optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub removed: Removal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_enums_use_platform_strings() {
        let json = serde_json::to_string(&BidStrategy::LowestCostWithBidCap).unwrap();
        assert_eq!(json, "\"LOWEST_COST_WITH_BID_CAP\"");
        let goal: OptimizationGoal =
            serde_json::from_str("\"APP_INSTALLS_AND_OFFSITE_CONVERSIONS\"").unwrap();
        assert_eq!(goal, OptimizationGoal::AppInstallsAndOffsiteConversions);
        assert_eq!(OptimizationGoal::ALL.len(), 29);
    }

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!("outcome_sales".parse::<CampaignObjective>(), Ok(CampaignObjective::Sales));
        assert_eq!("paused".parse::<EntityStatus>(), Ok(EntityStatus::Paused));
        assert_eq!("DRAFT".parse::<EntityStatus>(), Err("DRAFT".to_string()));
    }

    #[test]
    fn test_country_accepts_name_or_code() {
        assert_eq!(Country::parse("United Kingdom"), Some(Country::UnitedKingdom));
        assert_eq!(Country::parse("gb"), Some(Country::UnitedKingdom));
        assert_eq!(Country::parse("Narnia"), None);

        let targeting = Targeting::for_countries(&[Country::UnitedStates, Country::France]);
        assert_eq!(targeting.geo_locations.countries, vec!["US", "FR"]);
    }

    #[test]
    fn test_ad_set_deserializes_with_sparse_fields() {
        let json = r#"{"id": 7, "name": "Retargeting", "campaign_id": 3, "daily_budget": 25.0}"#;
        let ad_set: AdSet = serde_json::from_str(json).unwrap();
        assert_eq!(ad_set.campaign_id, 3);
        assert_eq!(ad_set.status, EntityStatus::Paused);
        assert!(ad_set.countries.is_empty());
        assert!(ad_set.bid_strategy.is_none());
    }

    #[test]
    fn test_ad_request_uses_form_field_names() {
        let request = AdRequest {
            name: "Spring ad".to_string(),
            ad_set_id: 4,
            creative_id: 9,
            status: EntityStatus::Active,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["adsetId"], 4);
        assert_eq!(value["creativeId"], 9);
        assert_eq!(value["status"], "ACTIVE");
    }

    #[test]
    fn test_removal_summary() {
        let mut removal = Removal::default();
        assert_eq!(removal.to_string(), "nothing");
        removal.push(EntityKind::Campaign, 1);
        removal.push(EntityKind::AdSet, 2);
        removal.push(EntityKind::AdSet, 3);
        removal.push(EntityKind::AdSet, 3);
        removal.push(EntityKind::Ad, 8);
        assert_eq!(removal.total(), 4);
        assert_eq!(removal.to_string(), "1 campaign, 2 ad sets, 1 ad");
    }
}
