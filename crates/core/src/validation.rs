//! Form field collectors and the required-field checks applied before submit.
//!
//! Each form holds raw text exactly as the user entered it. `validate` either
//! produces the typed request payload or the message to show inline; no
//! backend call is made for an invalid form.

use crate::types::*;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Name is required.")]
    NameRequired,

    #[error("Objective is required.")]
    ObjectiveRequired,

    #[error("Status is required.")]
    StatusRequired,

    #[error("All fields are required")]
    MissingFields,

    #[error("Daily budget must be a positive number.")]
    InvalidBudget,

    #[error("Bid amount is required for the LOWEST_COST_WITH_BID_CAP strategy.")]
    BidAmountRequired,

    #[error("ROAS average floor and optimization goal are required for the LOWEST_COST_WITH_MIN_ROAS strategy.")]
    MinRoasFieldsRequired,

    #[error("Missing email or password")]
    MissingCredentials,

    #[error("Invalid {field}: {value}")]
    InvalidValue { field: &'static str, value: String },
}

/// A controlled-field collector that can be turned into a request payload.
pub trait Form {
    type Request;

    fn validate(&self) -> Result<Self::Request, ValidationError>;
}

fn present(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn parse_field<T: FromStr>(field: &'static str, value: &str) -> Result<T, ValidationError> {
    value.parse::<T>().map_err(|_| ValidationError::InvalidValue {
        field,
        value: value.to_string(),
    })
}

fn optional_number(field: &'static str, value: &str) -> Result<Option<f64>, ValidationError> {
    present(value).map(|v| parse_field::<f64>(field, v)).transpose()
}

// ─── Campaign ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CampaignForm {
    pub name: String,
    pub objective: String,
    pub status: String,
}

impl From<&Campaign> for CampaignForm {
    fn from(campaign: &Campaign) -> Self {
        Self {
            name: campaign.name.clone(),
            objective: campaign.objective.to_string(),
            status: campaign.status.to_string(),
        }
    }
}

impl Form for CampaignForm {
    type Request = CampaignRequest;

    fn validate(&self) -> Result<CampaignRequest, ValidationError> {
        let name = present(&self.name).ok_or(ValidationError::NameRequired)?;
        let objective = present(&self.objective).ok_or(ValidationError::ObjectiveRequired)?;
        let status = present(&self.status).ok_or(ValidationError::StatusRequired)?;
        let request = CampaignRequest {
            name: name.to_string(),
            objective: parse_field("objective", objective)?,
            status: parse_field("status", status)?,
        };
        request.check()?;
        Ok(request)
    }
}

impl CampaignRequest {
    pub fn check(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::NameRequired);
        }
        Ok(())
    }
}

// ─── Ad set ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdSetForm {
    pub name: String,
    pub campaign_id: String,
    pub daily_budget: String,
    pub countries: Vec<String>,
    pub billing_event: String,
    pub bid_strategy: String,
    pub bid_amount: String,
    pub roas_average_floor: String,
    pub optimization_goal: String,
}

impl From<&AdSet> for AdSetForm {
    fn from(ad_set: &AdSet) -> Self {
        let text = |v: Option<String>| v.unwrap_or_default();
        Self {
            name: ad_set.name.clone(),
            campaign_id: ad_set.campaign_id.to_string(),
            daily_budget: ad_set.daily_budget.to_string(),
            countries: ad_set.countries.iter().map(|c| c.to_string()).collect(),
            billing_event: text(ad_set.billing_event.map(|e| e.to_string())),
            bid_strategy: text(ad_set.bid_strategy.map(|s| s.to_string())),
            bid_amount: text(ad_set.bid_amount.map(|v| v.to_string())),
            roas_average_floor: text(ad_set.roas_average_floor.map(|v| v.to_string())),
            optimization_goal: text(ad_set.optimization_goal.map(|g| g.to_string())),
        }
    }
}

impl Form for AdSetForm {
    type Request = AdSetRequest;

    fn validate(&self) -> Result<AdSetRequest, ValidationError> {
        let countries: Vec<&str> = self.countries.iter().filter_map(|c| present(c)).collect();
        let (Some(name), Some(campaign_id), Some(daily_budget), Some(billing_event), Some(bid_strategy)) = (
            present(&self.name),
            present(&self.campaign_id),
            present(&self.daily_budget),
            present(&self.billing_event),
            present(&self.bid_strategy),
        ) else {
            return Err(ValidationError::MissingFields);
        };
        if countries.is_empty() {
            return Err(ValidationError::MissingFields);
        }

        let campaign_id = parse_field::<EntityId>("campaign", campaign_id)?;
        let daily_budget = daily_budget
            .parse::<f64>()
            .map_err(|_| ValidationError::InvalidBudget)?;
        let countries = countries
            .into_iter()
            .map(|c| {
                Country::parse(c).ok_or_else(|| ValidationError::InvalidValue {
                    field: "country",
                    value: c.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let billing_event = parse_field("billing event", billing_event)?;
        let bid_strategy: BidStrategy = parse_field("bid strategy", bid_strategy)?;

        // Strategy-specific requirements are checked on the raw text so an
        // empty field reports the strategy message rather than a parse error.
        match bid_strategy {
            BidStrategy::LowestCostWithBidCap if present(&self.bid_amount).is_none() => {
                return Err(ValidationError::BidAmountRequired);
            }
            BidStrategy::LowestCostWithMinRoas
                if present(&self.roas_average_floor).is_none()
                    || present(&self.optimization_goal).is_none() =>
            {
                return Err(ValidationError::MinRoasFieldsRequired);
            }
            _ => {}
        }

        let request = AdSetRequest {
            name: name.to_string(),
            campaign_id,
            daily_budget,
            targeting: Some(Targeting::for_countries(&countries)),
            countries,
            billing_event,
            bid_strategy,
            bid_amount: optional_number("bid amount", &self.bid_amount)?,
            roas_average_floor: optional_number("ROAS average floor", &self.roas_average_floor)?,
            optimization_goal: present(&self.optimization_goal)
                .map(|g| parse_field("optimization goal", g))
                .transpose()?,
        };
        request.check()?;
        Ok(request)
    }
}

impl AdSetRequest {
    /// Rules every ad set payload must satisfy, whoever built it.
    pub fn check(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() || self.countries.is_empty() {
            return Err(ValidationError::MissingFields);
        }
        if !(self.daily_budget.is_finite() && self.daily_budget > 0.0) {
            return Err(ValidationError::InvalidBudget);
        }
        match self.bid_strategy {
            BidStrategy::LowestCostWithBidCap if self.bid_amount.is_none() => {
                Err(ValidationError::BidAmountRequired)
            }
            BidStrategy::LowestCostWithMinRoas
                if self.roas_average_floor.is_none() || self.optimization_goal.is_none() =>
            {
                Err(ValidationError::MinRoasFieldsRequired)
            }
            _ => Ok(()),
        }
    }
}

// ─── Creative ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdCreativeForm {
    pub name: String,
    pub link: String,
    pub message: String,
    pub image: String,
    pub caption: String,
    pub cta_type: String,
}

impl From<&AdCreative> for AdCreativeForm {
    fn from(creative: &AdCreative) -> Self {
        Self {
            name: creative.name.clone(),
            link: creative.link.clone(),
            message: creative.message.clone(),
            image: creative.image.clone(),
            caption: creative.caption.clone().unwrap_or_default(),
            cta_type: creative.cta_type.to_string(),
        }
    }
}

impl Form for AdCreativeForm {
    type Request = AdCreativeRequest;

    fn validate(&self) -> Result<AdCreativeRequest, ValidationError> {
        let (Some(name), Some(link), Some(message), Some(image), Some(caption), Some(cta_type)) = (
            present(&self.name),
            present(&self.link),
            present(&self.message),
            present(&self.image),
            present(&self.caption),
            present(&self.cta_type),
        ) else {
            return Err(ValidationError::MissingFields);
        };
        let request = AdCreativeRequest {
            name: name.to_string(),
            link: link.to_string(),
            message: message.to_string(),
            image: image.to_string(),
            caption: caption.to_string(),
            cta_type: parse_field("call to action", cta_type)?,
        };
        request.check()?;
        Ok(request)
    }
}

impl AdCreativeRequest {
    pub fn check(&self) -> Result<(), ValidationError> {
        let text = [&self.name, &self.link, &self.message, &self.image, &self.caption];
        if text.iter().any(|v| v.trim().is_empty()) {
            return Err(ValidationError::MissingFields);
        }
        Ok(())
    }
}

// ─── Ad ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdForm {
    pub name: String,
    pub ad_set_id: String,
    pub creative_id: String,
    pub status: String,
}

impl From<&Ad> for AdForm {
    fn from(ad: &Ad) -> Self {
        Self {
            name: ad.name.clone(),
            ad_set_id: ad.ad_group_id.to_string(),
            creative_id: ad.ad_creative_id.to_string(),
            status: ad.status.to_string(),
        }
    }
}

impl Form for AdForm {
    type Request = AdRequest;

    fn validate(&self) -> Result<AdRequest, ValidationError> {
        let (Some(name), Some(ad_set_id), Some(creative_id), Some(status)) = (
            present(&self.name),
            present(&self.ad_set_id),
            present(&self.creative_id),
            present(&self.status),
        ) else {
            return Err(ValidationError::MissingFields);
        };
        let request = AdRequest {
            name: name.to_string(),
            ad_set_id: parse_field("ad set", ad_set_id)?,
            creative_id: parse_field("creative", creative_id)?,
            status: parse_field("status", status)?,
        };
        request.check()?;
        Ok(request)
    }
}

impl AdRequest {
    pub fn check(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingFields);
        }
        Ok(())
    }
}

// ─── Credentials ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialsForm {
    pub email: String,
    pub password: String,
}

impl Form for CredentialsForm {
    type Request = Credentials;

    fn validate(&self) -> Result<Credentials, ValidationError> {
        // Passwords are taken verbatim; only emptiness is checked.
        match (present(&self.email), self.password.is_empty()) {
            (Some(email), false) => Ok(Credentials {
                email: email.to_string(),
                password: self.password.clone(),
            }),
            _ => Err(ValidationError::MissingCredentials),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bid_cap_form() -> AdSetForm {
        AdSetForm {
            name: "Prospecting".to_string(),
            campaign_id: "12".to_string(),
            daily_budget: "50".to_string(),
            countries: vec!["United States".to_string(), "CA".to_string()],
            billing_event: "IMPRESSIONS".to_string(),
            bid_strategy: "LOWEST_COST_WITH_BID_CAP".to_string(),
            bid_amount: "2.5".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_campaign_form_reports_first_missing_field() {
        let mut form = CampaignForm {
            name: "Summer".to_string(),
            ..Default::default()
        };
        assert_eq!(form.validate(), Err(ValidationError::ObjectiveRequired));
        form.objective = "OUTCOME_TRAFFIC".to_string();
        assert_eq!(form.validate(), Err(ValidationError::StatusRequired));
        form.status = "ACTIVE".to_string();
        let request = form.validate().unwrap();
        assert_eq!(request.objective, CampaignObjective::Traffic);
        assert_eq!(request.status, EntityStatus::Active);
    }

    #[test]
    fn test_campaign_form_rejects_unknown_objective() {
        let form = CampaignForm {
            name: "Summer".to_string(),
            objective: "OUTCOME_FAME".to_string(),
            status: "ACTIVE".to_string(),
        };
        assert_eq!(
            form.validate().unwrap_err().to_string(),
            "Invalid objective: OUTCOME_FAME"
        );
    }

    #[test]
    fn test_bid_cap_requires_bid_amount() {
        let mut form = bid_cap_form();
        form.bid_amount = "  ".to_string();
        let err = form.validate().unwrap_err();
        assert_eq!(err, ValidationError::BidAmountRequired);
        assert_eq!(
            err.to_string(),
            "Bid amount is required for the LOWEST_COST_WITH_BID_CAP strategy."
        );
    }

    #[test]
    fn test_min_roas_requires_floor_and_goal() {
        let mut form = bid_cap_form();
        form.bid_strategy = "LOWEST_COST_WITH_MIN_ROAS".to_string();
        form.bid_amount.clear();
        form.optimization_goal = "VALUE".to_string();
        assert_eq!(form.validate(), Err(ValidationError::MinRoasFieldsRequired));

        form.roas_average_floor = "1.5".to_string();
        form.optimization_goal.clear();
        assert_eq!(form.validate(), Err(ValidationError::MinRoasFieldsRequired));

        form.optimization_goal = "VALUE".to_string();
        let request = form.validate().unwrap();
        assert_eq!(request.roas_average_floor, Some(1.5));
        assert_eq!(request.optimization_goal, Some(OptimizationGoal::Value));
    }

    #[test]
    fn test_ad_set_form_builds_targeting() {
        let request = bid_cap_form().validate().unwrap();
        assert_eq!(request.campaign_id, 12);
        assert_eq!(request.countries, vec![Country::UnitedStates, Country::Canada]);
        assert_eq!(
            request.targeting.unwrap().geo_locations.countries,
            vec!["US", "CA"]
        );
    }

    #[test]
    fn test_ad_set_form_requires_base_fields() {
        let mut form = bid_cap_form();
        form.countries.clear();
        assert_eq!(form.validate(), Err(ValidationError::MissingFields));

        let mut form = bid_cap_form();
        form.daily_budget = "-3".to_string();
        assert_eq!(form.validate(), Err(ValidationError::InvalidBudget));
    }

    #[test]
    fn test_ad_set_form_round_trips_existing_entity() {
        let request = bid_cap_form().validate().unwrap();
        let ad_set = AdSet {
            id: 1,
            name: request.name.clone(),
            campaign_id: request.campaign_id,
            status: EntityStatus::Paused,
            daily_budget: request.daily_budget,
            countries: request.countries.clone(),
            billing_event: Some(request.billing_event),
            bid_strategy: Some(request.bid_strategy),
            bid_amount: request.bid_amount,
            roas_average_floor: None,
            optimization_goal: None,
            targeting: request.targeting.clone(),
            meta_ad_group_id: None,
            user_id: None,
        };
        assert_eq!(AdSetForm::from(&ad_set).validate(), Ok(request));
    }

    #[test]
    fn test_creative_and_ad_forms_require_all_fields() {
        let creative = AdCreativeForm {
            name: "Hero".to_string(),
            link: "https://shop.example".to_string(),
            message: "New arrivals".to_string(),
            image: "https://cdn.example/hero.png".to_string(),
            caption: String::new(),
            cta_type: "SHOP_NOW".to_string(),
        };
        assert_eq!(creative.validate(), Err(ValidationError::MissingFields));

        let ad = AdForm {
            name: "Hero ad".to_string(),
            ad_set_id: "3".to_string(),
            creative_id: "5".to_string(),
            status: "PAUSED".to_string(),
        };
        let request = ad.validate().unwrap();
        assert_eq!((request.ad_set_id, request.creative_id), (3, 5));
    }

    #[test]
    fn test_request_checks_reject_blank_names() {
        let campaign = CampaignRequest {
            name: " ".to_string(),
            objective: CampaignObjective::Traffic,
            status: EntityStatus::Active,
        };
        assert_eq!(campaign.check(), Err(ValidationError::NameRequired));

        let ad = AdRequest {
            name: String::new(),
            ad_set_id: 3,
            creative_id: 5,
            status: EntityStatus::Paused,
        };
        assert_eq!(ad.check(), Err(ValidationError::MissingFields));
        assert!(AdRequest { name: "Hero ad".to_string(), ..ad }.check().is_ok());
    }

    #[test]
    fn test_credentials_form() {
        let form = CredentialsForm {
            email: "ops@example.com".to_string(),
            password: String::new(),
        };
        assert_eq!(form.validate(), Err(ValidationError::MissingCredentials));
    }
}
