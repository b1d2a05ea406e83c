//! Command implementations. Each command is one short session against the
//! API: load what it needs, act, print the result.

use std::io::{self, BufRead, Write};

use ads_client::{AdsBackend, ApiClient, ClientError};
use ads_core::config::CascadeMode;
use ads_core::types::{Entity, EntityId, EntityKind};
use ads_core::validation::{AdCreativeForm, AdForm, AdSetForm, CampaignForm, CredentialsForm, Form};
use ads_dashboard::{
    fetch_entity, load_dashboard, load_section, submit_ad, submit_ad_creative, submit_ad_set,
    submit_campaign, Acknowledgment, Confirm, DeleteOutcome, DeleteRequest, DeleteWorkflow,
    EntityCache, FormAction, FormError, SectionView,
};
use clap::Args;
use tracing::info;

// ─── Field flags ───────────────────────────────────────────────────────────

#[derive(Args, Debug, Clone, Default)]
pub struct CampaignFields {
    #[arg(long)]
    pub name: Option<String>,

    /// e.g. OUTCOME_SALES
    #[arg(long)]
    pub objective: Option<String>,

    /// ACTIVE or PAUSED
    #[arg(long)]
    pub status: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct AdSetFields {
    #[arg(long)]
    pub name: Option<String>,

    /// Campaign id
    #[arg(long)]
    pub campaign: Option<String>,

    #[arg(long)]
    pub daily_budget: Option<String>,

    /// Country name or ISO code; repeat for several
    #[arg(long = "country")]
    pub countries: Vec<String>,

    #[arg(long)]
    pub billing_event: Option<String>,

    #[arg(long)]
    pub bid_strategy: Option<String>,

    #[arg(long)]
    pub bid_amount: Option<String>,

    #[arg(long)]
    pub roas_average_floor: Option<String>,

    #[arg(long)]
    pub optimization_goal: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct AdCreativeFields {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub link: Option<String>,

    #[arg(long)]
    pub message: Option<String>,

    /// Image URL
    #[arg(long)]
    pub image: Option<String>,

    #[arg(long)]
    pub caption: Option<String>,

    /// Call to action, e.g. SHOP_NOW
    #[arg(long)]
    pub cta: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct AdFields {
    #[arg(long)]
    pub name: Option<String>,

    /// Ad set id or exact name
    #[arg(long)]
    pub ad_set: Option<String>,

    /// Creative id or exact name
    #[arg(long)]
    pub creative: Option<String>,

    /// ACTIVE or PAUSED
    #[arg(long)]
    pub status: Option<String>,
}

/// A filled-in form of any kind, ready to submit.
#[derive(Debug, Clone, PartialEq)]
pub enum FormInput {
    Campaign(CampaignForm),
    AdSet(AdSetForm),
    AdCreative(AdCreativeForm),
    Ad(AdForm),
}

/// Flags for one entity kind, laid over a blank or prefilled form.
pub trait EntityFields {
    fn kind(&self) -> EntityKind;

    /// `current` is the entity being edited, `None` when creating.
    fn to_input(&self, current: Option<&Entity>) -> FormInput;
}

fn overlay(target: &mut String, value: &Option<String>) {
    if let Some(value) = value {
        *target = value.clone();
    }
}

impl EntityFields for CampaignFields {
    fn kind(&self) -> EntityKind {
        EntityKind::Campaign
    }

    fn to_input(&self, current: Option<&Entity>) -> FormInput {
        let mut form = match current {
            Some(Entity::Campaign(c)) => CampaignForm::from(c),
            _ => CampaignForm::default(),
        };
        overlay(&mut form.name, &self.name);
        overlay(&mut form.objective, &self.objective);
        overlay(&mut form.status, &self.status);
        FormInput::Campaign(form)
    }
}

impl EntityFields for AdSetFields {
    fn kind(&self) -> EntityKind {
        EntityKind::AdSet
    }

    fn to_input(&self, current: Option<&Entity>) -> FormInput {
        let mut form = match current {
            Some(Entity::AdSet(s)) => AdSetForm::from(s),
            _ => AdSetForm::default(),
        };
        overlay(&mut form.name, &self.name);
        overlay(&mut form.campaign_id, &self.campaign);
        overlay(&mut form.daily_budget, &self.daily_budget);
        if !self.countries.is_empty() {
            form.countries = self.countries.clone();
        }
        overlay(&mut form.billing_event, &self.billing_event);
        overlay(&mut form.bid_strategy, &self.bid_strategy);
        overlay(&mut form.bid_amount, &self.bid_amount);
        overlay(&mut form.roas_average_floor, &self.roas_average_floor);
        overlay(&mut form.optimization_goal, &self.optimization_goal);
        FormInput::AdSet(form)
    }
}

impl EntityFields for AdCreativeFields {
    fn kind(&self) -> EntityKind {
        EntityKind::AdCreative
    }

    fn to_input(&self, current: Option<&Entity>) -> FormInput {
        let mut form = match current {
            Some(Entity::AdCreative(c)) => AdCreativeForm::from(c),
            _ => AdCreativeForm::default(),
        };
        overlay(&mut form.name, &self.name);
        overlay(&mut form.link, &self.link);
        overlay(&mut form.message, &self.message);
        overlay(&mut form.image, &self.image);
        overlay(&mut form.caption, &self.caption);
        overlay(&mut form.cta_type, &self.cta);
        FormInput::AdCreative(form)
    }
}

impl EntityFields for AdFields {
    fn kind(&self) -> EntityKind {
        EntityKind::Ad
    }

    fn to_input(&self, current: Option<&Entity>) -> FormInput {
        let mut form = match current {
            Some(Entity::Ad(a)) => AdForm::from(a),
            _ => AdForm::default(),
        };
        overlay(&mut form.name, &self.name);
        overlay(&mut form.ad_set_id, &self.ad_set);
        overlay(&mut form.creative_id, &self.creative);
        overlay(&mut form.status, &self.status);
        FormInput::Ad(form)
    }
}

// ─── Confirmation ──────────────────────────────────────────────────────────

/// Asks on stdout and reads `y`/`yes` from stdin. Anything else declines.
struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&mut self, message: &str) -> bool {
        print!("{message} [y/N] ");
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(_) => false,
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// True when the error means the user has to log in (again).
pub fn needs_login(err: &anyhow::Error) -> bool {
    if let Some(e) = err.downcast_ref::<ClientError>() {
        return e.needs_login();
    }
    if let Some(e) = err.downcast_ref::<FormError>() {
        return e.needs_login();
    }
    false
}

// ─── Console ───────────────────────────────────────────────────────────────

pub struct Console {
    client: ApiClient,
    workflow: DeleteWorkflow,
}

impl Console {
    pub fn new(client: ApiClient, cascade: CascadeMode) -> Self {
        Self {
            client,
            workflow: DeleteWorkflow::new(cascade),
        }
    }

    pub async fn register(&self, email: &str, password: &str) -> anyhow::Result<()> {
        let credentials = credentials(email, password)?;
        let response = self.client.register(&credentials).await?;
        println!("{}", response.message);
        Ok(())
    }

    pub async fn login(&self, email: &str, password: &str) -> anyhow::Result<()> {
        let credentials = credentials(email, password)?;
        let response = self.client.login(&credentials).await?;
        println!("Logged in as {}", response.user.email);
        Ok(())
    }

    pub fn logout(&self) {
        self.client.logout();
        println!("Logged out.");
    }

    pub async fn dashboard(&self) -> anyhow::Result<()> {
        self.client.session().require()?;
        let cache = load_dashboard(&self.client).await?;
        for section in SectionView::dashboard(&cache) {
            println!("{section}");
        }
        Ok(())
    }

    pub async fn list(&self, kind: EntityKind) -> anyhow::Result<()> {
        self.client.session().require()?;
        let cache = load_section(&self.client, kind).await?;
        print!("{}", SectionView::build(&cache, kind));
        Ok(())
    }

    pub async fn create(&self, fields: &dyn EntityFields) -> anyhow::Result<()> {
        self.client.session().require()?;
        let input = fields.to_input(None);
        let ack = self.submit(FormAction::Create, input).await?;
        print_ack(&ack);
        Ok(())
    }

    pub async fn edit(&self, id: EntityId, fields: &dyn EntityFields) -> anyhow::Result<()> {
        self.client.session().require()?;
        let current = fetch_entity(&self.client, fields.kind(), id).await?;
        let input = fields.to_input(Some(&current));
        let ack = self.submit(FormAction::Update(id), input).await?;
        print_ack(&ack);
        Ok(())
    }

    pub async fn delete(&self, kind: EntityKind, id: EntityId, yes: bool) -> anyhow::Result<()> {
        self.client.session().require()?;
        let mut cache = load_dashboard(&self.client).await?;
        let entity = cache
            .get(kind, id)
            .ok_or_else(|| anyhow::anyhow!("{} {id} not found", kind.noun()))?;
        let request = DeleteRequest::for_entity(&entity);

        let outcome = if yes {
            self.workflow
                .run(&self.client, &mut cache, request, &mut |_: &str| true)
                .await?
        } else {
            self.workflow
                .run(&self.client, &mut cache, request, &mut StdinConfirm)
                .await?
        };

        match outcome {
            DeleteOutcome::Cancelled => println!("Delete cancelled."),
            DeleteOutcome::Deleted(removed) => {
                info!(kind = %kind, id, "Deleted");
                println!("{} deleted successfully. Removed {removed}.", kind.noun());
            }
            DeleteOutcome::Failed(e) => return Err(e.into()),
        }
        Ok(())
    }

    async fn submit(&self, action: FormAction, input: FormInput) -> Result<Acknowledgment, FormError> {
        let mut cache = EntityCache::new();
        match input {
            FormInput::Campaign(form) => submit_campaign(&self.client, &mut cache, action, &form).await,
            FormInput::AdSet(form) => submit_ad_set(&self.client, &mut cache, action, &form).await,
            FormInput::AdCreative(form) => {
                submit_ad_creative(&self.client, &mut cache, action, &form).await
            }
            FormInput::Ad(mut form) => {
                self.resolve_ad_references(&mut form).await?;
                submit_ad(&self.client, &mut cache, action, &form).await
            }
        }
    }

    /// Ad set and creative may be given by name; swap names for ids using
    /// the same option lists the ad form offers.
    async fn resolve_ad_references(&self, form: &mut AdForm) -> Result<(), ClientError> {
        if needs_lookup(&form.ad_set_id) {
            let options = self.client.ad_set_options().await?;
            let pairs = options.iter().map(|s| (s.id, s.name.as_str()));
            form.ad_set_id = resolve_reference(&form.ad_set_id, pairs);
        }
        if needs_lookup(&form.creative_id) {
            let creatives = self.client.list_ad_creatives().await?;
            let pairs = creatives.iter().map(|c| (c.id, c.name.as_str()));
            form.creative_id = resolve_reference(&form.creative_id, pairs);
        }
        Ok(())
    }
}

fn credentials(email: &str, password: &str) -> Result<ads_core::types::Credentials, FormError> {
    let form = CredentialsForm {
        email: email.to_string(),
        password: password.to_string(),
    };
    Ok(form.validate()?)
}

fn needs_lookup(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && value.parse::<EntityId>().is_err()
}

/// The id of the option named `value`, or `value` unchanged so validation
/// reports it.
fn resolve_reference<'a>(value: &str, options: impl IntoIterator<Item = (EntityId, &'a str)>) -> String {
    let wanted = value.trim();
    options
        .into_iter()
        .find(|(_, name)| *name == wanted)
        .map(|(id, _)| id.to_string())
        .unwrap_or_else(|| value.to_string())
}

fn print_ack(ack: &Acknowledgment) {
    println!("{}", ack.message);
    println!("[{}] {}", ack.entity.id(), ack.entity.name());
    println!("{}", ack.back_hint());
}
