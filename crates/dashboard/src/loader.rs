use ads_client::{AdsBackend, ClientResult};
use ads_core::types::EntityKind;
use tracing::{debug, info};

use crate::cache::EntityCache;

/// Fetch all four collections concurrently.
///
/// All-or-nothing: if any fetch fails, that error is returned and nothing
/// from the other fetches is kept.
pub async fn load_dashboard(backend: &dyn AdsBackend) -> ClientResult<EntityCache> {
    let (campaigns, ad_sets, ad_creatives, ads) = tokio::try_join!(
        backend.list_campaigns(),
        backend.list_ad_sets(),
        backend.list_ad_creatives(),
        backend.list_ads(),
    )?;
    info!(
        campaigns = campaigns.len(),
        ad_sets = ad_sets.len(),
        ad_creatives = ad_creatives.len(),
        ads = ads.len(),
        "Dashboard loaded"
    );
    Ok(EntityCache::from_parts(campaigns, ad_sets, ad_creatives, ads))
}

/// Fetch one list section plus the collections its rows refer to.
pub async fn load_section(backend: &dyn AdsBackend, kind: EntityKind) -> ClientResult<EntityCache> {
    let cache = match kind {
        EntityKind::Campaign => {
            EntityCache::from_parts(backend.list_campaigns().await?, vec![], vec![], vec![])
        }
        EntityKind::AdSet => {
            let (ad_sets, campaigns) =
                tokio::try_join!(backend.list_ad_sets(), backend.list_campaigns())?;
            EntityCache::from_parts(campaigns, ad_sets, vec![], vec![])
        }
        EntityKind::AdCreative => {
            EntityCache::from_parts(vec![], vec![], backend.list_ad_creatives().await?, vec![])
        }
        EntityKind::Ad => {
            let (ads, ad_sets, ad_creatives) = tokio::try_join!(
                backend.list_ads(),
                backend.list_ad_sets(),
                backend.list_ad_creatives()
            )?;
            EntityCache::from_parts(vec![], ad_sets, ad_creatives, ads)
        }
    };
    debug!(section = kind.title(), rows = cache.len(kind), "Section loaded");
    Ok(cache)
}
