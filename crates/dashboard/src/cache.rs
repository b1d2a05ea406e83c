//! Last-fetched snapshot of the four collections, keyed by entity id.

use std::collections::BTreeMap;

use ads_core::types::{Ad, AdCreative, AdSet, Campaign, Entity, EntityId, EntityKind, Removal};

/// A local change to the snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// Insert or replace one entity.
    Upsert(Entity),
    /// Remove one entity and everything that depends on it.
    Delete { kind: EntityKind, id: EntityId },
    /// Remove exactly the listed ids, e.g. what the backend reported removing.
    Purge(Removal),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityCache {
    campaigns: BTreeMap<EntityId, Campaign>,
    ad_sets: BTreeMap<EntityId, AdSet>,
    ad_creatives: BTreeMap<EntityId, AdCreative>,
    ads: BTreeMap<EntityId, Ad>,
}

impl EntityCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(
        campaigns: Vec<Campaign>,
        ad_sets: Vec<AdSet>,
        ad_creatives: Vec<AdCreative>,
        ads: Vec<Ad>,
    ) -> Self {
        Self {
            campaigns: campaigns.into_iter().map(|c| (c.id, c)).collect(),
            ad_sets: ad_sets.into_iter().map(|s| (s.id, s)).collect(),
            ad_creatives: ad_creatives.into_iter().map(|c| (c.id, c)).collect(),
            ads: ads.into_iter().map(|a| (a.id, a)).collect(),
        }
    }

    pub fn campaigns(&self) -> impl Iterator<Item = &Campaign> {
        self.campaigns.values()
    }

    pub fn ad_sets(&self) -> impl Iterator<Item = &AdSet> {
        self.ad_sets.values()
    }

    pub fn ad_creatives(&self) -> impl Iterator<Item = &AdCreative> {
        self.ad_creatives.values()
    }

    pub fn ads(&self) -> impl Iterator<Item = &Ad> {
        self.ads.values()
    }

    pub fn len(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Campaign => self.campaigns.len(),
            EntityKind::AdSet => self.ad_sets.len(),
            EntityKind::AdCreative => self.ad_creatives.len(),
            EntityKind::Ad => self.ads.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        EntityKind::ALL.iter().all(|kind| self.len(*kind) == 0)
    }

    pub fn contains(&self, kind: EntityKind, id: EntityId) -> bool {
        match kind {
            EntityKind::Campaign => self.campaigns.contains_key(&id),
            EntityKind::AdSet => self.ad_sets.contains_key(&id),
            EntityKind::AdCreative => self.ad_creatives.contains_key(&id),
            EntityKind::Ad => self.ads.contains_key(&id),
        }
    }

    pub fn get(&self, kind: EntityKind, id: EntityId) -> Option<Entity> {
        match kind {
            EntityKind::Campaign => self.campaigns.get(&id).cloned().map(Entity::Campaign),
            EntityKind::AdSet => self.ad_sets.get(&id).cloned().map(Entity::AdSet),
            EntityKind::AdCreative => self.ad_creatives.get(&id).cloned().map(Entity::AdCreative),
            EntityKind::Ad => self.ads.get(&id).cloned().map(Entity::Ad),
        }
    }

    pub fn name_of(&self, kind: EntityKind, id: EntityId) -> Option<&str> {
        match kind {
            EntityKind::Campaign => self.campaigns.get(&id).map(|c| c.name.as_str()),
            EntityKind::AdSet => self.ad_sets.get(&id).map(|s| s.name.as_str()),
            EntityKind::AdCreative => self.ad_creatives.get(&id).map(|c| c.name.as_str()),
            EntityKind::Ad => self.ads.get(&id).map(|a| a.name.as_str()),
        }
    }

    /// (id, name) pairs for one kind, in id order.
    pub fn names(&self, kind: EntityKind) -> Vec<(EntityId, &str)> {
        match kind {
            EntityKind::Campaign => self.campaigns.values().map(|c| (c.id, c.name.as_str())).collect(),
            EntityKind::AdSet => self.ad_sets.values().map(|s| (s.id, s.name.as_str())).collect(),
            EntityKind::AdCreative => {
                self.ad_creatives.values().map(|c| (c.id, c.name.as_str())).collect()
            }
            EntityKind::Ad => self.ads.values().map(|a| (a.id, a.name.as_str())).collect(),
        }
    }

    /// Cached ads that use the given creative.
    pub fn ads_for_creative(&self, creative_id: EntityId) -> Vec<EntityId> {
        self.ads
            .values()
            .filter(|ad| ad.ad_creative_id == creative_id)
            .map(|ad| ad.id)
            .collect()
    }

    /// What deleting `(kind, id)` removes from this snapshot.
    ///
    /// The root is always listed, even when it is not cached.
    pub fn cascade_preview(&self, kind: EntityKind, id: EntityId) -> Removal {
        let mut removal = Removal::default();
        removal.push(kind, id);
        match kind {
            EntityKind::Campaign => {
                for ad_set in self.ad_sets.values().filter(|s| s.campaign_id == id) {
                    removal.push(EntityKind::AdSet, ad_set.id);
                }
                let ad_sets = removal.ad_sets.clone();
                for ad in self.ads.values().filter(|a| ad_sets.contains(&a.ad_group_id)) {
                    removal.push(EntityKind::Ad, ad.id);
                }
            }
            EntityKind::AdSet => {
                for ad in self.ads.values().filter(|a| a.ad_group_id == id) {
                    removal.push(EntityKind::Ad, ad.id);
                }
            }
            EntityKind::AdCreative => {
                for ad_id in self.ads_for_creative(id) {
                    removal.push(EntityKind::Ad, ad_id);
                }
            }
            EntityKind::Ad => {}
        }
        removal
    }

    /// Apply one mutation and report the ids that were actually removed.
    pub fn apply(&mut self, mutation: Mutation) -> Removal {
        match mutation {
            Mutation::Upsert(entity) => {
                match entity {
                    Entity::Campaign(c) => {
                        self.campaigns.insert(c.id, c);
                    }
                    Entity::AdSet(s) => {
                        self.ad_sets.insert(s.id, s);
                    }
                    Entity::AdCreative(c) => {
                        self.ad_creatives.insert(c.id, c);
                    }
                    Entity::Ad(a) => {
                        self.ads.insert(a.id, a);
                    }
                }
                Removal::default()
            }
            Mutation::Delete { kind, id } => {
                let planned = self.cascade_preview(kind, id);
                self.remove_all(&planned)
            }
            Mutation::Purge(listed) => self.remove_all(&listed),
        }
    }

    fn remove_all(&mut self, listed: &Removal) -> Removal {
        let mut removed = Removal::default();
        for kind in EntityKind::ALL {
            for id in listed.ids(kind) {
                let present = match kind {
                    EntityKind::Campaign => self.campaigns.remove(id).is_some(),
                    EntityKind::AdSet => self.ad_sets.remove(id).is_some(),
                    EntityKind::AdCreative => self.ad_creatives.remove(id).is_some(),
                    EntityKind::Ad => self.ads.remove(id).is_some(),
                };
                if present {
                    removed.push(kind, *id);
                }
            }
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixture;

    #[test]
    fn test_campaign_delete_cascades_through_ad_sets() {
        let mut cache = fixture();
        let removed = cache.apply(Mutation::Delete {
            kind: EntityKind::Campaign,
            id: 1,
        });

        assert_eq!(removed.campaigns, vec![1]);
        assert_eq!(removed.ad_sets, vec![10, 11]);
        assert_eq!(removed.ads, vec![100, 101, 102]);
        assert!(removed.ad_creatives.is_empty());
        // The other campaign's tree is untouched.
        assert!(cache.contains(EntityKind::Campaign, 2));
        assert!(cache.contains(EntityKind::AdSet, 20));
        assert!(cache.contains(EntityKind::Ad, 200));
        assert_eq!(cache.len(EntityKind::AdCreative), 2);
    }

    #[test]
    fn test_ad_set_delete_drops_its_ads() {
        let mut cache = fixture();
        let removed = cache.apply(Mutation::Delete {
            kind: EntityKind::AdSet,
            id: 10,
        });
        assert_eq!(removed.ad_sets, vec![10]);
        assert_eq!(removed.ads, vec![100, 101]);
        assert!(cache.contains(EntityKind::Campaign, 1));
        assert!(cache.contains(EntityKind::Ad, 102));
    }

    #[test]
    fn test_creative_delete_drops_referencing_ads() {
        let mut cache = fixture();
        assert_eq!(cache.ads_for_creative(50), vec![100, 102, 200]);
        let removed = cache.apply(Mutation::Delete {
            kind: EntityKind::AdCreative,
            id: 50,
        });
        assert_eq!(removed.ad_creatives, vec![50]);
        assert_eq!(removed.ads, vec![100, 102, 200]);
        assert_eq!(cache.len(EntityKind::Ad), 1);
    }

    #[test]
    fn test_preview_lists_uncached_root() {
        let cache = EntityCache::new();
        let preview = cache.cascade_preview(EntityKind::Ad, 9);
        assert_eq!(preview.ads, vec![9]);

        let mut cache = cache;
        assert!(cache
            .apply(Mutation::Delete {
                kind: EntityKind::Ad,
                id: 9
            })
            .is_empty());
    }

    #[test]
    fn test_upsert_and_purge() {
        let mut cache = fixture();
        let mut ad = match cache.get(EntityKind::Ad, 101) {
            Some(Entity::Ad(ad)) => ad,
            other => panic!("unexpected {other:?}"),
        };
        ad.name = "Renamed".to_string();
        cache.apply(Mutation::Upsert(Entity::Ad(ad)));
        assert_eq!(cache.name_of(EntityKind::Ad, 101), Some("Renamed"));

        let mut listed = Removal::default();
        listed.push(EntityKind::Ad, 101);
        listed.push(EntityKind::Ad, 999);
        let removed = cache.apply(Mutation::Purge(listed));
        assert_eq!(removed.ads, vec![101]);
    }
}
