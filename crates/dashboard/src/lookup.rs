use std::collections::HashMap;

use ads_core::types::{EntityId, EntityKind};

use crate::cache::EntityCache;

/// Shown for a reference whose target is not in the loaded snapshot.
pub const UNKNOWN: &str = "Unknown";

/// id -> display name for one entity kind, built from a snapshot.
///
/// Rebuilt on every render; it never outlives the data it was built from.
#[derive(Debug, Clone, Default)]
pub struct NameLookup {
    names: HashMap<EntityId, String>,
}

impl NameLookup {
    pub fn of(cache: &EntityCache, kind: EntityKind) -> Self {
        Self::from_pairs(cache.names(kind))
    }

    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (EntityId, &'a str)>) -> Self {
        Self {
            names: pairs
                .into_iter()
                .map(|(id, name)| (id, name.to_string()))
                .collect(),
        }
    }

    pub fn resolve(&self, id: EntityId) -> &str {
        self.names.get(&id).map(String::as_str).unwrap_or(UNKNOWN)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixture;

    #[test]
    fn test_resolves_loaded_names() {
        let lookup = NameLookup::of(&fixture(), EntityKind::Campaign);
        assert_eq!(lookup.len(), 2);
        assert_eq!(lookup.resolve(1), "Spring Sale");
    }

    #[test]
    fn test_absent_id_is_unknown() {
        let lookup = NameLookup::of(&fixture(), EntityKind::AdSet);
        assert_eq!(lookup.resolve(404), "Unknown");
        assert_eq!(NameLookup::default().resolve(1), UNKNOWN);
    }
}
