//! Plain-text list sections for the terminal front end.

use std::fmt;

use ads_core::types::{EntityId, EntityKind};

use crate::cache::EntityCache;
use crate::lookup::NameLookup;

#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    pub id: EntityId,
    pub name: String,
    /// Label/value pairs shown after the name.
    pub fields: Vec<(&'static str, String)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SectionView {
    pub kind: EntityKind,
    pub rows: Vec<RowView>,
}

impl SectionView {
    /// Build one section, resolving cross-references against the same snapshot.
    pub fn build(cache: &EntityCache, kind: EntityKind) -> Self {
        let rows = match kind {
            EntityKind::Campaign => cache
                .campaigns()
                .map(|c| RowView {
                    id: c.id,
                    name: c.name.clone(),
                    fields: vec![
                        ("Objective", c.objective.label().to_string()),
                        ("Status", c.status.to_string()),
                    ],
                })
                .collect(),
            EntityKind::AdSet => {
                let campaigns = NameLookup::of(cache, EntityKind::Campaign);
                cache
                    .ad_sets()
                    .map(|s| RowView {
                        id: s.id,
                        name: s.name.clone(),
                        fields: vec![
                            ("Campaign", campaigns.resolve(s.campaign_id).to_string()),
                            ("Daily budget", format!("{:.2}", s.daily_budget)),
                            ("Status", s.status.to_string()),
                        ],
                    })
                    .collect()
            }
            EntityKind::AdCreative => cache
                .ad_creatives()
                .map(|c| RowView {
                    id: c.id,
                    name: c.name.clone(),
                    fields: vec![
                        ("Call to action", c.cta_type.to_string()),
                        ("Link", c.link.clone()),
                    ],
                })
                .collect(),
            EntityKind::Ad => {
                let ad_sets = NameLookup::of(cache, EntityKind::AdSet);
                let creatives = NameLookup::of(cache, EntityKind::AdCreative);
                cache
                    .ads()
                    .map(|a| RowView {
                        id: a.id,
                        name: a.name.clone(),
                        fields: vec![
                            ("Ad set", ad_sets.resolve(a.ad_group_id).to_string()),
                            ("Creative", creatives.resolve(a.ad_creative_id).to_string()),
                            ("Status", a.status.to_string()),
                        ],
                    })
                    .collect()
            }
        };
        Self { kind, rows }
    }

    /// All four sections in dashboard order.
    pub fn dashboard(cache: &EntityCache) -> Vec<Self> {
        EntityKind::ALL
            .iter()
            .map(|kind| Self::build(cache, *kind))
            .collect()
    }

    pub fn title(&self) -> &'static str {
        self.kind.title()
    }

    pub fn empty_message(&self) -> String {
        format!("No {} available.", self.title().to_lowercase())
    }
}

impl fmt::Display for SectionView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title())?;
        if self.rows.is_empty() {
            return writeln!(f, "  {}", self.empty_message());
        }
        for row in &self.rows {
            write!(f, "  [{}] {}", row.id, row.name)?;
            for (label, value) in &row.fields {
                write!(f, " | {label}: {value}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::Mutation;
    use crate::testing::{ad, fixture};
    use ads_core::types::Entity;

    #[test]
    fn test_ad_rows_resolve_references() {
        let mut cache = fixture();
        cache.apply(Mutation::Upsert(Entity::Ad(ad(300, 77, 51, "Orphan"))));

        let section = SectionView::build(&cache, EntityKind::Ad);
        let orphan = section.rows.iter().find(|r| r.id == 300).unwrap();
        assert_eq!(orphan.fields[0], ("Ad set", "Unknown".to_string()));
        assert_eq!(orphan.fields[1], ("Creative", "Carousel".to_string()));

        let first = &section.rows[0];
        assert_eq!(first.fields[0].1, "US Prospecting");
    }

    #[test]
    fn test_empty_section_message() {
        let sections = SectionView::dashboard(&EntityCache::new());
        assert_eq!(sections.len(), 4);
        let text = sections[1].to_string();
        assert_eq!(text, "Ad Sets\n  No ad sets available.\n");
    }

    #[test]
    fn test_ad_set_row_rendering() {
        let text = SectionView::build(&fixture(), EntityKind::AdSet).to_string();
        assert!(text.contains("[10] US Prospecting | Campaign: Spring Sale | Daily budget: 40.00"));
    }
}
