use std::collections::HashMap;

use crate::models::{
    ActivityCount, EstablishmentFeature, EstablishmentProperties, EstablishmentSummary,
    SectorGroup, SizeCount,
};

/// Key extraction strategy for the sector rollup
pub trait SectorKey {
    fn key(&self, properties: &EstablishmentProperties) -> String;
}

/// SCIAN sector: first two characters of `codigo_act`
#[derive(Debug, Clone, Copy, Default)]
pub struct ScianSector;

impl SectorKey for ScianSector {
    fn key(&self, properties: &EstablishmentProperties) -> String {
        code_prefix(&properties.codigo_act, 2)
    }
}

/// SCIAN subsector: first three characters of `codigo_act`
#[derive(Debug, Clone, Copy, Default)]
pub struct ScianSubsector;

impl SectorKey for ScianSubsector {
    fn key(&self, properties: &EstablishmentProperties) -> String {
        code_prefix(&properties.codigo_act, 3)
    }
}

impl<F> SectorKey for F
where
    F: Fn(&EstablishmentProperties) -> String,
{
    fn key(&self, properties: &EstablishmentProperties) -> String {
        self(properties)
    }
}

/// Codes shorter than `len` are used whole
fn code_prefix(code: &str, len: usize) -> String {
    code.chars().take(len).collect()
}

/// Group establishments by SCIAN sector, activity and size bucket
pub fn group_establishments(features: &[EstablishmentFeature]) -> EstablishmentSummary {
    group_establishments_by(features, &ScianSector)
}

/// Group establishments using a custom sector key
///
/// Sector and size groups appear in first-encounter order; activities are
/// sorted by count descending, ties in first-encounter order.
pub fn group_establishments_by<K: SectorKey + ?Sized>(
    features: &[EstablishmentFeature],
    sector_key: &K,
) -> EstablishmentSummary {
    let mut by_sector: Vec<SectorGroup> = Vec::new();
    let mut sector_index: HashMap<String, usize> = HashMap::new();

    for feature in features {
        let sector = sector_key.key(&feature.properties);
        let slot = *sector_index.entry(sector.clone()).or_insert_with(|| {
            by_sector.push(SectorGroup {
                sector,
                count: 0,
                names: Vec::new(),
                members: Vec::new(),
            });
            by_sector.len() - 1
        });

        let group = &mut by_sector[slot];
        group.count += 1;
        group.names.push(feature.properties.nom_estab.clone());
        group.members.push(feature.clone());
    }

    let mut by_activity: Vec<ActivityCount> =
        count_in_encounter_order(features, |p| &p.nombre_act)
            .into_iter()
            .map(|(activity, count)| ActivityCount { activity, count })
            .collect();
    // Stable sort keeps encounter order among equal counts
    by_activity.sort_by(|a, b| b.count.cmp(&a.count));

    let by_size = count_in_encounter_order(features, |p| &p.per_ocu)
        .into_iter()
        .map(|(size, count)| SizeCount { size, count })
        .collect();

    tracing::debug!(
        "Grouped {} establishments into {} sectors",
        features.len(),
        by_sector.len()
    );

    EstablishmentSummary {
        by_sector,
        by_activity,
        by_size,
        total: features.len(),
        raw: features.to_vec(),
    }
}

fn count_in_encounter_order<F>(features: &[EstablishmentFeature], field: F) -> Vec<(String, usize)>
where
    F: Fn(&EstablishmentProperties) -> &String,
{
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for feature in features {
        let value = field(&feature.properties);
        match index.get(value.as_str()) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                index.insert(value.as_str(), counts.len());
                counts.push((value.clone(), 1));
            }
        }
    }

    counts
}
