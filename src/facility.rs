use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard};

use crate::network::StationId;
use crate::profile::{FacilityCounts, Profile, ProfileWeights};

/// One `updateFacilityCounts` row (spec §6): the nine counters to install for a set of
/// station codes (an interchange hub's line-records typically share physical facilities).
pub struct FacilityUpdateRow {
    pub station_codes: Vec<String>,
    pub counts: FacilityCounts,
}

// Convenience score for a station absent from the table: sigmoid(0) == 0.5, the same
// midpoint a station with all-zero facility counts would get.
const DEFAULT_CONVENIENCE: f32 = 0.5;

/// Per-station, per-profile convenience scores, recomputed from facility counts and guarded
/// by a readers-writer lock so a search sees one consistent snapshot start to finish (C2,
/// spec §4.2, §5).
pub struct FacilityScoreService {
    // [PHY, VIS, AUD, ELD] score per station.
    scores: RwLock<HashMap<StationId, [f32; 4]>>,
}

impl FacilityScoreService {
    pub fn new() -> Self {
        Self { scores: RwLock::new(HashMap::new()) }
    }

    pub fn convenience(&self, station: StationId, profile: Profile) -> f32 {
        self.snapshot().convenience(station, profile)
    }

    /// Takes the reader lock and holds it in the returned guard. A search acquires one
    /// snapshot at the start of propagation and holds it throughout, so the convenience
    /// values it sees never change mid-search even if a facility update runs concurrently
    /// (spec §4.2, §5, §8 "A facility update concurrent with an in-flight search...").
    pub fn snapshot(&self) -> FacilitySnapshot<'_> {
        FacilitySnapshot { table: self.scores.read().expect("facility score lock poisoned") }
    }

    /// Recompute and atomically install convenience scores for the affected stations.
    /// Station codes not present in the network are skipped, not an error (spec §7).
    pub fn update_facility_counts(&self, rows: &[FacilityUpdateRow], network: &crate::network::Network, weights: &ProfileWeights) {
        let mut recomputed = Vec::with_capacity(rows.iter().map(|r| r.station_codes.len()).sum());
        for row in rows {
            for code in &row.station_codes {
                let Ok(station) = network.station_id(code) else {
                    log::debug!("facility update references unknown station code {code}, skipping");
                    continue;
                };
                let mut scores = [0.0; 4];
                for profile in Profile::ALL {
                    scores[profile.index()] = weights.convenience_score(profile, row.counts);
                }
                recomputed.push((station, scores));
            }
        }

        let mut table = self.scores.write().expect("facility score lock poisoned");
        for (station, scores) in recomputed {
            table.insert(station, scores);
        }
    }
}

impl Default for FacilityScoreService {
    fn default() -> Self {
        Self::new()
    }
}

/// A consistent read-only view of convenience scores, held for the duration of one search.
pub struct FacilitySnapshot<'a> {
    table: RwLockReadGuard<'a, HashMap<StationId, [f32; 4]>>,
}

impl FacilitySnapshot<'_> {
    pub fn convenience(&self, station: StationId, profile: Profile) -> f32 {
        self.table.get(&station).map(|row| row[profile.index()]).unwrap_or(DEFAULT_CONVENIENCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::NetworkBuilder;
    use std::sync::Arc;

    #[test]
    fn missing_station_defaults_to_midpoint() {
        let service = FacilityScoreService::new();
        assert_eq!(service.convenience(0, Profile::Phy), DEFAULT_CONVENIENCE);
    }

    #[test]
    fn update_is_visible_after_write_lock_released() {
        let mut builder = NetworkBuilder::new();
        let station = builder.add_station("S1", "Station One", Arc::from("1호선"), 37.0, 127.0);
        let network = builder.build();
        let weights = ProfileWeights::new(1.0, 0.08);
        let service = FacilityScoreService::new();

        let before = service.convenience(station, Profile::Phy);

        service.update_facility_counts(
            &[FacilityUpdateRow { station_codes: vec!["S1".to_owned()], counts: FacilityCounts { elevator: 5.0, ..Default::default() } }],
            &network,
            &weights,
        );

        let after = service.convenience(station, Profile::Phy);
        assert_ne!(before, after);
        assert!(after > before);
    }

    #[test]
    fn unknown_station_code_in_update_is_skipped_not_an_error() {
        let network = NetworkBuilder::new().build();
        let weights = ProfileWeights::new(1.0, 0.08);
        let service = FacilityScoreService::new();
        service.update_facility_counts(&[FacilityUpdateRow { station_codes: vec!["ghost".to_owned()], counts: FacilityCounts::default() }], &network, &weights);
    }
}
