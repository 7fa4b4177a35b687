pub mod config;
pub mod dataset;
pub mod error;
pub mod facility;
pub mod itinerary;
pub mod label;
pub mod network;
pub mod profile;
pub mod search;

pub use config::EngineConfig;
pub use dataset::Dataset;
pub use error::{RouterError, RouterResult};
pub use facility::FacilityUpdateRow;
pub use itinerary::RankedItinerary;
pub use network::Network;
pub use profile::Profile;

use search::RouteRequest;

const RANKED_RESULT_LIMIT: usize = 3;

/// The process-lifetime entry point (spec §6): owns the topology, the live convenience
/// scores, and the weighting tables, and serves `find_routes`/`update_facility_counts`
/// against them for as long as the process runs.
pub struct Router {
    dataset: Dataset,
    config: EngineConfig,
}

impl Router {
    pub fn new(dataset: Dataset, config: EngineConfig) -> Self {
        Self { dataset, config }
    }

    /// `findRoutes` (spec §6). `max_rounds = None` falls back to `config.default_max_rounds`;
    /// a caller-supplied `Some(0)` is honored verbatim (spec §8: "`maxRounds = 0` ⇒ empty
    /// unless origin is a destination").
    pub fn find_routes(
        &self,
        origin: &str,
        destinations: &[&str],
        departure_epoch_seconds: i64,
        profile: Profile,
        max_rounds: Option<usize>,
    ) -> RouterResult<Vec<RankedItinerary>> {
        let engine = search::SearchEngine::new(&self.dataset.network, &self.dataset.facility, &self.dataset.profile_weights, &self.config);
        let request = RouteRequest {
            origin,
            destinations,
            departure_epoch_seconds,
            profile,
            max_rounds: max_rounds.unwrap_or(self.config.default_max_rounds),
        };
        let result = engine.search(&request)?;
        let weights = self.dataset.profile_weights.weights(profile);
        Ok(itinerary::rank_itineraries(&result.pool, &self.dataset.network, &result.destination_labels, &weights, RANKED_RESULT_LIMIT))
    }

    /// `updateFacilityCounts` (spec §6). Applies atomically under the facility service's
    /// write lock; unknown station codes in a row are skipped, not an error (spec §7).
    pub fn update_facility_counts(&self, rows: &[FacilityUpdateRow]) {
        self.dataset.facility.update_facility_counts(rows, &self.dataset.network, &self.dataset.profile_weights);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{DatasetTables, StationOrderRow, StationRow, TransferRow};
    use crate::network::DayClass;
    use crate::search::day_class_and_bucket;

    fn fixture_tables() -> DatasetTables {
        DatasetTables {
            stations: vec![
                StationRow { code: "G".into(), name: "Gangnam".into(), line: "2호선".into(), lat: 37.4979, lon: 127.0276 },
                StationRow { code: "S".into(), name: "SeoulStation".into(), line: "2호선".into(), lat: 37.5547, lon: 126.9707 },
            ],
            station_order: vec![
                StationOrderRow { station_code: "G".into(), line: "2호선".into(), order: 0, is_loop: false },
                StationOrderRow { station_code: "S".into(), line: "2호선".into(), order: 1, is_loop: false },
            ],
            transfers: vec![],
            congestion: vec![],
            facility_counts: vec![],
        }
    }

    fn router() -> Router {
        let config = EngineConfig::default();
        let dataset = Dataset::from_tables(fixture_tables(), &config).unwrap();
        Router::new(dataset, config)
    }

    #[test]
    fn reaches_destination_on_single_line() {
        let router = router();
        let itineraries = router.find_routes("G", &["S"], 1705287600, Profile::Phy, Some(5)).unwrap();
        assert!(!itineraries.is_empty());
        assert_eq!(itineraries[0].route_sequence.first().unwrap(), "G");
        assert_eq!(itineraries[0].route_sequence.last().unwrap(), "S");
        assert_eq!(itineraries[0].rank, 1);
    }

    #[test]
    fn origin_equal_to_destination_is_trivial_not_an_error() {
        let router = router();
        let itineraries = router.find_routes("G", &["G"], 1705287600, Profile::Aud, Some(5)).unwrap();
        assert_eq!(itineraries.len(), 1);
        assert_eq!(itineraries[0].total_time_minutes, 0.0);
        assert_eq!(itineraries[0].transfers, 0);
        assert_eq!(itineraries[0].route_sequence, vec!["G".to_owned()]);
    }

    #[test]
    fn unknown_destination_code_is_an_error() {
        let router = router();
        assert!(matches!(router.find_routes("G", &["XYZ"], 1705287600, Profile::Phy, Some(5)), Err(RouterError::UnknownStation(_))));
    }

    #[test]
    fn zero_max_rounds_yields_empty_unless_origin_is_destination() {
        let router = router();
        let itineraries = router.find_routes("G", &["S"], 1705287600, Profile::Phy, Some(0)).unwrap();
        assert!(itineraries.is_empty());
    }

    #[test]
    fn none_max_rounds_falls_back_to_config_default() {
        let config = EngineConfig { default_max_rounds: 0, ..EngineConfig::default() };
        let dataset = Dataset::from_tables(fixture_tables(), &config).unwrap();
        let router = Router::new(dataset, config);

        // A zero-round config default should behave exactly like an explicit `Some(0)`: empty,
        // since G -> S takes at least one round to reach.
        let itineraries = router.find_routes("G", &["S"], 1705287600, Profile::Phy, None).unwrap();
        assert!(itineraries.is_empty());
    }

    #[test]
    fn day_class_matches_known_weekday() {
        let (day_class, _) = day_class_and_bucket(1705287600);
        assert_eq!(day_class, DayClass::Weekday);
    }
}
