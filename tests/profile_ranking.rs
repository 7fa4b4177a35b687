use std::collections::HashMap;

use seoul_access_router::dataset::{CongestionRow, DatasetTables, FacilityCountRow, StationOrderRow, StationRow, TransferRow};
use seoul_access_router::{Dataset, EngineConfig, Profile, Router};

fn station(code: &str, name: &str, line: &str, lat: f32, lon: f32) -> StationRow {
    StationRow { code: code.to_owned(), name: name.to_owned(), line: line.to_owned(), lat, lon }
}

fn order(station_code: &str, line: &str, rank: u32) -> StationOrderRow {
    StationOrderRow { station_code: station_code.to_owned(), line: line.to_owned(), order: rank, is_loop: false }
}

// Weekday 18:00 KST, used by both scenarios below.
const DEPARTURE_EPOCH_SECONDS: i64 = 1_705_309_200;

fn full_day_buckets(ratio: f32) -> HashMap<String, f32> {
    (0..24 * 60).step_by(30).map(|minute| (format!("t_{minute}"), ratio)).collect()
}

// Scenario 2 (spec §8): VIS, Sadang -> Gangnam. A direct (zero-transfer) line exists, but a
// short express line plus one transfer arrives sooner, so VIS's heavy convenience weight
// (0.4938) picks the transfer itinerary as rank-1.
fn vis_scenario_router() -> Router {
    let stations = vec![
        station("Sd", "Sadang", "2호선", 37.40, 127.00),
        station("Mid", "Midtown", "2호선", 37.40898, 127.00),
        station("G", "Gangnam", "2호선", 37.41796, 127.00),
        station("Sd4", "Sadang", "4호선", 37.40, 127.00),
        station("G4", "Gangnam", "4호선", 37.40449, 127.00),
    ];
    let station_order = vec![order("Sd", "2호선", 0), order("Mid", "2호선", 1), order("G", "2호선", 2), order("Sd4", "4호선", 0), order("G4", "4호선", 1)];
    let transfers = vec![TransferRow { station_code: "G4".into(), from_line: "4호선".into(), to_line: "2호선".into(), distance_m: 50.0 }];
    let facility_counts = vec![FacilityCountRow { station_codes: vec!["G4".into()], elevator: 5.0, escalator: 5.0, moving_walk: 3.0, safe_platform: 5.0, helper: 5.0, ..Default::default() }];

    let config = EngineConfig::default();
    let dataset = Dataset::from_tables(DatasetTables { stations, station_order, transfers, congestion: vec![], facility_counts }, &config).unwrap();
    Router::new(dataset, config)
}

#[test]
fn vis_prefers_higher_convenience_transfer_route_over_direct_route() {
    let router = vis_scenario_router();
    let itineraries = router.find_routes("Sd", &["G"], DEPARTURE_EPOCH_SECONDS, Profile::Vis, Some(8)).unwrap();

    assert!(itineraries.len() >= 2, "both the direct and transfer routes should survive dominance filtering");
    let best = &itineraries[0];
    assert_eq!(best.transfers, 1, "the higher-convenience transfer route should outrank the zero-transfer route for VIS");
    assert!(best.avg_convenience > 0.0);

    let zero_transfer = itineraries.iter().find(|it| it.transfers == 0).expect("direct route should still be present, just ranked lower");
    assert!(best.score < zero_transfer.score);

    for pair in itineraries.windows(2) {
        assert!(pair[0].score <= pair[1].score);
    }
}

// Scenario 3 (spec §8): ELD, Hongik Univ -> Jamsil, weekday 18:00. The direct line runs
// through heavy rush-hour congestion; a detour line plus one transfer avoids it, and ELD's
// congestion weight (0.5174) makes that detour rank-1 despite the extra transfer.
fn eld_scenario_router() -> Router {
    let stations = vec![
        station("H", "HongikUniv", "3호선", 37.50, 126.90),
        station("Mid3", "Midtown3", "3호선", 37.51347, 126.90),
        station("J", "Jamsil", "3호선", 37.52694, 126.90),
        station("H7", "HongikUniv", "7호선", 37.50, 126.90),
        station("J7", "Jamsil", "7호선", 37.51437, 126.90),
    ];
    let station_order = vec![order("H", "3호선", 0), order("Mid3", "3호선", 1), order("J", "3호선", 2), order("H7", "7호선", 0), order("J7", "7호선", 1)];
    let transfers = vec![TransferRow { station_code: "J7".into(), from_line: "7호선".into(), to_line: "3호선".into(), distance_m: 60.0 }];
    let congestion = vec![
        CongestionRow { station_code: "H".into(), line: "3호선".into(), direction: "up".into(), day_class: "weekday".into(), buckets: full_day_buckets(1.8) },
        CongestionRow { station_code: "Mid3".into(), line: "3호선".into(), direction: "up".into(), day_class: "weekday".into(), buckets: full_day_buckets(1.8) },
    ];
    let facility_counts = vec![FacilityCountRow { station_codes: vec!["J7".into()], elevator: 3.0, escalator: 2.0, moving_walk: 1.0, helper: 2.0, toilet: 1.0, ..Default::default() }];

    let config = EngineConfig::default();
    let dataset = Dataset::from_tables(DatasetTables { stations, station_order, transfers, congestion, facility_counts }, &config).unwrap();
    Router::new(dataset, config)
}

#[test]
fn eld_prefers_lower_congestion_detour_over_direct_congested_route() {
    let router = eld_scenario_router();
    let itineraries = router.find_routes("H", &["J"], DEPARTURE_EPOCH_SECONDS, Profile::Eld, Some(8)).unwrap();

    assert!(itineraries.len() >= 2, "both the congested direct route and the detour should survive dominance filtering");
    let best = &itineraries[0];
    assert_eq!(best.transfers, 1, "the lower-congestion detour should outrank the congested direct route for ELD");

    let direct = itineraries.iter().find(|it| it.transfers == 0).expect("direct congested route should still be present, just ranked lower");
    assert!(best.avg_congestion < direct.avg_congestion);
    assert!(best.score < direct.score);

    for pair in itineraries.windows(2) {
        assert!(pair[0].score <= pair[1].score);
    }
}
