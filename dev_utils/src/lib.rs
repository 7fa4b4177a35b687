use std::collections::HashMap;

use seoul_access_router::dataset::{CongestionRow, DatasetTables, FacilityCountRow, StationOrderRow, StationRow, TransferRow};
use seoul_access_router::{Dataset, EngineConfig, Profile, Router};

// Common example data for benchmarks: a small synthetic network (one loop line, two radial
// lines, one interchange hub reused across both) rather than a real Seoul extract.

fn station(code: &str, name: &str, line: &str, lat: f32, lon: f32) -> StationRow {
    StationRow { code: code.to_owned(), name: name.to_owned(), line: line.to_owned(), lat, lon }
}

fn order(station_code: &str, line: &str, order: u32, is_loop: bool) -> StationOrderRow {
    StationOrderRow { station_code: station_code.to_owned(), line: line.to_owned(), order, is_loop }
}

pub fn build_fixture_tables() -> DatasetTables {
    let stations = vec![
        station("Sd", "Sadang", "2호선", 37.4766, 126.9816),
        station("G", "Gangnam", "2호선", 37.4979, 127.0276),
        station("YS", "Yeoksam", "2호선", 37.5006, 127.0364),
        station("SL", "Seolleung", "2호선", 37.5044, 127.0493),
        station("CH2", "CityHall", "2호선", 37.5658, 126.9772),
        station("EJ2", "Euljiro", "2호선", 37.5663, 126.9822),
        station("J", "Jamsil", "2호선", 37.5133, 127.1001),
        station("WS", "Wangsimni", "2호선", 37.5610, 127.0372),
        station("CH1", "CityHall", "1호선", 37.5658, 126.9772),
        station("S", "SeoulStation", "1호선", 37.5547, 126.9707),
        station("H", "HongikUniv", "6호선", 37.5571, 126.9244),
        station("EJ6", "Euljiro", "6호선", 37.5663, 126.9822),
    ];

    let station_order = vec![
        order("Sd", "2호선", 0, true),
        order("G", "2호선", 1, true),
        order("YS", "2호선", 2, true),
        order("SL", "2호선", 3, true),
        order("CH2", "2호선", 4, true),
        order("EJ2", "2호선", 5, true),
        order("J", "2호선", 6, true),
        order("WS", "2호선", 7, true),
        order("CH1", "1호선", 0, false),
        order("S", "1호선", 1, false),
        order("H", "6호선", 0, false),
        order("EJ6", "6호선", 1, false),
    ];

    let transfers = vec![
        TransferRow { station_code: "CH2".into(), from_line: "2호선".into(), to_line: "1호선".into(), distance_m: 180.0 },
        TransferRow { station_code: "CH1".into(), from_line: "1호선".into(), to_line: "2호선".into(), distance_m: 180.0 },
        TransferRow { station_code: "EJ2".into(), from_line: "2호선".into(), to_line: "6호선".into(), distance_m: 240.0 },
        TransferRow { station_code: "EJ6".into(), from_line: "6호선".into(), to_line: "2호선".into(), distance_m: 240.0 },
    ];

    let mut evening_rush: HashMap<String, f32> = HashMap::new();
    evening_rush.insert("t_1080".to_owned(), 1.6);
    evening_rush.insert("t_1110".to_owned(), 1.7);

    let congestion = vec![
        CongestionRow { station_code: "G".into(), line: "2호선".into(), direction: "up".into(), day_class: "weekday".into(), buckets: evening_rush.clone() },
        CongestionRow { station_code: "J".into(), line: "2호선".into(), direction: "down".into(), day_class: "weekday".into(), buckets: evening_rush },
    ];

    let facility_counts = vec![
        FacilityCountRow { station_codes: vec!["G".into()], elevator: 4.0, escalator: 3.0, safe_platform: 1.0, ..Default::default() },
        FacilityCountRow { station_codes: vec!["CH1".into(), "CH2".into()], elevator: 6.0, lift: 2.0, helper: 2.0, ..Default::default() },
    ];

    DatasetTables { stations, station_order, transfers, congestion, facility_counts }
}

pub fn build_fixture_dataset() -> Dataset {
    let config = EngineConfig::default();
    Dataset::from_tables(build_fixture_tables(), &config).expect("fixture tables are internally consistent")
}

pub fn build_fixture_router() -> Router {
    Router::new(build_fixture_dataset(), EngineConfig::default())
}

pub fn get_example_departure_epoch_seconds() -> i64 {
    // 2024-01-15 18:00 KST, a Monday evening rush hour.
    1705312800
}

/// `(router, origin, destinations, profile, departureEpochSeconds)`, grounded on the shape of
/// the teacher's `get_example_scenario`.
pub fn get_example_scenario() -> (Router, &'static str, Vec<&'static str>, Profile, i64) {
    let router = build_fixture_router();
    (router, "Sd", vec!["J"], Profile::Eld, get_example_departure_epoch_seconds())
}
