use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use crate::config::EngineConfig;
use crate::error::{RouterError, RouterResult};
use crate::facility::{FacilityScoreService, FacilityUpdateRow};
use crate::network::{DayClass, Direction, Network, NetworkBuilder};
use crate::profile::{FacilityCounts, ProfileWeights};

/// One row of the `stations` persisted table (spec §6).
#[derive(Debug, Clone, Deserialize)]
pub struct StationRow {
    pub code: String,
    pub name: String,
    pub line: String,
    pub lat: f32,
    pub lon: f32,
}

/// One row of the `stationOrder` persisted table (spec §6).
#[derive(Debug, Clone, Deserialize)]
pub struct StationOrderRow {
    pub station_code: String,
    pub line: String,
    pub order: u32,
    #[serde(default)]
    pub is_loop: bool,
}

/// One row of the `transfers` persisted table (spec §6). `targetStationIdOnToLine` isn't part
/// of the persisted form — only `distance` is — so the target is resolved at load time from
/// the shared hub name, the same way `Network::colocated` groups station records (spec §3).
#[derive(Debug, Clone, Deserialize)]
pub struct TransferRow {
    pub station_code: String,
    pub from_line: String,
    pub to_line: String,
    pub distance_m: f32,
}

fn parse_direction(s: &str) -> Option<Direction> {
    match s {
        "up" => Some(Direction::Up),
        "down" => Some(Direction::Down),
        "in" => Some(Direction::In),
        "out" => Some(Direction::Out),
        _ => None,
    }
}

fn parse_day_class(s: &str) -> Option<DayClass> {
    match s {
        "weekday" => Some(DayClass::Weekday),
        "sat" => Some(DayClass::Sat),
        "sun" => Some(DayClass::Sun),
        _ => None,
    }
}

/// One row of the `congestion` persisted table (spec §6): `t_<minutesFromMidnight>` keys are
/// parsed into plain `u32` minute buckets.
#[derive(Debug, Clone, Deserialize)]
pub struct CongestionRow {
    pub station_code: String,
    pub line: String,
    pub direction: String,
    pub day_class: String,
    pub buckets: HashMap<String, f32>,
}

/// Flat, line-neutral facility-count row, matching `updateFacilityCounts`'s input shape
/// (spec §6) before it is handed to `FacilityScoreService`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct FacilityCountRow {
    pub station_codes: Vec<String>,
    #[serde(default)]
    pub charger: f32,
    #[serde(default)]
    pub elevator: f32,
    #[serde(default)]
    pub escalator: f32,
    #[serde(default)]
    pub lift: f32,
    #[serde(default)]
    pub moving_walk: f32,
    #[serde(default)]
    pub safe_platform: f32,
    #[serde(default)]
    pub sign_phone: f32,
    #[serde(default)]
    pub toilet: f32,
    #[serde(default)]
    pub helper: f32,
}

/// The full on-disk form of the persisted input tables (spec §6), as one JSON document.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct DatasetTables {
    pub stations: Vec<StationRow>,
    pub station_order: Vec<StationOrderRow>,
    pub transfers: Vec<TransferRow>,
    pub congestion: Vec<CongestionRow>,
    #[serde(default)]
    pub facility_counts: Vec<FacilityCountRow>,
}

/// Everything a `Router` needs for the process lifetime: topology, live convenience scores,
/// and the fixed criterion-weighting tables (spec §6's "Persisted inputs" taken together).
pub struct Dataset {
    pub network: Network,
    pub facility: FacilityScoreService,
    pub profile_weights: ProfileWeights,
}

fn normalize_hub_name(name: &str) -> String {
    name.to_lowercase().replace(' ', "")
}

impl Dataset {
    /// Reads and parses a single JSON document holding every persisted table (spec §6),
    /// mirroring the teacher's single `Network::new(&gtfs, ...)` load entry point.
    pub fn load_from_json(path: impl AsRef<Path>, config: &EngineConfig) -> RouterResult<Self> {
        let raw = std::fs::read_to_string(path.as_ref())
            .map_err(|e| RouterError::InconsistentNetwork(format!("failed to read dataset file: {e}")))?;
        let tables: DatasetTables =
            serde_json::from_str(&raw).map_err(|e| RouterError::InconsistentNetwork(format!("failed to parse dataset: {e}")))?;
        Self::from_tables(tables, config)
    }

    pub fn from_tables(tables: DatasetTables, config: &EngineConfig) -> RouterResult<Self> {
        let mut builder = NetworkBuilder::new();
        // Hub (normalized name) -> (line, stationId), built alongside the station rows so
        // transfer targets can be resolved without a second build pass (spec §3's
        // `targetStationIdOnToLine`, absent from the persisted `transfers` table itself).
        let mut hubs: HashMap<String, Vec<(Arc<str>, u32)>> = HashMap::new();
        let mut hub_of_code: HashMap<String, String> = HashMap::new();

        for row in &tables.stations {
            let line: Arc<str> = Arc::from(row.line.as_str());
            let station = builder.add_station(&row.code, &row.name, line.clone(), row.lat, row.lon);
            let hub = normalize_hub_name(&row.name);
            hubs.entry(hub.clone()).or_default().push((line, station));
            hub_of_code.insert(row.code.clone(), hub);
        }

        for row in &tables.station_order {
            let station = builder
                .station_id(&row.station_code)
                .ok_or_else(|| RouterError::InconsistentNetwork(format!("stationOrder references unknown station {}", row.station_code)))?;
            builder.set_line_order(station, Arc::from(row.line.as_str()), row.order, row.is_loop);
        }

        for row in &tables.transfers {
            let from_station = builder
                .station_id(&row.station_code)
                .ok_or_else(|| RouterError::InconsistentNetwork(format!("transfer references unknown station {}", row.station_code)))?;
            let hub = hub_of_code
                .get(&row.station_code)
                .ok_or_else(|| RouterError::InconsistentNetwork(format!("transfer references unknown station {}", row.station_code)))?;
            let Some(&(_, to_station)) = hubs.get(hub).and_then(|entries| entries.iter().find(|(line, _)| line.as_ref() == row.to_line)) else {
                log::debug!("transfer row ({}, {} -> {}) has no matching station on the target line, skipping", row.station_code, row.from_line, row.to_line);
                continue;
            };
            builder.add_transfer(from_station, Arc::from(row.from_line.as_str()), Arc::from(row.to_line.as_str()), row.distance_m, to_station);
        }

        for row in &tables.congestion {
            let station = builder
                .station_id(&row.station_code)
                .ok_or_else(|| RouterError::InconsistentNetwork(format!("congestion row references unknown station {}", row.station_code)))?;
            let Some(direction) = parse_direction(&row.direction) else {
                log::debug!("congestion row for {} has unknown direction {}, skipping", row.station_code, row.direction);
                continue;
            };
            let Some(day_class) = parse_day_class(&row.day_class) else {
                log::debug!("congestion row for {} has unknown dayClass {}, skipping", row.station_code, row.day_class);
                continue;
            };
            let buckets: HashMap<u32, f32> = row
                .buckets
                .iter()
                .filter_map(|(key, &ratio)| key.strip_prefix("t_").and_then(|m| m.parse::<u32>().ok()).map(|minute| (minute, ratio)))
                .collect();
            builder.add_congestion(station, Arc::from(row.line.as_str()), direction, day_class, buckets);
        }

        let num_transfers = tables.transfers.len();
        let num_congestion = tables.congestion.len();
        let network = builder.build();
        log::info!("network loaded: {} stations, {} transfer rows, {} congestion rows", network.num_stations(), num_transfers, num_congestion);

        let profile_weights = ProfileWeights::new(config.sigmoid_k, config.epsilon);
        let facility = FacilityScoreService::new();
        if !tables.facility_counts.is_empty() {
            let rows: Vec<FacilityUpdateRow> = tables
                .facility_counts
                .into_iter()
                .map(|row| FacilityUpdateRow {
                    station_codes: row.station_codes,
                    counts: FacilityCounts {
                        charger: row.charger,
                        elevator: row.elevator,
                        escalator: row.escalator,
                        lift: row.lift,
                        moving_walk: row.moving_walk,
                        safe_platform: row.safe_platform,
                        sign_phone: row.sign_phone,
                        toilet: row.toilet,
                        helper: row.helper,
                    },
                })
                .collect();
            facility.update_facility_counts(&rows, &network, &profile_weights);
        }

        Ok(Self { network, facility, profile_weights })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tables() -> DatasetTables {
        DatasetTables {
            stations: vec![
                StationRow { code: "A1".into(), name: "Hub".into(), line: "1호선".into(), lat: 37.50, lon: 127.00 },
                StationRow { code: "A2".into(), name: "Hub".into(), line: "2호선".into(), lat: 37.50, lon: 127.00 },
                StationRow { code: "B1".into(), name: "Far".into(), line: "1호선".into(), lat: 37.55, lon: 127.05 },
            ],
            station_order: vec![
                StationOrderRow { station_code: "A1".into(), line: "1호선".into(), order: 0, is_loop: false },
                StationOrderRow { station_code: "B1".into(), line: "1호선".into(), order: 1, is_loop: false },
                StationOrderRow { station_code: "A2".into(), line: "2호선".into(), order: 0, is_loop: false },
            ],
            transfers: vec![TransferRow { station_code: "A1".into(), from_line: "1호선".into(), to_line: "2호선".into(), distance_m: 120.0 }],
            congestion: vec![],
            facility_counts: vec![],
        }
    }

    #[test]
    fn transfer_target_resolved_by_hub_name() {
        let config = EngineConfig::default();
        let dataset = Dataset::from_tables(sample_tables(), &config).unwrap();
        let a1 = dataset.network.station_id("A1").unwrap();
        let a2 = dataset.network.station_id("A2").unwrap();
        let transfer = dataset.network.transfer(a1, "1호선", "2호선").unwrap();
        assert_eq!(transfer.to_station, a2);
        assert_eq!(transfer.distance_m, 120.0);
    }

    #[test]
    fn unknown_station_in_station_order_is_an_error() {
        let mut tables = sample_tables();
        tables.station_order.push(StationOrderRow { station_code: "ghost".into(), line: "1호선".into(), order: 9, is_loop: false });
        let config = EngineConfig::default();
        assert!(matches!(Dataset::from_tables(tables, &config), Err(RouterError::InconsistentNetwork(_))));
    }
}
