use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Datelike, FixedOffset, TimeZone, Timelike, Weekday};

use crate::config::EngineConfig;
use crate::error::RouterResult;
use crate::facility::{FacilityScoreService, FacilitySnapshot};
use crate::label::{Bag, Label, LabelPool};
use crate::network::{DayClass, Direction, Network, StationId};
use crate::profile::{Profile, ProfileWeights};

// Ride-hop speed scaling constant (spec §6, §9): `distanceMeters / 550`. Preserved verbatim;
// this is not a walking speed, it encodes a fixed vehicle speed profile.
const RIDE_SPEED_DIVISOR: f32 = 550.0;
const RIDE_HOP_FLOOR_MINUTES: f32 = 1.0;

// Korea Standard Time, UTC+9, used to derive day-class and time-bucket for congestion lookup.
const KST_OFFSET_SECONDS: i32 = 9 * 3600;

/// Inputs to a single route search (spec §4.5).
pub struct RouteRequest<'a> {
    pub origin: &'a str,
    pub destinations: &'a [&'a str],
    pub departure_epoch_seconds: i64,
    pub profile: Profile,
    pub max_rounds: usize,
}

/// Raw search output before reconstruction/ranking (C5 -> C6 handoff, spec §2): every
/// non-dominated label that landed at one of the requested destinations.
pub struct SearchResult {
    pub pool: LabelPool,
    pub destination_labels: Vec<u32>,
}

/// Derives (dayClass, timeBucket) for congestion lookup from an absolute KST instant
/// (spec §3, GLOSSARY).
pub fn day_class_and_bucket(epoch_seconds: i64) -> (DayClass, u32) {
    let offset = FixedOffset::east_opt(KST_OFFSET_SECONDS).expect("fixed offset in range");
    let instant: DateTime<FixedOffset> = offset.timestamp_opt(epoch_seconds, 0).single().expect("valid timestamp");
    let day_class = match instant.weekday() {
        Weekday::Sat => DayClass::Sat,
        Weekday::Sun => DayClass::Sun,
        _ => DayClass::Weekday,
    };
    let minutes_from_midnight = instant.hour() * 60 + instant.minute();
    let bucket = (minutes_from_midnight / 30) * 30;
    (day_class, bucket)
}

/// Executes the round-based Pareto label propagation (C5, spec §4.5).
pub struct SearchEngine<'a> {
    network: &'a Network,
    facility: &'a FacilityScoreService,
    profile_weights: &'a ProfileWeights,
    config: &'a EngineConfig,
}

impl<'a> SearchEngine<'a> {
    pub fn new(network: &'a Network, facility: &'a FacilityScoreService, profile_weights: &'a ProfileWeights, config: &'a EngineConfig) -> Self {
        Self { network, facility, profile_weights, config }
    }

    pub fn search(&self, request: &RouteRequest) -> RouterResult<SearchResult> {
        let origin = self.network.station_id(request.origin)?;
        let destinations: HashSet<StationId> = request
            .destinations
            .iter()
            .map(|code| self.network.station_id(code))
            .collect::<Result<_, _>>()?;

        let weights = self.profile_weights.weights(request.profile);
        // Hold the reader lock on facility scores for the whole propagation, so the search
        // sees one consistent convenience snapshot (spec §4.2, §5).
        let facility = self.facility.snapshot();

        let mut pool = LabelPool::with_capacity(self.config.initial_pool_capacity);
        let mut bags: HashMap<StationId, Bag> = HashMap::new();
        let mut marked: HashSet<StationId> = HashSet::new();

        for &hub_station in self.network.colocated(origin) {
            let station = self.network.station(hub_station);
            let label = Label::origin(hub_station, station.line.clone());
            let idx = pool.alloc(label);
            bags.entry(hub_station).or_default().members.push(idx);
            marked.insert(hub_station);
        }

        for round in 1..=request.max_rounds {
            if marked.is_empty() {
                break;
            }
            let queue: Vec<StationId> = marked.drain().collect();

            for u in queue {
                if destinations.contains(&u) {
                    continue;
                }
                let round = round as u16;
                let member_snapshot: Vec<u32> = bags.get(&u).map(|bag| bag.members.clone()).unwrap_or_default();

                for label_idx in member_snapshot {
                    if pool.get(label_idx).created_round >= round {
                        continue;
                    }
                    self.ride_phase(&mut pool, &mut bags, &mut marked, u, label_idx, round, &weights, request.departure_epoch_seconds);
                    self.transfer_phase(&mut pool, &mut bags, &mut marked, u, label_idx, round, &weights, request.profile, &facility);
                }
            }
        }

        let destination_labels = destinations
            .iter()
            .flat_map(|d| bags.get(d).map(|bag| bag.members.clone()).unwrap_or_default())
            .collect();

        Ok(SearchResult { pool, destination_labels })
    }

    #[allow(clippy::too_many_arguments)]
    fn ride_phase(
        &self,
        pool: &mut LabelPool,
        bags: &mut HashMap<StationId, Bag>,
        marked: &mut HashSet<StationId>,
        u: StationId,
        label_idx: u32,
        round: u16,
        weights: &crate::profile::Weights,
        departure_epoch_seconds: i64,
    ) {
        let current_line = pool.get(label_idx).current_line.clone();
        for &direction in &self.network.directions_for_line(&current_line) {
            let mut cumulative_minutes = 0.0f32;
            // Every alighting point v along this ride is a direct sibling child of the
            // boarding label (spec §4.5.A: `parentIndex = L` for each v), so the congestion
            // this rider experiences between u and v must be accumulated locally across the
            // whole walk rather than re-read off the static boarding label each iteration.
            let mut cumulative_congestion = 0.0f32;
            let mut current = u;
            loop {
                let Some(next) = self.network.step(current, &current_line, direction) else { break };

                if pool.ancestor_has_station(label_idx, next) {
                    current = next;
                    continue;
                }

                let hop_distance_m = self.network.station(current).point.distance_meters(self.network.station(next).point);
                let hop_minutes = (hop_distance_m / RIDE_SPEED_DIVISOR).max(RIDE_HOP_FLOOR_MINUTES);
                cumulative_minutes += hop_minutes;

                let parent = pool.get(label_idx);
                let new_arrival = parent.arrival_time_minutes + cumulative_minutes;
                let absolute_time = departure_epoch_seconds + (new_arrival * 60.0) as i64;
                let (day_class, bucket) = day_class_and_bucket(absolute_time);
                cumulative_congestion += self.network.congestion(current, &current_line, direction, day_class, bucket);

                let new_label = Label::child(
                    label_idx,
                    new_arrival,
                    parent.transfers,
                    parent.convenience_sum,
                    parent.congestion_sum + cumulative_congestion,
                    parent.max_transfer_difficulty,
                    parent.depth + 1,
                    next,
                    current_line.clone(),
                    direction,
                    round,
                    false,
                );

                let new_idx = pool.alloc(new_label);
                let bag = bags.entry(next).or_default();
                if bag.insert(pool, new_idx, weights, None) {
                    marked.insert(next);
                }

                current = next;
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn transfer_phase(
        &self,
        pool: &mut LabelPool,
        bags: &mut HashMap<StationId, Bag>,
        marked: &mut HashSet<StationId>,
        u: StationId,
        label_idx: u32,
        round: u16,
        weights: &crate::profile::Weights,
        profile: Profile,
        facility: &FacilitySnapshot<'_>,
    ) {
        let current_line = pool.get(label_idx).current_line.clone();
        let candidate_lines: Vec<Arc<str>> = self.network.lines_at_hub(u).iter().filter(|l| l.as_ref() != current_line.as_ref()).cloned().collect();

        for to_line in candidate_lines {
            let Some(transfer) = self.network.transfer(u, &current_line, &to_line) else { continue };
            if pool.ancestor_has_station(label_idx, transfer.to_station) {
                continue;
            }

            let walking_speed = self.profile_weights.walking_speed_mps(profile);
            let transfer_time_minutes = transfer.distance_m / (walking_speed * 60.0);
            let station_score = facility.convenience(u, profile);

            let parent = pool.get(label_idx);
            let new_convenience_sum = parent.convenience_sum + station_score;
            let difficulty = self.profile_weights.transfer_difficulty(transfer.distance_m, new_convenience_sum);

            let new_label = Label::child(
                label_idx,
                parent.arrival_time_minutes + transfer_time_minutes,
                parent.transfers + 1,
                new_convenience_sum,
                parent.congestion_sum,
                parent.max_transfer_difficulty.max(difficulty),
                parent.depth + 1,
                transfer.to_station,
                to_line.clone(),
                Direction::Unknown,
                round,
                true,
            );

            let new_idx = pool.alloc(new_label);
            let bag = bags.entry(transfer.to_station).or_default();
            if bag.insert(pool, new_idx, weights, Some(&to_line)) {
                marked.insert(transfer.to_station);
            }
        }
    }
}
