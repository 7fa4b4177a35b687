use std::sync::Arc;

use crate::network::{Direction, StationId};
use crate::profile::Weights;

/// Search-state record (spec §3). Pool-allocated; ancestry is tracked by parent index, not
/// by an owning pointer, so the forest survives only for one search (spec §9).
#[derive(Clone)]
pub struct Label {
    pub arrival_time_minutes: f32,
    pub transfers: u16,
    pub convenience_sum: f32,
    pub congestion_sum: f32,
    pub max_transfer_difficulty: f32,
    pub depth: u16,
    pub parent_index: Option<u32>,
    pub station_id: StationId,
    pub current_line: Arc<str>,
    pub direction: Direction,
    pub created_round: u16,
    pub is_first_move: bool,
}

impl Label {
    pub fn origin(station_id: StationId, current_line: Arc<str>) -> Self {
        Self {
            arrival_time_minutes: 0.0,
            transfers: 0,
            convenience_sum: 0.0,
            congestion_sum: 0.0,
            max_transfer_difficulty: 0.0,
            depth: 1,
            parent_index: None,
            station_id,
            current_line,
            direction: Direction::Unknown,
            created_round: 0,
            is_first_move: true,
        }
    }

    /// Builds a descendant label, the shape a ride or transfer hop produces.
    #[allow(clippy::too_many_arguments)]
    pub fn child(
        parent_index: u32,
        arrival_time_minutes: f32,
        transfers: u16,
        convenience_sum: f32,
        congestion_sum: f32,
        max_transfer_difficulty: f32,
        depth: u16,
        station_id: StationId,
        current_line: Arc<str>,
        direction: Direction,
        created_round: u16,
        is_first_move: bool,
    ) -> Self {
        Self {
            arrival_time_minutes,
            transfers,
            convenience_sum,
            congestion_sum,
            max_transfer_difficulty,
            depth,
            parent_index: Some(parent_index),
            station_id,
            current_line,
            direction,
            created_round,
            is_first_move,
        }
    }

    pub fn avg_convenience(&self) -> f32 {
        if self.depth == 0 {
            0.0
        } else {
            self.convenience_sum / self.depth as f32
        }
    }

    pub fn avg_congestion(&self) -> f32 {
        if self.depth == 0 {
            0.0
        } else {
            self.congestion_sum / self.depth as f32
        }
    }
}

/// Weight-aware dominance predicate (spec §4.4). Criteria with zero weight in the active
/// profile are skipped, so a label worse only on an irrelevant axis never loses to one that
/// is better only there.
pub fn dominates(a: &Label, b: &Label, weights: &Weights) -> bool {
    if a.transfers > b.transfers || a.arrival_time_minutes > b.arrival_time_minutes {
        return false;
    }
    let mut strict = a.transfers < b.transfers || a.arrival_time_minutes < b.arrival_time_minutes;

    if weights.transfer_difficulty > 0.0 {
        if a.max_transfer_difficulty > b.max_transfer_difficulty {
            return false;
        }
        strict |= a.max_transfer_difficulty < b.max_transfer_difficulty;
    }
    if weights.congestion > 0.0 {
        let (ac, bc) = (a.avg_congestion(), b.avg_congestion());
        if ac > bc {
            return false;
        }
        strict |= ac < bc;
    }
    if weights.convenience > 0.0 {
        let (ac, bc) = (a.avg_convenience(), b.avg_convenience());
        if ac < bc {
            return false;
        }
        strict |= ac > bc;
    }

    strict
}

/// Append-only arena of labels for a single search. Parent indices are stable and strictly
/// less than their child's index, which makes the forest acyclic by construction (spec §3,
/// §9).
pub struct LabelPool {
    labels: Vec<Label>,
}

impl LabelPool {
    pub fn with_capacity(capacity: usize) -> Self {
        Self { labels: Vec::with_capacity(capacity) }
    }

    pub fn alloc(&mut self, label: Label) -> u32 {
        let index = self.labels.len() as u32;
        self.labels.push(label);
        index
    }

    pub fn get(&self, index: u32) -> &Label {
        &self.labels[index as usize]
    }

    pub fn get_mut(&mut self, index: u32) -> &mut Label {
        &mut self.labels[index as usize]
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Cycle check (spec §4.4): does any ancestor of `index` already sit at `station`?
    pub fn ancestor_has_station(&self, index: u32, station: StationId) -> bool {
        let mut cur = self.get(index).parent_index;
        while let Some(idx) = cur {
            let label = self.get(idx);
            if label.station_id == station {
                return true;
            }
            cur = label.parent_index;
        }
        false
    }

    /// Walks parent pointers from `index` to the root, returning them root-first.
    pub fn ancestor_chain(&self, index: u32) -> Vec<u32> {
        let mut chain = vec![index];
        let mut cur = self.get(index).parent_index;
        while let Some(idx) = cur {
            chain.push(idx);
            cur = self.get(idx).parent_index;
        }
        chain.reverse();
        chain
    }
}

/// Non-dominated labels currently associated with one station (spec §3, GLOSSARY).
#[derive(Default)]
pub struct Bag {
    pub members: Vec<u32>,
}

impl Bag {
    pub fn new() -> Self {
        Self { members: Vec::new() }
    }

    /// Inserts `candidate` under the dominance rules. When `restrict_to_line` is set (the
    /// transfer phase, spec §4.5.B), only bag members on that line participate in the
    /// comparison, so labels on other lines at an interchange hub are left untouched.
    pub fn insert(&mut self, pool: &mut LabelPool, candidate: u32, weights: &Weights, restrict_to_line: Option<&str>) -> bool {
        let matches_scope = |pool: &LabelPool, idx: u32| match restrict_to_line {
            Some(line) => pool.get(idx).current_line.as_ref() == line,
            None => true,
        };

        let candidate_label = pool.get(candidate).clone();
        for &existing in &self.members {
            if matches_scope(pool, existing) && dominates(pool.get(existing), &candidate_label, weights) {
                return false;
            }
        }

        self.members.retain(|&existing| !(matches_scope(pool, existing) && dominates(&candidate_label, pool.get(existing), weights)));
        self.members.push(candidate);
        true
    }
}
