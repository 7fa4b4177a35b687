use crate::label::{Label, LabelPool};
use crate::network::{Direction, Network};
use crate::profile::Weights;

// Normalization ceilings for the final ranking score (spec §6).
const TRAVEL_TIME_CEILING_MINUTES: f32 = 120.0;
const TRANSFER_COUNT_CEILING: f32 = 4.0;

/// One cross-platform hop in a reconstructed itinerary.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferTuple {
    pub station_code: String,
    pub from_line: String,
    pub to_line: String,
}

/// A fully reconstructed, ranked itinerary (C6, spec §4.6, §6).
#[derive(Debug, Clone, PartialEq)]
pub struct RankedItinerary {
    pub rank: usize,
    pub route_sequence: Vec<String>,
    pub route_lines: Vec<String>,
    pub transfer_info: Vec<TransferTuple>,
    pub total_time_minutes: f32,
    pub transfers: u16,
    pub avg_convenience: f32,
    pub avg_congestion: f32,
    pub max_transfer_difficulty: f32,
    pub score: f32,
}

/// Walks a destination label's parent chain back to the root and rebuilds the full station
/// sequence, per-station line tags, and transfer tuples (spec §4.6).
fn reconstruct(pool: &LabelPool, network: &Network, leaf_index: u32) -> (Vec<String>, Vec<String>, Vec<TransferTuple>) {
    let chain = pool.ancestor_chain(leaf_index);
    let root = pool.get(chain[0]);

    let mut sequence = vec![network.code(root.station_id).to_owned()];
    let mut lines = vec![root.current_line.to_string()];
    let mut transfer_info = Vec::new();

    for window in chain.windows(2) {
        let prev = pool.get(window[0]);
        let curr = pool.get(window[1]);

        if prev.current_line != curr.current_line {
            transfer_info.push(TransferTuple {
                station_code: network.code(prev.station_id).to_owned(),
                from_line: prev.current_line.to_string(),
                to_line: curr.current_line.to_string(),
            });
            sequence.push(network.code(curr.station_id).to_owned());
            lines.push(curr.current_line.to_string());
        } else {
            for station in network.intermediate_stations(prev.station_id, curr.station_id, &curr.current_line, curr.direction) {
                sequence.push(network.code(station).to_owned());
                lines.push(curr.current_line.to_string());
            }
        }
    }

    (sequence, lines, transfer_info)
}

/// Normalized weighted score for one candidate (spec §4.6); lower is better.
fn score(leaf: &Label, weights: &Weights) -> f32 {
    let norm_time = (leaf.arrival_time_minutes / TRAVEL_TIME_CEILING_MINUTES).min(1.0);
    let norm_transfers = (leaf.transfers as f32 / TRANSFER_COUNT_CEILING).min(1.0);
    let norm_difficulty = leaf.max_transfer_difficulty;
    let norm_convenience = 1.0 - leaf.avg_convenience().min(1.0);
    let norm_congestion = leaf.avg_congestion().min(1.0);

    weights.travel_time * norm_time
        + weights.transfers * norm_transfers
        + weights.transfer_difficulty * norm_difficulty
        + weights.convenience * norm_convenience
        + weights.congestion * norm_congestion
}

/// Reconstructs, scores, deduplicates, and ranks every destination label, returning the top
/// `top_k` itineraries in ascending score order (C6, spec §4.6).
pub fn rank_itineraries(pool: &LabelPool, network: &Network, destination_labels: &[u32], weights: &Weights, top_k: usize) -> Vec<RankedItinerary> {
    let mut candidates: Vec<(Vec<String>, Vec<String>, Vec<TransferTuple>, f32, &Label)> = destination_labels
        .iter()
        .map(|&idx| {
            let leaf = pool.get(idx);
            let (sequence, lines, transfer_info) = reconstruct(pool, network, idx);
            let s = score(leaf, weights);
            (sequence, lines, transfer_info, s, leaf)
        })
        .collect();

    candidates.sort_by(|a, b| a.3.total_cmp(&b.3));

    let mut seen_sequences: Vec<&Vec<String>> = Vec::new();
    let mut ranked = Vec::with_capacity(top_k);

    for (sequence, lines, transfer_info, candidate_score, leaf) in &candidates {
        if seen_sequences.iter().any(|s| *s == sequence) {
            continue;
        }
        seen_sequences.push(sequence);

        ranked.push(RankedItinerary {
            rank: ranked.len() + 1,
            route_sequence: sequence.clone(),
            route_lines: lines.clone(),
            transfer_info: transfer_info.clone(),
            total_time_minutes: leaf.arrival_time_minutes,
            transfers: leaf.transfers,
            avg_convenience: leaf.avg_convenience(),
            avg_congestion: leaf.avg_congestion(),
            max_transfer_difficulty: leaf.max_transfer_difficulty,
            score: *candidate_score,
        });

        if ranked.len() == top_k {
            break;
        }
    }

    ranked
}
