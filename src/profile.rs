use crate::error::RouterError;
use std::fmt;
use std::str::FromStr;

/// Accessibility profile a rider travels under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Profile {
    /// Wheelchair user.
    Phy,
    /// Visually impaired.
    Vis,
    /// Hearing impaired.
    Aud,
    /// Elderly.
    Eld,
}

impl Profile {
    pub const ALL: [Profile; 4] = [Profile::Phy, Profile::Vis, Profile::Aud, Profile::Eld];

    /// Index into per-profile fixed-size tables (facility weights, convenience scores).
    pub fn index(self) -> usize {
        match self {
            Profile::Phy => 0,
            Profile::Vis => 1,
            Profile::Aud => 2,
            Profile::Eld => 3,
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Profile::Phy => "PHY",
            Profile::Vis => "VIS",
            Profile::Aud => "AUD",
            Profile::Eld => "ELD",
        };
        f.write_str(tag)
    }
}

impl FromStr for Profile {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PHY" => Ok(Profile::Phy),
            "VIS" => Ok(Profile::Vis),
            "AUD" => Ok(Profile::Aud),
            "ELD" => Ok(Profile::Eld),
            other => Err(RouterError::InvalidProfile(other.to_owned())),
        }
    }
}

/// The five dominance/scoring criteria, in the fixed index order the spec requires.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    pub travel_time: f32,
    pub transfers: f32,
    pub transfer_difficulty: f32,
    pub convenience: f32,
    pub congestion: f32,
}

// Profile -> criterion weight vector (spec §4.3).
const WEIGHTS: [Weights; 4] = [
    Weights { travel_time: 0.0543, transfers: 0.4826, transfer_difficulty: 0.2391, convenience: 0.1196, congestion: 0.1044 },
    Weights { travel_time: 0.0623, transfers: 0.1198, transfer_difficulty: 0.2043, convenience: 0.4938, congestion: 0.1198 },
    Weights { travel_time: 0.1519, transfers: 0.2938, transfer_difficulty: 0.0823, convenience: 0.3897, congestion: 0.0823 },
    Weights { travel_time: 0.0739, transfers: 0.1304, transfer_difficulty: 0.2174, convenience: 0.0609, congestion: 0.5174 },
];

// Walking speed in m/s, per profile (spec §4.3).
const WALKING_SPEED_MPS: [f32; 4] = [0.50, 0.80, 0.98, 0.70];

/// Nine facility counters, in the order the spec's "Facility weights per profile" table lists them.
#[derive(Debug, Clone, Copy, Default)]
pub struct FacilityCounts {
    pub charger: f32,
    pub elevator: f32,
    pub escalator: f32,
    pub lift: f32,
    pub moving_walk: f32,
    pub safe_platform: f32,
    pub sign_phone: f32,
    pub toilet: f32,
    pub helper: f32,
}

impl FacilityCounts {
    fn as_array(self) -> [f32; 9] {
        [self.charger, self.elevator, self.escalator, self.lift, self.moving_walk, self.safe_platform, self.sign_phone, self.toilet, self.helper]
    }
}

// Facility weights per profile (spec §6).
const FACILITY_WEIGHTS: [[f32; 9]; 4] = [
    [3.0, 5.0, 3.0, 2.0, 2.0, 5.0, 0.0, 3.0, 4.0],
    [0.0, 3.0, 3.0, 0.0, 2.0, 5.0, 0.0, 0.0, 4.0],
    [0.0, 3.0, 3.0, 0.0, 2.0, 3.0, 4.5, 0.0, 4.0],
    [0.0, 4.0, 4.0, 0.0, 4.0, 4.0, 0.0, 1.0, 4.0],
];

/// Criterion weights, walking speeds, and the transfer-difficulty formula — built once at
/// startup and read lock-free for the rest of the process lifetime (spec §5).
pub struct ProfileWeights {
    sigmoid_k: f32,
    epsilon: f32,
}

impl ProfileWeights {
    pub fn new(sigmoid_k: f32, epsilon: f32) -> Self {
        Self { sigmoid_k, epsilon }
    }

    pub fn weights(&self, profile: Profile) -> Weights {
        WEIGHTS[profile.index()]
    }

    pub fn walking_speed_mps(&self, profile: Profile) -> f32 {
        WALKING_SPEED_MPS[profile.index()]
    }

    /// Similarity-pruning epsilon (spec §4.3). Not consulted by the dominance predicate
    /// itself; reserved for callers that want to merge near-identical itineraries.
    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    /// `difficulty(distance, convenienceSumSoFar)` from spec §4.3, clamped to [0,1].
    pub fn transfer_difficulty(&self, distance_m: f32, convenience_sum_so_far: f32) -> f32 {
        let distance_term = (distance_m / 300.0).min(1.0);
        let inconvenience = if convenience_sum_so_far > 0.01 { 1.0 / (1.0 + convenience_sum_so_far) } else { 1.0 };
        (0.6 * distance_term + 0.4 * inconvenience).clamp(0.0, 1.0)
    }

    /// `sigmoid(k * sum(weight_profile[facility] * count_facility))` for a station's raw
    /// facility counts (spec §4.2).
    pub fn convenience_score(&self, profile: Profile, counts: FacilityCounts) -> f32 {
        let weights = &FACILITY_WEIGHTS[profile.index()];
        let counts = counts.as_array();
        let raw: f32 = weights.iter().zip(counts.iter()).map(|(w, c)| w * c).sum();
        sigmoid(self.sigmoid_k * raw)
    }
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}
