use std::collections::HashMap;
use std::sync::Arc;

use crate::error::RouterError;

pub type StationId = u32;
pub type CoordType = f32;

/// Direction of travel along a line (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    In,
    Out,
    Unknown,
}

/// weekday / saturday / sunday segmentation of congestion data (spec §3, GLOSSARY).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayClass {
    Weekday,
    Sat,
    Sun,
}

/// Point on the earth's surface, used only for great-circle hop distance (spec §4.5).
///
/// Grounded on the teacher's `NetworkPoint`: an equirectangular projection is an adequate
/// approximation of the great-circle distance over the short hops between adjacent stations.
#[derive(Clone, Copy)]
pub struct NetworkPoint {
    pub latitude: CoordType,
    pub longitude: CoordType,
}

impl NetworkPoint {
    const EARTH_RADIUS_KM: CoordType = 6371.0;

    /// Great-circle distance approximation, in metres.
    pub fn distance_meters(self, other: NetworkPoint) -> CoordType {
        let x = (other.longitude - self.longitude).to_radians() * ((other.latitude + self.latitude) * 0.5).to_radians().cos();
        let y = (other.latitude - self.latitude).to_radians();
        ((x * x + y * y).sqrt()) * Self::EARTH_RADIUS_KM * 1000.0
    }
}

/// Immutable station record. A station is bound to exactly one line; an interchange hub is
/// represented as several station records (one per line) sharing a normalized name (spec §3).
#[derive(Debug, Clone)]
pub struct Station {
    pub code: Box<str>,
    pub name: Box<str>,
    pub line: Arc<str>,
    pub point: NetworkPoint,
}

#[derive(Debug, Clone, Copy)]
pub struct Transfer {
    pub distance_m: f32,
    pub to_station: StationId,
}

const DEFAULT_CONGESTION: f32 = 0.5;

// Nested by (station -> from_line -> to_line) rather than a flat composite-key map, so each
// level is a plain `Arc<str>`-keyed `HashMap` reachable in O(1) via `&str` (the same
// `Borrow<str>` lookup the teacher's `stop_index[stop_id]` relies on), instead of scanning
// every transfer/congestion row in the network per lookup.
type TransferTable = HashMap<StationId, HashMap<Arc<str>, HashMap<Arc<str>, Transfer>>>;
type CongestionTable = HashMap<StationId, HashMap<Arc<str>, HashMap<(Direction, DayClass), HashMap<u32, f32>>>>;

struct LineTable {
    // Stations on this line, in ascending order rank.
    stations_in_order: Vec<StationId>,
    order_of: HashMap<StationId, u32>,
    is_loop: bool,
}

/// Immutable in-memory network topology, transfer graph, and time-dependent congestion
/// tables (C1, spec §4.1). Built once at startup; read-only thereafter (spec §5).
pub struct Network {
    stations: Vec<Station>,
    station_index: HashMap<Box<str>, StationId>,
    // All station records that share a normalized name (an interchange hub).
    colocated: HashMap<Box<str>, Vec<StationId>>,
    lines: HashMap<Arc<str>, LineTable>,
    // Lines available at a given station's physical hub (by normalized name), for the
    // transfer phase to enumerate candidate to-lines.
    lines_at_hub: HashMap<Box<str>, Vec<Arc<str>>>,
    transfers: TransferTable,
    congestion: CongestionTable,
}

fn normalize(name: &str) -> Box<str> {
    name.to_lowercase().replace(' ', "").into_boxed_str()
}

pub struct NetworkBuilder {
    stations: Vec<Station>,
    station_index: HashMap<Box<str>, StationId>,
    lines: HashMap<Arc<str>, LineTable>,
    transfers: TransferTable,
    congestion: CongestionTable,
}

impl NetworkBuilder {
    pub fn new() -> Self {
        Self {
            stations: Vec::new(),
            station_index: HashMap::new(),
            lines: HashMap::new(),
            transfers: HashMap::new(),
            congestion: HashMap::new(),
        }
    }

    pub fn add_station(&mut self, code: &str, name: &str, line: Arc<str>, lat: f32, lon: f32) -> StationId {
        if let Some(&id) = self.station_index.get(code) {
            return id;
        }
        let id = self.stations.len() as StationId;
        self.stations.push(Station {
            code: code.into(),
            name: name.into(),
            line,
            point: NetworkPoint { latitude: lat, longitude: lon },
        });
        self.station_index.insert(code.into(), id);
        id
    }

    /// Looks up a station already added to this builder by its external code.
    pub fn station_id(&self, code: &str) -> Option<StationId> {
        self.station_index.get(code).copied()
    }

    pub fn set_line_order(&mut self, station: StationId, line: Arc<str>, order: u32, is_loop: bool) {
        let table = self.lines.entry(line).or_insert_with(|| LineTable { stations_in_order: Vec::new(), order_of: HashMap::new(), is_loop });
        table.order_of.insert(station, order);
    }

    pub fn add_transfer(&mut self, station: StationId, from_line: Arc<str>, to_line: Arc<str>, distance_m: f32, to_station: StationId) {
        self.transfers.entry(station).or_default().entry(from_line).or_default().insert(to_line, Transfer { distance_m, to_station });
    }

    pub fn add_congestion(&mut self, station: StationId, line: Arc<str>, direction: Direction, day_class: DayClass, buckets: HashMap<u32, f32>) {
        self.congestion.entry(station).or_default().entry(line).or_default().insert((direction, day_class), buckets);
    }

    pub fn build(mut self) -> Network {
        // Finalize each line's ordered station list from the (station -> order) map.
        for table in self.lines.values_mut() {
            let mut entries: Vec<(StationId, u32)> = table.order_of.iter().map(|(&s, &o)| (s, o)).collect();
            entries.sort_unstable_by_key(|&(_, order)| order);
            table.stations_in_order = entries.into_iter().map(|(s, _)| s).collect();
        }

        let mut colocated: HashMap<Box<str>, Vec<StationId>> = HashMap::new();
        let mut lines_at_hub: HashMap<Box<str>, Vec<Arc<str>>> = HashMap::new();
        for (id, station) in self.stations.iter().enumerate() {
            let key = normalize(&station.name);
            colocated.entry(key.clone()).or_default().push(id as StationId);
            let entry = lines_at_hub.entry(key).or_default();
            if !entry.iter().any(|l| *l == station.line) {
                entry.push(station.line.clone());
            }
        }

        Network {
            stations: self.stations,
            station_index: self.station_index,
            colocated,
            lines: self.lines,
            lines_at_hub,
            transfers: self.transfers,
            congestion: self.congestion,
        }
    }
}

impl Default for NetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Network {
    pub fn station_id(&self, code: &str) -> Result<StationId, RouterError> {
        self.station_index.get(code).copied().ok_or_else(|| RouterError::UnknownStation(code.to_owned()))
    }

    pub fn code(&self, id: StationId) -> &str {
        &self.station(id).code
    }

    pub fn station(&self, id: StationId) -> &Station {
        &self.stations[id as usize]
    }

    /// All station records sharing this station's physical hub (itself included), one per
    /// line available there. Used to seed origin labels on every line at a hub (spec §4.5).
    pub fn colocated(&self, id: StationId) -> &[StationId] {
        let key = normalize(&self.station(id).name);
        self.colocated.get(&key).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Lines available at `id`'s physical hub, for the transfer phase to scan.
    pub fn lines_at_hub(&self, id: StationId) -> &[Arc<str>] {
        let key = normalize(&self.station(id).name);
        self.lines_at_hub.get(&key).map(|v| v.as_slice()).unwrap_or(&[])
    }

    fn line_table(&self, line: &str) -> Option<&LineTable> {
        self.lines.get(line)
    }

    pub fn is_loop_line(&self, line: &str) -> bool {
        self.line_table(line).map(|t| t.is_loop).unwrap_or(false)
    }

    /// Directions applicable to a ride leg on `line`: {Up, Down} for radial lines, {In, Out}
    /// for loop lines (spec §4.1).
    pub fn directions_for_line(&self, line: &str) -> [Direction; 2] {
        if self.is_loop_line(line) {
            [Direction::In, Direction::Out]
        } else {
            [Direction::Up, Direction::Down]
        }
    }

    /// Single next hop from `id` along `line` in `direction`. Loop lines wrap around;
    /// radial lines stop at either end of the order.
    pub fn step(&self, id: StationId, line: &str, direction: Direction) -> Option<StationId> {
        let table = self.line_table(line)?;
        let &order = table.order_of.get(&id)?;
        let order = order as usize;
        let len = table.stations_in_order.len();
        if len == 0 {
            return None;
        }
        match direction {
            Direction::Up | Direction::In => {
                let next = if table.is_loop {
                    (order + 1) % len
                } else if order + 1 < len {
                    order + 1
                } else {
                    return None;
                };
                Some(table.stations_in_order[next])
            }
            Direction::Down | Direction::Out => {
                let next = if table.is_loop {
                    (order + len - 1) % len
                } else if order > 0 {
                    order - 1
                } else {
                    return None;
                };
                Some(table.stations_in_order[next])
            }
            Direction::Unknown => None,
        }
    }

    /// `nextOnLine` contract (spec §4.1): the full ordered successor list in each direction.
    pub fn next_on_line(&self, id: StationId, line: &str) -> (Vec<StationId>, Vec<StationId>) {
        let limit = self.line_table(line).map(|t| t.stations_in_order.len()).unwrap_or(0);

        let mut up = Vec::new();
        let mut cur = id;
        while let Some(next) = self.step(cur, line, Direction::Up) {
            up.push(next);
            cur = next;
            if up.len() >= limit {
                break;
            }
        }

        let mut down = Vec::new();
        let mut cur = id;
        while let Some(next) = self.step(cur, line, Direction::Down) {
            down.push(next);
            cur = next;
            if down.len() >= limit {
                break;
            }
        }

        (up, down)
    }

    pub fn transfer(&self, id: StationId, from_line: &str, to_line: &str) -> Option<Transfer> {
        self.transfers.get(&id)?.get(from_line)?.get(to_line).copied()
    }

    pub fn congestion(&self, id: StationId, line: &str, direction: Direction, day_class: DayClass, time_bucket: u32) -> f32 {
        self.congestion
            .get(&id)
            .and_then(|by_line| by_line.get(line))
            .and_then(|by_direction_day| by_direction_day.get(&(direction, day_class)))
            .and_then(|buckets| buckets.get(&time_bucket).copied())
            .unwrap_or(DEFAULT_CONGESTION)
    }

    /// `intermediateStations` contract (spec §4.1): stations strictly between `from` and
    /// `to` plus `to` itself, in traversal order. Falls back to `[to]` if either endpoint
    /// lacks an order entry on `line`. `direction` disambiguates which way around a loop line
    /// was actually ridden — on a radial line the order of `from`/`to` already implies it.
    pub fn intermediate_stations(&self, from: StationId, to: StationId, line: &str, direction: Direction) -> Vec<StationId> {
        let Some(table) = self.line_table(line) else { return vec![to] };
        let (Some(&from_order), Some(&to_order)) = (table.order_of.get(&from), table.order_of.get(&to)) else {
            return vec![to];
        };
        if table.is_loop {
            return self.walk_loop(table, from_order, to_order, direction);
        }
        let from_order = from_order as usize;
        let to_order = to_order as usize;
        if from_order <= to_order {
            table.stations_in_order[from_order + 1..=to_order].to_vec()
        } else {
            table.stations_in_order[to_order..from_order].iter().rev().copied().collect()
        }
    }

    /// Walks a loop line's ring starting just past `from_order`, stepping forward (`In`) or
    /// backward (`Out`) per `direction` (spec §4.1's loop-wraparound `nextOnLine`), until
    /// `to_order` is reached. `direction` must match the direction the ride actually boarded
    /// under, or the reconstructed leg takes the ring the wrong way around.
    fn walk_loop(&self, table: &LineTable, from_order: u32, to_order: u32, direction: Direction) -> Vec<StationId> {
        let len = table.stations_in_order.len();
        let step_forward = match direction {
            Direction::In | Direction::Up => true,
            Direction::Out | Direction::Down | Direction::Unknown => false,
        };
        let mut out = Vec::new();
        let mut idx = from_order as usize;
        for _ in 0..len {
            idx = if step_forward { (idx + 1) % len } else { (idx + len - 1) % len };
            out.push(table.stations_in_order[idx]);
            if idx == to_order as usize {
                break;
            }
        }
        out
    }

    pub fn num_stations(&self) -> usize {
        self.stations.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_stop_line() -> (Network, StationId, StationId) {
        let mut b = NetworkBuilder::new();
        let a = b.add_station("A", "Alpha", Arc::from("1호선"), 37.0, 127.0);
        let c = b.add_station("B", "Beta", Arc::from("1호선"), 37.01, 127.01);
        b.set_line_order(a, Arc::from("1호선"), 0, false);
        b.set_line_order(c, Arc::from("1호선"), 1, false);
        (b.build(), a, c)
    }

    // Four-stop loop, in ring order W -> X -> Y -> Z -> W.
    fn four_stop_loop() -> (Network, StationId, StationId, StationId, StationId) {
        let mut b = NetworkBuilder::new();
        let w = b.add_station("W", "West", Arc::from("2호선"), 37.00, 127.00);
        let x = b.add_station("X", "Xray", Arc::from("2호선"), 37.01, 127.00);
        let y = b.add_station("Y", "Yankee", Arc::from("2호선"), 37.01, 127.01);
        let z = b.add_station("Z", "Zulu", Arc::from("2호선"), 37.00, 127.01);
        b.set_line_order(w, Arc::from("2호선"), 0, true);
        b.set_line_order(x, Arc::from("2호선"), 1, true);
        b.set_line_order(y, Arc::from("2호선"), 2, true);
        b.set_line_order(z, Arc::from("2호선"), 3, true);
        (b.build(), w, x, y, z)
    }

    #[test]
    fn unknown_code_is_an_error() {
        let (net, _, _) = two_stop_line();
        assert!(matches!(net.station_id("nope"), Err(RouterError::UnknownStation(_))));
    }

    #[test]
    fn step_respects_order_and_bounds() {
        let (net, a, c) = two_stop_line();
        assert_eq!(net.step(a, "1호선", Direction::Up), Some(c));
        assert_eq!(net.step(c, "1호선", Direction::Up), None);
        assert_eq!(net.step(c, "1호선", Direction::Down), Some(a));
    }

    #[test]
    fn intermediate_stations_falls_back_without_order() {
        let (net, a, c) = two_stop_line();
        assert_eq!(net.intermediate_stations(a, c, "nonexistent", Direction::Up), vec![c]);
    }

    #[test]
    fn loop_intermediate_stations_respects_the_ridden_direction() {
        let (net, w, x, y, z) = four_stop_loop();
        // W -> Z stepping forward (`In`) goes the long way around the ring: X, Y, then Z.
        assert_eq!(net.intermediate_stations(w, z, "2호선", Direction::In), vec![x, y, z]);
        // The same W -> Z pair stepping backward (`Out`) is the short one-hop wraparound.
        assert_eq!(net.intermediate_stations(w, z, "2호선", Direction::Out), vec![z]);
    }

    #[test]
    fn missing_congestion_uses_default() {
        let (net, a, _) = two_stop_line();
        let ratio = net.congestion(a, "1호선", Direction::Up, DayClass::Weekday, 1800);
        assert_eq!(ratio, DEFAULT_CONGESTION);
    }

    #[test]
    fn missing_transfer_is_none_not_an_error() {
        let (net, a, _) = two_stop_line();
        assert!(net.transfer(a, "1호선", "2호선").is_none());
    }

    #[test]
    fn west_north_richmond_like_distance() {
        let p1 = NetworkPoint { latitude: -37.8149489647782, longitude: 144.991422784199 };
        let p2 = NetworkPoint { latitude: -37.8103983564789, longitude: 144.992500261754 };
        let distance_m = p1.distance_meters(p2);
        assert!((distance_m - 514.6).abs() < 100.0);
    }
}
