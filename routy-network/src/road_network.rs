use crate::{
    search::{self, COST_EPSILON},
    Edge, EdgeSummary, LocationId, NetworkError, UnknownLocationPolicy, WeightKind,
};
use itertools::Itertools;
use std::collections::HashMap;

/// undirected road graph of named locations. edges carry a fixed base travel
/// time and a current travel time inflated by traffic.
///
/// locations and edges are stored densely in registration order; the order of
/// [`RoadNetwork::get_all_edges`] is therefore the edge insertion order.
#[derive(Default, Debug, Clone)]
pub struct RoadNetwork {
    /// location names indexed by [`LocationId`]
    names: Vec<String>,
    /// reverse lookup from name to id
    ids: HashMap<String, LocationId>,
    /// edges in insertion order
    edges: Vec<Edge>,
    /// edge index by unordered endpoint pair, stored as (min, max)
    edge_index: HashMap<(LocationId, LocationId), usize>,
    /// edge indices incident to each location
    adj: Vec<Vec<usize>>,
}

/// result of a shortest path query
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPath {
    pub path: Vec<String>,
    pub length: f64,
}

impl RoadNetwork {
    pub fn new() -> RoadNetwork {
        RoadNetwork::default()
    }

    /// registers a location. no-op if the location already exists.
    pub fn add_location(&mut self, name: &str) -> LocationId {
        if let Some(id) = self.ids.get(name) {
            return *id;
        }
        let id = LocationId(self.names.len());
        self.names.push(name.to_string());
        self.ids.insert(name.to_string(), id);
        self.adj.push(vec![]);
        id
    }

    /// adds an undirected edge with the given base travel time in minutes,
    /// registering either endpoint if absent. the current weight starts out
    /// equal to the base weight.
    pub fn add_edge(&mut self, a: &str, b: &str, base_weight: f64) -> Result<(), NetworkError> {
        if !(base_weight.is_finite() && base_weight > 0.0) {
            return Err(NetworkError::InvalidWeight {
                start: a.to_string(),
                end: b.to_string(),
                weight: base_weight,
            });
        }
        if a == b {
            return Err(NetworkError::SelfLoop(a.to_string()));
        }
        if let (Some(src), Some(dst)) = (self.ids.get(a), self.ids.get(b)) {
            if self.edge_index.contains_key(&edge_key(*src, *dst)) {
                return Err(NetworkError::DuplicateEdge(a.to_string(), b.to_string()));
            }
        }
        let src = self.add_location(a);
        let dst = self.add_location(b);
        let edge_idx = self.edges.len();
        self.edges.push(Edge::new(src, dst, base_weight));
        self.edge_index.insert(edge_key(src, dst), edge_idx);
        self.adj[src.0].push(edge_idx);
        self.adj[dst.0].push(edge_idx);
        log::debug!("added edge ({a}, {b}) with base weight {base_weight}");
        Ok(())
    }

    /// alias of [`RoadNetwork::add_edge`] where the weight is a travel time in minutes.
    pub fn add_route(&mut self, start: &str, end: &str, travel_time: f64) -> Result<(), NetworkError> {
        self.add_edge(start, end, travel_time)
    }

    /// sets the current weight of edge {a, b} to `base_weight * (1 + delay_factor)`
    /// after clamping the delay factor to [0, 1].
    pub fn update_traffic(&mut self, a: &str, b: &str, delay_factor: f64) -> Result<(), NetworkError> {
        let edge_idx = self
            .find_edge(a, b)
            .ok_or_else(|| NetworkError::UnknownEdge(a.to_string(), b.to_string()))?;
        let edge = &mut self.edges[edge_idx];
        edge.apply_delay(delay_factor);
        log::debug!(
            "traffic update on ({a}, {b}): delay {:.3}, weight {:.1}",
            edge.delay_factor(),
            edge.current_weight()
        );
        Ok(())
    }

    /// looks up a location, registering it first when the policy allows it.
    pub fn resolve(
        &mut self,
        name: &str,
        policy: UnknownLocationPolicy,
    ) -> Result<LocationId, NetworkError> {
        match (self.ids.get(name), policy) {
            (Some(id), _) => Ok(*id),
            (None, UnknownLocationPolicy::Register) => {
                log::info!("registering previously unknown location '{name}'");
                Ok(self.add_location(name))
            }
            (None, UnknownLocationPolicy::Reject) => {
                Err(NetworkError::UnknownLocation(name.to_string()))
            }
        }
    }

    pub fn location_id(&self, name: &str) -> Result<LocationId, NetworkError> {
        self.ids
            .get(name)
            .copied()
            .ok_or_else(|| NetworkError::UnknownLocation(name.to_string()))
    }

    pub(crate) fn name_of(&self, id: LocationId) -> &str {
        self.names.get(id.0).map(String::as_str).unwrap_or_default()
    }

    /// shortest path over current weights. ties between equal-cost paths resolve
    /// to the lexicographically smallest sequence of location names.
    pub fn shortest_path(&self, a: &str, b: &str) -> Result<Vec<String>, NetworkError> {
        self.shortest_path_by(a, b, WeightKind::Current)
            .map(|result| result.path)
    }

    /// total current weight of the shortest path between `a` and `b`.
    pub fn shortest_path_length(&self, a: &str, b: &str) -> Result<f64, NetworkError> {
        self.shortest_path_by(a, b, WeightKind::Current)
            .map(|result| result.length)
    }

    /// shortest path search over the selected edge weight.
    pub fn shortest_path_by(
        &self,
        a: &str,
        b: &str,
        kind: WeightKind,
    ) -> Result<ShortestPath, NetworkError> {
        let src = self.location_id(a)?;
        let dst = self.location_id(b)?;
        let (ids, length) = search::dijkstra(self, src, dst, kind)
            .ok_or_else(|| NetworkError::NoPathFound(a.to_string(), b.to_string()))?;
        let path = ids
            .into_iter()
            .map(|id| self.name_of(id).to_string())
            .collect_vec();
        Ok(ShortestPath { path, length })
    }

    /// every edge with its current weight, base weight and delay factor, in
    /// insertion order.
    pub fn get_all_edges(&self) -> Vec<EdgeSummary> {
        self.edges
            .iter()
            .map(|edge| EdgeSummary {
                start: self.name_of(edge.src).to_string(),
                end: self.name_of(edge.dst).to_string(),
                weight: edge.current_weight(),
                base_weight: edge.base_weight(),
                delay_factor: edge.delay_factor(),
            })
            .collect_vec()
    }

    /// edges whose delay factor is at least `threshold`, in insertion order.
    pub fn get_congested_routes(&self, threshold: f64) -> Result<Vec<EdgeSummary>, NetworkError> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(NetworkError::InvalidThreshold(threshold));
        }
        let congested = self
            .get_all_edges()
            .into_iter()
            .filter(|edge| edge.delay_factor >= threshold - COST_EPSILON)
            .collect_vec();
        Ok(congested)
    }

    /// directly connected neighbors of a location in edge insertion order, or an
    /// empty list for an unknown location.
    pub fn get_neighbors(&self, location: &str) -> Vec<String> {
        match self.ids.get(location) {
            None => vec![],
            Some(id) => self
                .adjacent(*id, WeightKind::Current)
                .map(|(neighbor, _)| self.name_of(neighbor).to_string())
                .collect_vec(),
        }
    }

    pub fn get_all_locations(&self) -> Vec<String> {
        self.names.clone()
    }

    pub fn has_location(&self, location: &str) -> bool {
        self.ids.contains_key(location)
    }

    /// current weight of edge {a, b}, if it exists.
    pub fn get_edge_weight(&self, a: &str, b: &str) -> Option<f64> {
        self.find_edge(a, b)
            .map(|edge_idx| self.edges[edge_idx].current_weight())
    }

    pub fn n_locations(&self) -> usize {
        self.names.len()
    }

    pub fn n_edges(&self) -> usize {
        self.edges.len()
    }

    /// neighbors of a location along with the selected weight of the connecting edge.
    pub(crate) fn adjacent(
        &self,
        id: LocationId,
        kind: WeightKind,
    ) -> impl Iterator<Item = (LocationId, f64)> + '_ {
        self.adj
            .get(id.0)
            .into_iter()
            .flatten()
            .filter_map(move |edge_idx| self.edges.get(*edge_idx))
            .map(move |edge| (edge.opposite(id), edge.weight(kind)))
    }

    fn find_edge(&self, a: &str, b: &str) -> Option<usize> {
        let src = self.ids.get(a)?;
        let dst = self.ids.get(b)?;
        self.edge_index.get(&edge_key(*src, *dst)).copied()
    }
}

fn edge_key(a: LocationId, b: LocationId) -> (LocationId, LocationId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const TOL: f64 = 1e-9;

    fn german_network() -> RoadNetwork {
        let mut network = RoadNetwork::new();
        let edges = [
            ("Berlin", "Hamburg", 180.0),
            ("Berlin", "Leipzig", 120.0),
            ("Hamburg", "Düsseldorf", 240.0),
            ("München", "Stuttgart", 150.0),
            ("München", "Frankfurt", 240.0),
            ("Köln", "Düsseldorf", 30.0),
            ("Köln", "Frankfurt", 120.0),
            ("Frankfurt", "Stuttgart", 90.0),
            ("Frankfurt", "Leipzig", 240.0),
            ("Dortmund", "Düsseldorf", 45.0),
            ("Dortmund", "Köln", 60.0),
        ];
        for (a, b, w) in edges {
            network.add_edge(a, b, w).unwrap();
        }
        network
    }

    #[test]
    fn test_add_location_idempotent() {
        let mut network = RoadNetwork::new();
        let first = network.add_location("Berlin");
        let second = network.add_location("Berlin");
        assert_eq!(first, second);
        assert_eq!(network.n_locations(), 1);
    }

    #[test]
    fn test_add_edge_rejects_non_positive_weight() {
        let mut network = RoadNetwork::new();
        for weight in [0.0, -5.0, f64::NAN] {
            let result = network.add_edge("A", "B", weight);
            assert!(matches!(result, Err(NetworkError::InvalidWeight { .. })));
        }
        assert_eq!(network.n_edges(), 0);
        assert!(!network.has_location("A"));
    }

    #[test]
    fn test_add_edge_registers_endpoints() {
        let mut network = RoadNetwork::new();
        network.add_edge("A", "B", 3.0).unwrap();
        assert!(network.has_location("A"));
        assert!(network.has_location("B"));
        assert_eq!(network.get_edge_weight("B", "A"), Some(3.0));
        assert_eq!(
            network.add_edge("B", "A", 4.0),
            Err(NetworkError::DuplicateEdge("B".to_string(), "A".to_string()))
        );
    }

    #[test]
    fn test_update_traffic_berlin_hamburg() {
        let mut network = german_network();
        network.update_traffic("Berlin", "Hamburg", 0.8).unwrap();
        let weight = network.get_edge_weight("Berlin", "Hamburg").unwrap();
        assert!((weight - 324.0).abs() < TOL);
        let edge = network
            .get_all_edges()
            .into_iter()
            .find(|e| e.start == "Berlin" && e.end == "Hamburg")
            .unwrap();
        assert!((edge.delay_factor - 0.8).abs() < TOL);
        assert_eq!(edge.base_weight, 180.0);
    }

    #[test]
    fn test_update_traffic_sets_delay_for_every_edge() {
        let mut network = german_network();
        let delays = [0.0, 0.1, 0.25, 0.5, 0.75, 1.0];
        let edges = network.get_all_edges();
        for (edge, delay) in edges.iter().zip(delays.iter().cycle()) {
            network.update_traffic(&edge.end, &edge.start, *delay).unwrap();
        }
        for (edge, delay) in network.get_all_edges().iter().zip(delays.iter().cycle()) {
            assert!((edge.delay_factor - delay).abs() < TOL);
            assert!((edge.weight - edge.base_weight * (1.0 + delay)).abs() < TOL);
        }
    }

    #[test]
    fn test_update_traffic_unknown_edge() {
        let mut network = german_network();
        let result = network.update_traffic("Berlin", "München", 0.5);
        assert_eq!(
            result,
            Err(NetworkError::UnknownEdge(
                "Berlin".to_string(),
                "München".to_string()
            ))
        );
    }

    #[test]
    fn test_congested_routes() {
        let mut network = RoadNetwork::new();
        network.add_edge("A", "B", 10.0).unwrap();
        network.add_edge("B", "C", 10.0).unwrap();
        network.add_edge("C", "D", 10.0).unwrap();
        network.update_traffic("A", "B", 0.8).unwrap();
        network.update_traffic("B", "C", 0.3).unwrap();
        network.update_traffic("C", "D", 0.55).unwrap();
        let congested = network.get_congested_routes(0.5).unwrap();
        let pairs = congested
            .iter()
            .map(|e| (e.start.as_str(), e.end.as_str()))
            .collect_vec();
        assert_eq!(pairs, vec![("A", "B"), ("C", "D")]);

        assert_eq!(network.get_congested_routes(0.0).unwrap().len(), 3);
        assert!(network.get_congested_routes(1.0).unwrap().is_empty());
        network.update_traffic("B", "C", 1.0).unwrap();
        let maxed = network.get_congested_routes(1.0).unwrap();
        assert_eq!(maxed.len(), 1);
        assert_eq!(maxed[0].start, "B");
    }

    #[test]
    fn test_congested_routes_invalid_threshold() {
        let network = german_network();
        for threshold in [-0.1, 1.1, f64::NAN] {
            assert!(matches!(
                network.get_congested_routes(threshold),
                Err(NetworkError::InvalidThreshold(_))
            ));
        }
    }

    #[test]
    fn test_shortest_path_to_self() {
        let network = german_network();
        assert_eq!(network.shortest_path("Köln", "Köln").unwrap(), vec!["Köln"]);
        assert_eq!(network.shortest_path_length("Köln", "Köln").unwrap(), 0.0);
    }

    #[test]
    fn test_shortest_path_berlin_muenchen() {
        let network = german_network();
        let path = network.shortest_path("Berlin", "München").unwrap();
        assert_eq!(path, vec!["Berlin", "Leipzig", "Frankfurt", "München"]);
        let length = network.shortest_path_length("Berlin", "München").unwrap();
        assert!((length - 600.0).abs() < TOL);
    }

    #[test]
    fn test_shortest_path_reroutes_around_traffic() {
        let mut network = german_network();
        // Berlin-Leipzig-Frankfurt: 360, Berlin-Hamburg-Düsseldorf-Köln-Frankfurt: 570
        network.update_traffic("Frankfurt", "Leipzig", 1.0).unwrap();
        network.update_traffic("Berlin", "Leipzig", 1.0).unwrap();
        let path = network.shortest_path("Berlin", "Frankfurt").unwrap();
        assert_eq!(path, vec!["Berlin", "Hamburg", "Düsseldorf", "Köln", "Frankfurt"]);
        let length = network.shortest_path_length("Berlin", "Frankfurt").unwrap();
        assert!((length - 570.0).abs() < TOL);
    }

    #[test]
    fn test_shortest_path_is_optimal() {
        // compares against Floyd-Warshall over every pair
        let mut network = german_network();
        network.update_traffic("Köln", "Frankfurt", 0.9).unwrap();
        network.update_traffic("Dortmund", "Köln", 0.4).unwrap();
        let locations = network.get_all_locations();
        let n = locations.len();
        let mut dist = vec![vec![f64::INFINITY; n]; n];
        for (i, row) in dist.iter_mut().enumerate() {
            row[i] = 0.0;
        }
        for edge in network.get_all_edges() {
            let i = network.location_id(&edge.start).unwrap().0;
            let j = network.location_id(&edge.end).unwrap().0;
            dist[i][j] = edge.weight;
            dist[j][i] = edge.weight;
        }
        for k in 0..n {
            for i in 0..n {
                for j in 0..n {
                    if dist[i][k] + dist[k][j] < dist[i][j] {
                        dist[i][j] = dist[i][k] + dist[k][j];
                    }
                }
            }
        }
        for (i, a) in locations.iter().enumerate() {
            for (j, b) in locations.iter().enumerate() {
                let length = network.shortest_path_length(a, b).unwrap();
                assert!((length - dist[i][j]).abs() < 1e-6, "{a} -> {b}");
                let path = network.shortest_path(a, b).unwrap();
                let path_cost: f64 = path
                    .iter()
                    .tuple_windows()
                    .map(|(u, v)| network.get_edge_weight(u, v).unwrap())
                    .sum();
                assert!((path_cost - length).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_shortest_path_errors() {
        let mut network = german_network();
        assert_eq!(
            network.shortest_path("Berlin", "Paris"),
            Err(NetworkError::UnknownLocation("Paris".to_string()))
        );
        network.add_edge("Dresden", "Görlitz", 60.0).unwrap();
        assert_eq!(
            network.shortest_path_length("Berlin", "Dresden"),
            Err(NetworkError::NoPathFound(
                "Berlin".to_string(),
                "Dresden".to_string()
            ))
        );
    }

    #[test]
    fn test_resolve_policy() {
        let mut network = german_network();
        assert_eq!(
            network.resolve("Bremen", UnknownLocationPolicy::Reject),
            Err(NetworkError::UnknownLocation("Bremen".to_string()))
        );
        assert!(!network.has_location("Bremen"));
        let id = network
            .resolve("Bremen", UnknownLocationPolicy::Register)
            .unwrap();
        assert_eq!(network.location_id("Bremen").unwrap(), id);
        assert!(network.get_neighbors("Bremen").is_empty());
        assert!(matches!(
            network.shortest_path("Bremen", "Berlin"),
            Err(NetworkError::NoPathFound(_, _))
        ));
    }

    #[test]
    fn test_neighbors_and_locations() {
        let network = german_network();
        assert_eq!(network.get_neighbors("Köln"), vec!["Düsseldorf", "Frankfurt", "Dortmund"]);
        assert!(network.get_neighbors("Paris").is_empty());
        assert_eq!(network.get_all_locations().len(), 9);
        assert_eq!(network.get_all_locations()[0], "Berlin");
        assert_eq!(network.get_edge_weight("Berlin", "München"), None);
    }

    #[test]
    fn test_edge_summary_serializes() {
        let network = german_network();
        let edges = network.get_all_edges();
        let json = serde_json::to_value(&edges[0]).unwrap();
        assert_eq!(json["start"], "Berlin");
        assert_eq!(json["base_weight"], 180.0);
    }
}
