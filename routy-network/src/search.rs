use crate::{LocationId, RoadNetwork, WeightKind};
use ordered_float::OrderedFloat;
use std::{
    cmp::{Ordering, Reverse},
    collections::BinaryHeap,
};

/// tolerance used when deciding whether two path costs are equal.
pub const COST_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone)]
struct Label {
    cost: f64,
    path: Vec<LocationId>,
}

/// runs Dijkstra's algorithm from `src` to `dst` over the selected edge weight.
///
/// among paths of equal total cost, the one whose sequence of location names
/// sorts first lexicographically is returned. this holds because all weights
/// are positive: every predecessor on an equal-cost path is settled before the
/// node it leads to, so each node's label has seen every tied candidate.
///
/// # Returns
///
/// * the sequence of locations from `src` to `dst` (inclusive) with its total
///   cost, or None if `dst` is unreachable from `src`
pub fn dijkstra(
    network: &RoadNetwork,
    src: LocationId,
    dst: LocationId,
    kind: WeightKind,
) -> Option<(Vec<LocationId>, f64)> {
    if src == dst {
        return Some((vec![src], 0.0));
    }
    let mut best: Vec<Option<Label>> = vec![None; network.n_locations()];
    let mut settled: Vec<bool> = vec![false; network.n_locations()];
    let mut frontier: BinaryHeap<Reverse<(OrderedFloat<f64>, LocationId)>> = BinaryHeap::new();

    best[src.0] = Some(Label {
        cost: 0.0,
        path: vec![src],
    });
    frontier.push(Reverse((OrderedFloat(0.0), src)));

    while let Some(Reverse((_, node))) = frontier.pop() {
        if settled[node.0] {
            continue;
        }
        let label = match &best[node.0] {
            Some(label) => label.clone(),
            None => continue,
        };
        settled[node.0] = true;
        if node == dst {
            return Some((label.path, label.cost));
        }

        for (neighbor, weight) in network.adjacent(node, kind) {
            if settled[neighbor.0] {
                continue;
            }
            let candidate_cost = label.cost + weight;
            let replace = match &best[neighbor.0] {
                None => true,
                Some(existing) if candidate_cost < existing.cost - COST_EPSILON => true,
                Some(existing) if (candidate_cost - existing.cost).abs() <= COST_EPSILON => {
                    let extended = label.path.iter().copied().chain(std::iter::once(neighbor));
                    compare_by_name(network, extended, existing.path.iter().copied())
                        == Ordering::Less
                }
                Some(_) => false,
            };
            if replace {
                let mut path = label.path.clone();
                path.push(neighbor);
                best[neighbor.0] = Some(Label {
                    cost: candidate_cost,
                    path,
                });
                frontier.push(Reverse((OrderedFloat(candidate_cost), neighbor)));
            }
        }
    }
    None
}

/// lexicographic comparison of two location sequences by location name.
fn compare_by_name(
    network: &RoadNetwork,
    a: impl Iterator<Item = LocationId>,
    b: impl Iterator<Item = LocationId>,
) -> Ordering {
    a.map(|id| network.name_of(id))
        .cmp(b.map(|id| network.name_of(id)))
}

#[cfg(test)]
mod test {
    use super::*;

    fn names(network: &RoadNetwork, path: &[LocationId]) -> Vec<String> {
        path.iter()
            .map(|id| network.name_of(*id).to_string())
            .collect()
    }

    #[test]
    fn test_tie_broken_by_name_sequence() {
        // two equal-cost routes A-C-D and A-B-D, inserted so that the
        // lexicographically larger one would be discovered first
        let mut network = RoadNetwork::default();
        network.add_edge("A", "C", 5.0).unwrap();
        network.add_edge("C", "D", 5.0).unwrap();
        network.add_edge("A", "B", 5.0).unwrap();
        network.add_edge("B", "D", 5.0).unwrap();
        let a = network.location_id("A").unwrap();
        let d = network.location_id("D").unwrap();
        let (path, cost) = dijkstra(&network, a, d, WeightKind::Current).unwrap();
        assert_eq!(names(&network, &path), vec!["A", "B", "D"]);
        assert!((cost - 10.0).abs() < COST_EPSILON);
    }

    #[test]
    fn test_longer_hop_count_wins_when_cheaper() {
        let mut network = RoadNetwork::default();
        network.add_edge("A", "E", 10.0).unwrap();
        network.add_edge("A", "B", 2.0).unwrap();
        network.add_edge("B", "C", 2.0).unwrap();
        network.add_edge("C", "E", 2.0).unwrap();
        let a = network.location_id("A").unwrap();
        let e = network.location_id("E").unwrap();
        let (path, cost) = dijkstra(&network, a, e, WeightKind::Current).unwrap();
        assert_eq!(names(&network, &path), vec!["A", "B", "C", "E"]);
        assert!((cost - 6.0).abs() < COST_EPSILON);
    }

    #[test]
    fn test_base_weights_ignore_traffic() {
        let mut network = RoadNetwork::default();
        network.add_edge("A", "B", 10.0).unwrap();
        network.add_edge("A", "C", 6.0).unwrap();
        network.add_edge("C", "B", 6.0).unwrap();
        network.update_traffic("A", "B", 1.0).unwrap();
        let a = network.location_id("A").unwrap();
        let b = network.location_id("B").unwrap();
        let (current_path, current_cost) = dijkstra(&network, a, b, WeightKind::Current).unwrap();
        assert_eq!(names(&network, &current_path), vec!["A", "C", "B"]);
        assert!((current_cost - 12.0).abs() < COST_EPSILON);
        let (base_path, base_cost) = dijkstra(&network, a, b, WeightKind::Base).unwrap();
        assert_eq!(names(&network, &base_path), vec!["A", "B"]);
        assert!((base_cost - 10.0).abs() < COST_EPSILON);
    }

    #[test]
    fn test_unreachable() {
        let mut network = RoadNetwork::default();
        network.add_edge("A", "B", 1.0).unwrap();
        network.add_edge("C", "D", 1.0).unwrap();
        let a = network.location_id("A").unwrap();
        let d = network.location_id("D").unwrap();
        assert!(dijkstra(&network, a, d, WeightKind::Current).is_none());
    }
}
