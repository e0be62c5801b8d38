use crate::model::RoutyError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const DEFAULT_PRIORITY: i64 = 1;

fn default_priority() -> i64 {
    DEFAULT_PRIORITY
}

/// a transport order between two locations. lower priority values are more
/// urgent.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Order {
    #[serde(alias = "id")]
    pub order_id: u64,
    #[serde(alias = "start")]
    pub start_location: String,
    #[serde(alias = "end")]
    pub end_location: String,
    #[serde(default = "default_priority")]
    pub priority: i64,
}

impl Order {
    pub fn new(order_id: u64, start_location: &str, end_location: &str, priority: i64) -> Order {
        Order {
            order_id,
            start_location: start_location.to_string(),
            end_location: end_location.to_string(),
            priority,
        }
    }
}

/// rejects batches with repeated order ids or blank location names.
pub fn validate_orders(orders: &[Order]) -> Result<(), RoutyError> {
    let mut seen: HashSet<u64> = HashSet::new();
    for order in orders.iter() {
        if !seen.insert(order.order_id) {
            return Err(RoutyError::DuplicateOrder(order.order_id));
        }
        if order.start_location.trim().is_empty() {
            return Err(RoutyError::InvalidOrder(
                order.order_id,
                String::from("start_location is empty"),
            ));
        }
        if order.end_location.trim().is_empty() {
            return Err(RoutyError::InvalidOrder(
                order.order_id,
                String::from("end_location is empty"),
            ));
        }
    }
    Ok(())
}

/// indices of `orders` sorted by priority, keeping submission order among equals.
pub fn deterministic_sequence(orders: &[Order]) -> Vec<usize> {
    let mut indices = (0..orders.len()).collect::<Vec<_>>();
    indices.sort_by_key(|idx| orders[*idx].priority);
    indices
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_deserialize_aliases_and_default_priority() {
        let json = r#"[
            {"order_id": 1, "start_location": "Berlin", "end_location": "Hamburg", "priority": 3},
            {"id": 2, "start": "Köln", "end": "Frankfurt"}
        ]"#;
        let orders: Vec<Order> = serde_json::from_str(json).unwrap();
        assert_eq!(orders[0], Order::new(1, "Berlin", "Hamburg", 3));
        assert_eq!(orders[1], Order::new(2, "Köln", "Frankfurt", DEFAULT_PRIORITY));
    }

    #[test]
    fn test_validate() {
        let ok = vec![Order::new(1, "A", "B", 1), Order::new(2, "B", "C", 1)];
        assert!(validate_orders(&ok).is_ok());
        assert!(validate_orders(&[]).is_ok());
        let dup = vec![Order::new(7, "A", "B", 1), Order::new(7, "B", "C", 2)];
        assert!(matches!(
            validate_orders(&dup),
            Err(RoutyError::DuplicateOrder(7))
        ));
        let blank = vec![Order::new(3, " ", "B", 1)];
        assert!(matches!(
            validate_orders(&blank),
            Err(RoutyError::InvalidOrder(3, _))
        ));
    }

    #[test]
    fn test_sequence_is_stable() {
        let orders = vec![
            Order::new(10, "A", "B", 2),
            Order::new(11, "C", "D", 1),
            Order::new(12, "E", "F", 2),
            Order::new(13, "G", "H", 1),
        ];
        assert_eq!(deterministic_sequence(&orders), vec![1, 3, 0, 2]);
    }
}
