use crate::model::{optimizer::Order, RoutyError};
use std::path::Path;

/// reads an order batch from a `.csv` or `.json` file. rows that do not
/// describe an order are skipped with a warning.
///
/// JSON files hold either a bare array of orders or an object with an `orders`
/// array. both formats accept `id`, `start` and `end` as short field names and
/// default a missing priority to 1.
pub fn read_orders(f: &str) -> Result<Vec<Order>, RoutyError> {
    let extension = Path::new(f)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());
    let orders = match extension.as_deref() {
        Some("csv") => read_csv(f)?,
        Some("json") => read_json(f)?,
        _ => {
            return Err(RoutyError::OrderFileError(
                f.to_string(),
                String::from("unsupported file type, expected .csv or .json"),
            ))
        }
    };
    log::info!("read {} orders from {f}", orders.len());
    Ok(orders)
}

fn read_csv(f: &str) -> Result<Vec<Order>, RoutyError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(f)
        .map_err(|e| RoutyError::OrderFileError(f.to_string(), e.to_string()))?;
    let mut orders = vec![];
    for (idx, row) in reader.deserialize::<Order>().enumerate() {
        match row {
            Ok(order) => orders.push(order),
            Err(e) => log::warn!("skipping malformed order row {} in {f}: {e}", idx + 1),
        }
    }
    Ok(orders)
}

fn read_json(f: &str) -> Result<Vec<Order>, RoutyError> {
    let contents = std::fs::read_to_string(f)
        .map_err(|e| RoutyError::OrderFileError(f.to_string(), e.to_string()))?;
    let value: serde_json::Value = serde_json::from_str(&contents)
        .map_err(|e| RoutyError::OrderFileError(f.to_string(), e.to_string()))?;
    let rows = match value {
        serde_json::Value::Array(rows) => rows,
        serde_json::Value::Object(mut map) => match map.remove("orders") {
            Some(serde_json::Value::Array(rows)) => rows,
            _ => {
                return Err(RoutyError::OrderFileError(
                    f.to_string(),
                    String::from("expected an 'orders' array"),
                ))
            }
        },
        _ => {
            return Err(RoutyError::OrderFileError(
                f.to_string(),
                String::from("expected an array of orders"),
            ))
        }
    };
    let orders = rows
        .into_iter()
        .enumerate()
        .filter_map(|(idx, row)| match serde_json::from_value::<Order>(row) {
            Ok(order) => Some(order),
            Err(e) => {
                log::warn!("skipping malformed order {} in {f}: {e}", idx + 1);
                None
            }
        })
        .collect();
    Ok(orders)
}

#[cfg(test)]
mod test {
    use super::*;

    fn temp_file(name: &str, contents: &str) -> String {
        let path = std::env::temp_dir().join(format!("routy-orders-{}-{}", std::process::id(), name));
        std::fs::write(&path, contents).unwrap();
        path.to_string_lossy().to_string()
    }

    #[test]
    fn test_read_csv_skips_malformed_rows() {
        let csv = "order_id,start_location,end_location,priority\n\
                   1,Berlin,Hamburg,2\n\
                   two,Köln,Frankfurt,1\n\
                   3, Leipzig , München ,1\n";
        let f = temp_file("orders.csv", csv);
        let orders = read_orders(&f).unwrap();
        assert_eq!(
            orders,
            vec![
                Order::new(1, "Berlin", "Hamburg", 2),
                Order::new(3, "Leipzig", "München", 1),
            ]
        );
        let _ = std::fs::remove_file(&f);
    }

    #[test]
    fn test_read_csv_short_headers() {
        let csv = "id,start,end\n4,Dortmund,Köln\n";
        let f = temp_file("short.csv", csv);
        let orders = read_orders(&f).unwrap();
        assert_eq!(orders, vec![Order::new(4, "Dortmund", "Köln", 1)]);
        let _ = std::fs::remove_file(&f);
    }

    #[test]
    fn test_read_json_layouts() {
        let bare = r#"[{"order_id": 1, "start_location": "Berlin", "end_location": "Hamburg"}]"#;
        let wrapped = r#"{"orders": [
            {"id": 1, "start": "Berlin", "end": "Hamburg"},
            {"id": "x"}
        ]}"#;
        for (name, contents) in [("bare.json", bare), ("wrapped.json", wrapped)] {
            let f = temp_file(name, contents);
            let orders = read_orders(&f).unwrap();
            assert_eq!(orders, vec![Order::new(1, "Berlin", "Hamburg", 1)], "{name}");
            let _ = std::fs::remove_file(&f);
        }
    }

    #[test]
    fn test_read_orders_failures() {
        assert!(matches!(
            read_orders("orders.xml"),
            Err(RoutyError::OrderFileError(_, _))
        ));
        let f = temp_file("scalar.json", "42");
        assert!(read_orders(&f).is_err());
        let _ = std::fs::remove_file(&f);
        assert!(read_orders("/no/such/orders.csv").is_err());
    }
}
