use contracts::domain::a100_order_line::OrderLine;
use once_cell::sync::OnceCell;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use super::loader::{load_order_lines, LoadError};

/// Sales table loaded once at startup and shared read-only by all requests
static ORDER_TABLE: OnceCell<Arc<[OrderLine]>> = OnceCell::new();

pub fn initialize_store(csv_path: &Path) -> Result<usize, LoadError> {
    let lines = load_order_lines(csv_path)?;
    let count = lines.len();

    let unknown = unknown_size_codes(&lines);
    if !unknown.is_empty() {
        tracing::warn!(
            "Sales table has size codes outside S..XXL: {}; size share will reject them",
            unknown.into_iter().collect::<Vec<_>>().join(", ")
        );
    }

    if ORDER_TABLE.set(Arc::from(lines)).is_err() {
        tracing::warn!("Order store already initialized, keeping the first table");
    }
    Ok(count)
}

/// Distinct `pizza_size` values that are not a known size, sorted
pub fn unknown_size_codes(lines: &[OrderLine]) -> BTreeSet<&str> {
    lines
        .iter()
        .filter(|l| l.size().is_none())
        .map(|l| l.pizza_size.as_str())
        .collect()
}

/// Current sales table; empty until [`initialize_store`] has run
pub fn get_table() -> Arc<[OrderLine]> {
    ORDER_TABLE
        .get()
        .cloned()
        .unwrap_or_else(|| Arc::from(Vec::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::loader::parse_order_lines;

    #[test]
    fn test_unknown_size_codes() {
        let text = "order_id,order_date,order_time,pizza_name,pizza_category,pizza_size,quantity,total_price\n\
                    1,2015-01-01,11:00:00,The Greek Pizza,Classic,XXXL,1,40\n\
                    2,2015-01-01,12:00:00,The Greek Pizza,Classic,M,1,12\n\
                    3,2015-01-02,12:00:00,The Hawaiian Pizza,Classic,Family,1,30\n\
                    4,2015-01-03,13:00:00,The Greek Pizza,Classic,XXXL,1,40\n";
        let lines = parse_order_lines(text).unwrap();

        let unknown: Vec<&str> = unknown_size_codes(&lines).into_iter().collect();
        assert_eq!(unknown, vec!["Family", "XXXL"]);
    }

    #[test]
    fn test_sample_export_has_only_known_sizes() {
        let lines = parse_order_lines(include_str!("../../../../../data/pizza_sales.csv")).unwrap();
        assert!(unknown_size_codes(&lines).is_empty());
    }
}
