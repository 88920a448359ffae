use contracts::dashboards::d400_pizza_sales::{FilterOptions, SalesFilter};
use contracts::domain::a100_order_line::OrderLine;
use contracts::enums::PizzaSize;
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum FilterError {
    #[error("invalid date range: {date_from} is after {date_to}")]
    InvalidDateRange { date_from: String, date_to: String },
}

/// Narrow the table to the lines matching `filter`, preserving input order.
///
/// Lines are borrowed from `table`, never copied. An empty result is not an
/// error.
pub fn apply_filter<'a>(
    table: &'a [OrderLine],
    filter: &SalesFilter,
) -> Result<Vec<&'a OrderLine>, FilterError> {
    if let (Some(from), Some(to)) = (filter.date_from, filter.date_to) {
        if from > to {
            return Err(FilterError::InvalidDateRange {
                date_from: from.to_string(),
                date_to: to.to_string(),
            });
        }
    }

    if filter.is_empty() {
        return Ok(table.iter().collect());
    }

    let selected = table
        .iter()
        .filter(|line| matches(line, filter))
        .collect();

    Ok(selected)
}

fn matches(line: &OrderLine, filter: &SalesFilter) -> bool {
    if let Some(from) = filter.date_from {
        if line.order_date < from {
            return false;
        }
    }
    if let Some(to) = filter.date_to {
        if line.order_date > to {
            return false;
        }
    }

    in_list(&filter.categories, &line.pizza_category)
        && in_list(&filter.sizes, &line.pizza_size)
        && in_list(&filter.pizza_names, &line.pizza_name)
}

/// Empty list means "any value"
fn in_list(allowed: &[String], value: &str) -> bool {
    allowed.is_empty() || allowed.iter().any(|a| a == value)
}

/// Distinct values and date bounds offered by the filter widgets
pub fn filter_options(table: &[OrderLine]) -> FilterOptions {
    let categories: BTreeSet<&str> = table.iter().map(|l| l.pizza_category.as_str()).collect();
    let pizza_names: BTreeSet<&str> = table.iter().map(|l| l.pizza_name.as_str()).collect();

    let mut known: BTreeSet<PizzaSize> = BTreeSet::new();
    let mut unknown: BTreeSet<&str> = BTreeSet::new();
    for line in table {
        match line.size() {
            Some(size) => {
                known.insert(size);
            }
            None => {
                unknown.insert(line.pizza_size.as_str());
            }
        }
    }

    let mut sizes: Vec<String> = known.iter().map(|s| s.code().to_string()).collect();
    sizes.extend(unknown.iter().map(|s| s.to_string()));

    FilterOptions {
        categories: categories.into_iter().map(String::from).collect(),
        sizes,
        pizza_names: pizza_names.into_iter().map(String::from).collect(),
        date_min: table.iter().map(|l| l.order_date).min(),
        date_max: table.iter().map(|l| l.order_date).max(),
    }
}
