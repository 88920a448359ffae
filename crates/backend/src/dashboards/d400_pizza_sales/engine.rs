//! Aggregation engine of the pizza sales dashboard.
//!
//! Every function here is a pure query over an immutable slice of order
//! lines: nothing is cached and the input is never modified, so calling a
//! query twice on the same table yields the same result.

use chrono::{Datelike, Month, Timelike};
use contracts::dashboards::d400_pizza_sales::{
    CalendarUnit, Direction, GroupKey, GroupedRow, GroupedSummary, KpiBundle, Measure, RankedRow,
    ShareDimension,
};
use contracts::domain::a100_order_line::OrderLine;
use contracts::enums::{PizzaSize, WeekDay};
use std::borrow::Borrow;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    /// A categorical value outside the fixed ordered set
    #[error("unknown {dimension} value '{value}'")]
    UnknownCategory { dimension: String, value: String },
}

// ---------------------------------------------------------------------------
// Internal accumulator
// ---------------------------------------------------------------------------

/// Running measures of one group
#[derive(Debug, Default)]
struct GroupAcc {
    revenue: f64,
    orders: HashSet<u64>,
    quantity: u64,
    rows: u64,
}

impl GroupAcc {
    fn add(&mut self, line: &OrderLine) {
        self.revenue += line.total_price;
        self.orders.insert(line.order_id);
        self.quantity += line.quantity as u64;
        self.rows += 1;
    }

    fn into_row(self, key: GroupKey) -> GroupedRow {
        GroupedRow {
            label: key.label(),
            key,
            revenue: self.revenue,
            order_count: self.orders.len() as u64,
            quantity: self.quantity,
            row_count: self.rows,
            pct: None,
        }
    }
}

/// View a slice of lines or of line references as lines
fn order_lines<L: Borrow<OrderLine>>(table: &[L]) -> impl Iterator<Item = &OrderLine> {
    table.iter().map(|line| <L as Borrow<OrderLine>>::borrow(line))
}

/// Accumulate keyed lines, keeping groups in first-occurrence order
fn group_lines<'a, I>(keyed: I) -> Vec<(GroupKey, GroupAcc)>
where
    I: IntoIterator<Item = (GroupKey, &'a OrderLine)>,
{
    let mut index: HashMap<GroupKey, usize> = HashMap::new();
    let mut groups: Vec<(GroupKey, GroupAcc)> = Vec::new();

    for (key, line) in keyed {
        let pos = match index.get(&key) {
            Some(pos) => *pos,
            None => {
                index.insert(key.clone(), groups.len());
                groups.push((key, GroupAcc::default()));
                groups.len() - 1
            }
        };
        groups[pos].1.add(line);
    }

    groups
}

fn month_key(line: &OrderLine) -> GroupKey {
    let number = line.order_date.month();
    let name = Month::try_from(number as u8)
        .map(|m| m.name().to_string())
        .unwrap_or_default();
    GroupKey::Month { number, name }
}

/// Position of a calendar key in its fixed sequence
fn calendar_rank(key: &GroupKey) -> u32 {
    match key {
        GroupKey::Month { number, .. } => *number,
        GroupKey::WeekDay(day) => day.ordinal() as u32,
        GroupKey::Hour(hour) => *hour,
        _ => u32::MAX,
    }
}

// ---------------------------------------------------------------------------
// Public queries
// ---------------------------------------------------------------------------

/// Total revenue, distinct orders, pizzas sold and the two per-order averages.
///
/// Averages are 0 when the table holds no orders.
pub fn compute_kpis<L: Borrow<OrderLine>>(table: &[L]) -> KpiBundle {
    let total_revenue: f64 = order_lines(table).map(|l| l.total_price).sum();
    let total_orders = order_lines(table)
        .map(|l| l.order_id)
        .collect::<HashSet<_>>()
        .len() as u64;
    let total_pizzas_sold: u64 = order_lines(table).map(|l| l.quantity as u64).sum();

    let (avg_order_value, avg_pizzas_per_order) = if total_orders > 0 {
        (
            total_revenue / total_orders as f64,
            total_pizzas_sold as f64 / total_orders as f64,
        )
    } else {
        (0.0, 0.0)
    };

    KpiBundle {
        total_revenue,
        total_orders,
        avg_order_value,
        total_pizzas_sold,
        avg_pizzas_per_order,
    }
}

/// Bucket lines by month, day of week or hour of day.
///
/// Buckets follow the calendar: months by number, days Monday to Sunday,
/// hours 0 to 23. Only buckets with at least one line appear. `measure` names
/// the measure charts should plot; every row carries all of them.
pub fn group_by_calendar_unit<L: Borrow<OrderLine>>(
    table: &[L],
    unit: CalendarUnit,
    measure: Measure,
) -> GroupedSummary {
    let lines = order_lines(table);
    let groups = match unit {
        CalendarUnit::Month => group_lines(lines.map(|l| (month_key(l), l))),
        CalendarUnit::DayOfWeek => group_lines(
            lines.map(|l| (GroupKey::WeekDay(WeekDay::from(l.order_date.weekday())), l)),
        ),
        CalendarUnit::Hour => group_lines(lines.map(|l| (GroupKey::Hour(l.order_time.hour()), l))),
    };

    let mut rows: Vec<GroupedRow> = groups
        .into_iter()
        .map(|(key, acc)| acc.into_row(key))
        .collect();
    rows.sort_by_key(|r| calendar_rank(&r.key));

    let dimension = match unit {
        CalendarUnit::Month => "month",
        CalendarUnit::DayOfWeek => "day_of_week",
        CalendarUnit::Hour => "hour",
    };

    GroupedSummary {
        dimension: dimension.to_string(),
        measure,
        rows,
    }
}

/// Revenue per category or size with its percentage of total revenue.
///
/// Categories are ordered by name, sizes by S, M, L, XL, XXL. A size code
/// outside that set is rejected with [`EngineError::UnknownCategory`]. When
/// total revenue is 0 every `pct` is 0.
pub fn percent_of_sales_by<L: Borrow<OrderLine>>(
    table: &[L],
    dimension: ShareDimension,
) -> Result<GroupedSummary, EngineError> {
    let mut rows: Vec<GroupedRow> = match dimension {
        ShareDimension::PizzaCategory => {
            let keyed = order_lines(table).map(|l| (GroupKey::Category(l.pizza_category.clone()), l));
            let mut rows: Vec<GroupedRow> = group_lines(keyed)
                .into_iter()
                .map(|(key, acc)| acc.into_row(key))
                .collect();
            rows.sort_by(|a, b| a.label.cmp(&b.label));
            rows
        }
        ShareDimension::PizzaSize => {
            let mut sized: Vec<(PizzaSize, &OrderLine)> = order_lines(table)
                .map(|l| match l.size() {
                    Some(size) => Ok((size, l)),
                    None => Err(EngineError::UnknownCategory {
                        dimension: dimension.column().to_string(),
                        value: l.pizza_size.clone(),
                    }),
                })
                .collect::<Result<_, _>>()?;
            // Stable, so grouping afterwards yields S, M, L, XL, XXL
            sized.sort_by_key(|(size, _)| *size);
            group_lines(sized.into_iter().map(|(size, l)| (GroupKey::Size(size), l)))
                .into_iter()
                .map(|(key, acc)| acc.into_row(key))
                .collect()
        }
    };

    let total: f64 = rows.iter().map(|r| r.revenue).sum();
    for row in rows.iter_mut() {
        row.pct = Some(if total > 0.0 {
            100.0 * row.revenue / total
        } else {
            0.0
        });
    }

    Ok(GroupedSummary {
        dimension: dimension.column().to_string(),
        measure: Measure::Revenue,
        rows,
    })
}

/// Best (`Top`) or worst (`Bottom`) `n` products by `measure`.
///
/// Products with equal values keep the order in which they first appear in
/// the table, since the sort is stable over first-occurrence grouping.
/// `n` larger than the number of products returns all of them.
pub fn top_n_by_measure<L: Borrow<OrderLine>>(
    table: &[L],
    measure: Measure,
    n: usize,
    direction: Direction,
) -> Vec<RankedRow> {
    if n == 0 {
        return vec![];
    }

    let keyed = order_lines(table).map(|l| (GroupKey::Pizza(l.pizza_name.clone()), l));
    let mut ranked: Vec<RankedRow> = group_lines(keyed)
        .into_iter()
        .map(|(key, acc)| {
            let row = acc.into_row(key);
            RankedRow {
                value: row.value(measure),
                pizza_name: row.label,
            }
        })
        .collect();

    match direction {
        Direction::Top => ranked.sort_by(|a, b| b.value.total_cmp(&a.value)),
        Direction::Bottom => ranked.sort_by(|a, b| a.value.total_cmp(&b.value)),
    }
    ranked.truncate(n);
    ranked
}
