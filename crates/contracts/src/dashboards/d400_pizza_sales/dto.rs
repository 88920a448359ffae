use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::enums::{PizzaSize, WeekDay};

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

/// Calendar bucket derived from `order_date` / `order_time`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalendarUnit {
    Month,
    DayOfWeek,
    Hour,
}

/// Dimension of a revenue-share query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShareDimension {
    PizzaCategory,
    PizzaSize,
}

impl ShareDimension {
    /// Column name of the dimension in the sales table
    pub fn column(&self) -> &'static str {
        match self {
            ShareDimension::PizzaCategory => "pizza_category",
            ShareDimension::PizzaSize => "pizza_size",
        }
    }
}

/// Aggregate measure of a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
    /// Sum of `total_price`
    Revenue,
    /// Sum of `quantity`
    Quantity,
    /// Count of distinct `order_id`
    OrderCount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Largest values first
    #[default]
    Top,
    /// Smallest values first
    Bottom,
}

// ---------------------------------------------------------------------------
// KPIs
// ---------------------------------------------------------------------------

/// Scalar KPIs over the current (possibly filtered) table
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct KpiBundle {
    pub total_revenue: f64,
    pub total_orders: u64,
    /// 0 when there are no orders
    pub avg_order_value: f64,
    pub total_pizzas_sold: u64,
    /// 0 when there are no orders
    pub avg_pizzas_per_order: f64,
}

/// KPIs rendered for display, e.g. `$817,860.05`, `21,350`, `2.32`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiDisplay {
    pub total_revenue: String,
    pub total_orders: String,
    pub avg_order_value: String,
    pub total_pizzas_sold: String,
    pub avg_pizzas_per_order: String,
}

// ---------------------------------------------------------------------------
// Grouped summaries
// ---------------------------------------------------------------------------

/// Key of one group in a [`GroupedSummary`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum GroupKey {
    /// Month number (1-12) kept next to the name so sorting follows the calendar
    Month { number: u32, name: String },
    WeekDay(WeekDay),
    /// Hour of day, 0-23
    Hour(u32),
    Category(String),
    Size(PizzaSize),
    Pizza(String),
}

impl GroupKey {
    /// Axis label for charts
    pub fn label(&self) -> String {
        match self {
            GroupKey::Month { name, .. } => name.clone(),
            GroupKey::WeekDay(day) => day.name().to_string(),
            GroupKey::Hour(hour) => hour.to_string(),
            GroupKey::Category(category) => category.clone(),
            GroupKey::Size(size) => size.code().to_string(),
            GroupKey::Pizza(name) => name.clone(),
        }
    }
}

/// One group with all of its measures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupedRow {
    pub key: GroupKey,
    pub label: String,
    pub revenue: f64,
    /// Distinct orders, not lines
    pub order_count: u64,
    pub quantity: u64,
    /// Number of order lines in the group
    pub row_count: u64,
    /// Share of revenue in percent, only set by share queries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pct: Option<f64>,
}

impl GroupedRow {
    pub fn value(&self, measure: Measure) -> f64 {
        match measure {
            Measure::Revenue => self.revenue,
            Measure::Quantity => self.quantity as f64,
            Measure::OrderCount => self.order_count as f64,
        }
    }
}

/// Table of one row per distinct value of a grouping dimension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupedSummary {
    /// Grouping dimension, e.g. "month", "pizza_size"
    pub dimension: String,
    /// Measure the chart plots
    pub measure: Measure,
    pub rows: Vec<GroupedRow>,
}

impl GroupedSummary {
    pub fn labels(&self) -> Vec<String> {
        self.rows.iter().map(|r| r.label.clone()).collect()
    }

    /// Values of the primary measure, in row order
    pub fn values(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.value(self.measure)).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One product of a top-N / bottom-N ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRow {
    pub pizza_name: String,
    pub value: f64,
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Narrows the table before any query runs.
///
/// Date bounds are inclusive; `None` leaves the side open. Empty lists mean
/// "all values".
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SalesFilter {
    #[serde(default)]
    pub date_from: Option<NaiveDate>,
    #[serde(default)]
    pub date_to: Option<NaiveDate>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub pizza_names: Vec<String>,
}

impl SalesFilter {
    /// True when the filter keeps every row
    pub fn is_empty(&self) -> bool {
        self.date_from.is_none()
            && self.date_to.is_none()
            && self.categories.is_empty()
            && self.sizes.is_empty()
            && self.pizza_names.is_empty()
    }
}

/// Values available for the filter widgets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub categories: Vec<String>,
    /// Known sizes in S..XXL order, unknown codes appended
    pub sizes: Vec<String>,
    pub pizza_names: Vec<String>,
    pub date_min: Option<NaiveDate>,
    pub date_max: Option<NaiveDate>,
}

// ---------------------------------------------------------------------------
// API request / response
// ---------------------------------------------------------------------------

/// Request for the full dashboard
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardRequest {
    #[serde(default)]
    pub filter: SalesFilter,
    /// Length of the best/worst seller lists, server default when omitted
    #[serde(default)]
    pub top_n: Option<usize>,
}

/// All chart data of the pizza sales dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PizzaSalesDashboard {
    /// Order lines left after filtering
    pub rows_in_scope: usize,
    pub kpis: KpiBundle,
    pub kpi_display: KpiDisplay,
    pub monthly_orders: GroupedSummary,
    pub daily_orders: GroupedSummary,
    pub hourly_orders: GroupedSummary,
    pub monthly_revenue: GroupedSummary,
    pub category_share: GroupedSummary,
    /// `None` when the table holds a size code outside S..XXL
    pub size_share: Option<GroupedSummary>,
    /// Why `size_share` is missing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_share_error: Option<String>,
    pub top_by_revenue: Vec<RankedRow>,
    pub top_by_quantity: Vec<RankedRow>,
    pub top_by_orders: Vec<RankedRow>,
    pub bottom_by_revenue: Vec<RankedRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KpiResponse {
    pub rows_in_scope: usize,
    pub kpis: KpiBundle,
    pub display: KpiDisplay,
}

/// Orders or revenue per calendar bucket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarRequest {
    #[serde(default)]
    pub filter: SalesFilter,
    pub unit: CalendarUnit,
    /// Defaults to [`Measure::OrderCount`]
    #[serde(default)]
    pub measure: Option<Measure>,
}

/// Percent of sales by category or size
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareRequest {
    #[serde(default)]
    pub filter: SalesFilter,
    pub dimension: ShareDimension,
}

/// Best or worst sellers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopRequest {
    #[serde(default)]
    pub filter: SalesFilter,
    pub measure: Measure,
    pub n: usize,
    #[serde(default)]
    pub direction: Direction,
}
