use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::enums::PizzaSize;

/// One product line of a customer order (one row of the sales table).
///
/// Several lines share an `order_id` when the customer ordered more than one
/// pizza kind. Rows are immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    /// Order identifier, shared by all lines of the same order
    pub order_id: u64,
    pub order_date: NaiveDate,
    /// Wall-clock time, no timezone
    pub order_time: NaiveTime,
    /// Display name of the product (e.g. "The Hawaiian Pizza")
    pub pizza_name: String,
    /// Category such as Classic, Veggie, Supreme, Chicken
    pub pizza_category: String,
    /// Raw size code; see [`OrderLine::size`]
    pub pizza_size: String,
    /// Pizzas of this kind in the order, at least 1
    pub quantity: u32,
    /// quantity * unit price, computed upstream
    pub total_price: f64,

    /// Optional columns of the source export, carried but never aggregated
    #[serde(default)]
    pub pizza_id: Option<u64>,
    #[serde(default)]
    pub pizza_name_id: Option<String>,
    #[serde(default)]
    pub unit_price: Option<f64>,
    #[serde(default)]
    pub pizza_ingredients: Option<String>,
}

impl OrderLine {
    /// Size parsed against the fixed S..XXL sequence, `None` for unknown codes
    pub fn size(&self) -> Option<PizzaSize> {
        PizzaSize::from_code(&self.pizza_size)
    }
}
