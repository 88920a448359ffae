pub mod pizza_size;
pub mod week_day;

pub use pizza_size::PizzaSize;
pub use week_day::WeekDay;
