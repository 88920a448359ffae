use serde::{Deserialize, Serialize};

/// Pizza sizes in their display order (S < M < L < XL < XXL).
///
/// The ordering is only used to sort chart categories, never for arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PizzaSize {
    S,
    M,
    L,
    XL,
    XXL,
}

impl PizzaSize {
    /// Code as it appears in the `pizza_size` column
    pub fn code(&self) -> &'static str {
        match self {
            PizzaSize::S => "S",
            PizzaSize::M => "M",
            PizzaSize::L => "L",
            PizzaSize::XL => "XL",
            PizzaSize::XXL => "XXL",
        }
    }

    pub fn all() -> Vec<PizzaSize> {
        vec![
            PizzaSize::S,
            PizzaSize::M,
            PizzaSize::L,
            PizzaSize::XL,
            PizzaSize::XXL,
        ]
    }

    /// Parse a column value. Surrounding whitespace is ignored, case is not.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "S" => Some(PizzaSize::S),
            "M" => Some(PizzaSize::M),
            "L" => Some(PizzaSize::L),
            "XL" => Some(PizzaSize::XL),
            "XXL" => Some(PizzaSize::XXL),
            _ => None,
        }
    }
}

impl std::fmt::Display for PizzaSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
