use chrono::{NaiveDate, NaiveTime};
use contracts::domain::a100_order_line::OrderLine;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::shared::format::format_number;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("sales file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read sales file: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column '{0}'")]
    MissingColumn(String),

    /// A row violating the table schema; nothing is coerced
    #[error("line {line}: invalid {field}: {message}")]
    Schema {
        line: u64,
        field: String,
        message: String,
    },
}

const REQUIRED_COLUMNS: [&str; 8] = [
    "order_id",
    "order_date",
    "order_time",
    "pizza_name",
    "pizza_category",
    "pizza_size",
    "quantity",
    "total_price",
];

/// Date layouts seen in sales exports (ISO, US, European)
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%d-%m-%Y"];
const TIME_FORMATS: [&str; 2] = ["%H:%M:%S", "%H:%M"];

/// Load and validate the sales table from a CSV file
pub fn load_order_lines(path: &Path) -> Result<Vec<OrderLine>, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }

    let text = std::fs::read_to_string(path)?;
    let lines = parse_order_lines(&text)?;

    tracing::info!(
        "Loaded {} order lines from {}",
        format_number(lines.len() as u64),
        path.display()
    );
    Ok(lines)
}

/// Parse CSV text into order lines, failing on the first invalid row
pub fn parse_order_lines(csv_text: &str) -> Result<Vec<OrderLine>, LoadError> {
    // Strip UTF-8 BOM if present
    let text = csv_text.trim_start_matches('\u{FEFF}');

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let columns: HashMap<String, usize> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim().to_lowercase(), i))
        .collect();

    for name in REQUIRED_COLUMNS {
        if !columns.contains_key(name) {
            return Err(LoadError::MissingColumn(name.to_string()));
        }
    }

    tracing::debug!("Sales CSV columns: {:?}", columns.keys().collect::<Vec<_>>());

    let mut lines = Vec::new();
    for result in reader.records() {
        let record = result?;
        let line_no = record.position().map(|p| p.line()).unwrap_or(0);
        let row = RowReader {
            record: &record,
            columns: &columns,
            line: line_no,
        };
        lines.push(row.order_line()?);
    }

    Ok(lines)
}

/// Typed access to the fields of one CSV record
struct RowReader<'a> {
    record: &'a csv::StringRecord,
    columns: &'a HashMap<String, usize>,
    line: u64,
}

impl RowReader<'_> {
    fn order_line(&self) -> Result<OrderLine, LoadError> {
        let quantity: u32 = self.parse("quantity")?;
        if quantity < 1 {
            return Err(self.violation("quantity", format!("must be at least 1, got {quantity}")));
        }

        let total_price: f64 = self.parse("total_price")?;
        if !total_price.is_finite() || total_price < 0.0 {
            return Err(self.violation(
                "total_price",
                format!("must be a non-negative amount, got {total_price}"),
            ));
        }

        Ok(OrderLine {
            order_id: self.parse("order_id")?,
            order_date: self.date("order_date")?,
            order_time: self.time("order_time")?,
            pizza_name: self.required("pizza_name")?.to_string(),
            pizza_category: self.required("pizza_category")?.to_string(),
            pizza_size: self.required("pizza_size")?.to_string(),
            quantity,
            total_price,
            pizza_id: self.parse_optional("pizza_id")?,
            pizza_name_id: self.optional("pizza_name_id").map(str::to_string),
            unit_price: self.parse_optional("unit_price")?,
            pizza_ingredients: self.optional("pizza_ingredients").map(str::to_string),
        })
    }

    fn violation(&self, field: &str, message: impl Into<String>) -> LoadError {
        LoadError::Schema {
            line: self.line,
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Field value, `None` if the column is absent or the cell is empty
    fn optional(&self, field: &str) -> Option<&str> {
        self.columns
            .get(field)
            .and_then(|&i| self.record.get(i))
            .filter(|v| !v.is_empty())
    }

    fn required(&self, field: &str) -> Result<&str, LoadError> {
        self.optional(field)
            .ok_or_else(|| self.violation(field, "value is missing"))
    }

    fn parse<T>(&self, field: &str) -> Result<T, LoadError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        let raw = self.required(field)?;
        raw.parse::<T>()
            .map_err(|e| self.violation(field, format!("'{raw}': {e}")))
    }

    fn parse_optional<T>(&self, field: &str) -> Result<Option<T>, LoadError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        match self.optional(field) {
            Some(_) => self.parse(field).map(Some),
            None => Ok(None),
        }
    }

    fn date(&self, field: &str) -> Result<NaiveDate, LoadError> {
        let raw = self.required(field)?;
        DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
            .ok_or_else(|| self.violation(field, format!("'{raw}' is not a date")))
    }

    fn time(&self, field: &str) -> Result<NaiveTime, LoadError> {
        let raw = self.required(field)?;
        TIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveTime::parse_from_str(raw, fmt).ok())
            .ok_or_else(|| self.violation(field, format!("'{raw}' is not a time of day")))
    }
}
