/// Форматирует целое число с разделителями тысяч (запятыми)
///
/// # Примеры
/// ```ignore
/// assert_eq!(format_number(1234567), "1,234,567");
/// assert_eq!(format_number(42), "42");
/// ```
pub fn format_number(n: u64) -> String {
    group_thousands(&n.to_string())
}

/// Денежная сумма с двумя знаками после запятой: `$1,234.56`
pub fn format_money(value: f64) -> String {
    let formatted = format_decimal(value.abs(), 2);
    if value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0') {
        format!("-${}", formatted)
    } else {
        format!("${}", formatted)
    }
}

/// Число с фиксированным количеством знаков и разделителями тысяч
pub fn format_decimal(value: f64, decimals: usize) -> String {
    let raw = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match raw.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (raw.as_str(), None),
    };

    let mut result = String::new();
    if value < 0.0 && raw.chars().any(|c| c.is_ascii_digit() && c != '0') {
        result.push('-');
    }
    result.push_str(&group_thousands(int_part));
    if let Some(frac) = frac_part {
        result.push('.');
        result.push_str(frac);
    }
    result
}

fn group_thousands(digits: &str) -> String {
    let mut result = String::new();
    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(42), "42");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(21350), "21,350");
        assert_eq!(format_number(1234567890), "1,234,567,890");
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(0.0), "$0.00");
        assert_eq!(format_money(11.5), "$11.50");
        assert_eq!(format_money(817860.05), "$817,860.05");
        assert_eq!(format_money(-1234.5), "-$1,234.50");
        assert_eq!(format_money(-0.001), "$0.00");
    }

    #[test]
    fn test_format_decimal() {
        assert_eq!(format_decimal(2.3219, 2), "2.32");
        assert_eq!(format_decimal(1234.0, 0), "1,234");
        assert_eq!(format_decimal(-9876.543, 1), "-9,876.5");
    }
}
