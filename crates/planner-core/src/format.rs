//! Presentation helpers for amounts and percentages.

/// Separators used when rendering numbers. Defaults to Indonesian grouping
/// (`12.800.000`, decimal comma).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberFormat {
    pub grouping_separator: char,
    pub decimal_separator: char,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            grouping_separator: '.',
            decimal_separator: ',',
        }
    }
}

/// Renders `value` with `precision` decimals and grouped thousands.
pub fn format_number(format: &NumberFormat, value: f64, precision: u8) -> String {
    let body = format!("{:.*}", precision as usize, value.abs());
    let (int_part, fraction) = match body.split_once('.') {
        Some((int_part, fraction)) => (int_part, Some(fraction)),
        None => (body.as_str(), None),
    };

    let mut rendered = String::new();
    if value < 0.0 && body.chars().any(|ch| ch.is_ascii_digit() && ch != '0') {
        rendered.push('-');
    }
    rendered.push_str(&group_digits(int_part, format.grouping_separator));
    if let Some(fraction) = fraction {
        rendered.push(format.decimal_separator);
        rendered.push_str(fraction);
    }
    rendered
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx != 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped
}

/// Whole-unit amount prefixed by the currency label, e.g. `Rp 2.000.000`.
pub fn format_amount(label: &str, format: &NumberFormat, amount: f64) -> String {
    let number = format_number(format, amount.round(), 0);
    if label.is_empty() {
        number
    } else {
        format!("{label} {number}")
    }
}

/// Percentage with one decimal, e.g. `60,9%`.
pub fn format_percent(format: &NumberFormat, percent: f64) -> String {
    format!("{}%", format_number(format, percent, 1))
}
