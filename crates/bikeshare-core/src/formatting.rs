/// Placeholder shown for metrics that have no value (e.g. an average over an
/// empty range).
pub const MISSING_VALUE: &str = "–";

/// Format a number with `,` thousands separators and `.` as decimal point.
///
/// # Examples
///
/// ```
/// use bikeshare_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5,  1), "1,234.5");
/// assert_eq!(format_number(1234567.0, 0), "1,234,567");
/// assert_eq!(format_number(0.0, 2), "0.00");
/// assert_eq!(format_number(-9876.5, 1), "-9,876.5");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    format_grouped(value, decimals, ',', '.')
}

/// Format a rental count with thousands separators.
///
/// ```
/// use bikeshare_core::formatting::format_count;
///
/// assert_eq!(format_count(3_292_679), "3,292,679");
/// ```
pub fn format_count(value: u64) -> String {
    group_thousands(&value.to_string(), ',')
}

/// Format a monetary average the Colombian-peso way: `.` groups thousands,
/// `,` separates two decimals, no currency symbol.
///
/// ```
/// use bikeshare_core::formatting::format_monetary;
///
/// assert_eq!(format_monetary(4504.3486), "4.504,35");
/// assert_eq!(format_monetary(22.0), "22,00");
/// ```
pub fn format_monetary(value: f64) -> String {
    format_grouped(value, 2, '.', ',')
}

/// Average recency in days, rounded to one decimal.
///
/// ```
/// use bikeshare_core::formatting::format_recency;
///
/// assert_eq!(format_recency(365.04), "365.0");
/// assert_eq!(format_recency(0.25), "0.3");
/// ```
pub fn format_recency(days: f64) -> String {
    format_number(days, 1)
}

/// Apply `f` to `value`, or return [`MISSING_VALUE`].
pub fn format_optional(value: Option<f64>, f: impl Fn(f64) -> String) -> String {
    value.map(f).unwrap_or_else(|| MISSING_VALUE.to_string())
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn format_grouped(value: f64, decimals: u32, thousands: char, point: char) -> String {
    let negative = value < 0.0;
    let abs_value = value.abs();

    // Nudge by a relative epsilon so binary midpoints (1.005) round up.
    let factor = 10_f64.powi(decimals as i32);
    let epsilon = f64::EPSILON * abs_value * factor;
    let rounded = ((abs_value * factor) + epsilon).round() / factor;

    let integer_part = rounded.trunc() as u64;
    let frac_part = rounded - rounded.trunc();

    let grouped = group_thousands(&integer_part.to_string(), thousands);

    let result = if decimals == 0 {
        grouped
    } else {
        // "0.50" → "50"
        let frac_str = format!("{:.prec$}", frac_part, prec = decimals as usize);
        format!("{}{}{}", grouped, point, &frac_str[2..])
    };

    if negative {
        format!("-{}", result)
    } else {
        result
    }
}

/// Insert `sep` every three digits from the right of an integer string.
fn group_thousands(s: &str, sep: char) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(sep);
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────
