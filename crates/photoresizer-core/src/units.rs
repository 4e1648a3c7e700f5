const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Human-readable byte count using 1024-based units, e.g. `1.5 KB`.
///
/// Non-positive sizes render as `0 B`, so a negative reduction (the output
/// grew) never shows up as a minus sign.
pub fn format_file_size(bytes: i64) -> String {
    if bytes <= 0 {
        return "0 B".to_string();
    }
    let mut group = 0;
    let mut threshold: i64 = 1024;
    while group < UNITS.len() - 1 && bytes >= threshold {
        group += 1;
        threshold = threshold.saturating_mul(1024);
    }
    let scaled = bytes as f64 / 1024f64.powi(group as i32);
    format!("{} {}", group_thousands(scaled), UNITS[group])
}

/// Formats with at most one decimal place and `,` thousands separators.
/// Ties round to even, so 1.25 renders as `1.2`.
fn group_thousands(value: f64) -> String {
    let tenths = (value * 10.0).round_ties_even() as u64;
    let whole = tenths / 10;
    let fraction = tenths % 10;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if fraction == 0 {
        grouped
    } else {
        format!("{grouped}.{fraction}")
    }
}
