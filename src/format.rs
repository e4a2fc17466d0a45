/// Format kilotonnes for metric panels: rounded to 2 decimals, at least one
/// fractional digit, thousands separators. `1234.5` → `"1,234.5"`.
pub fn format_kilotonnes(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let fixed = format!("{:.2}", value);
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "0"));
    let frac = frac_part.trim_end_matches('0');
    let frac = if frac.is_empty() { "0" } else { frac };

    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", int_part),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    // "-0.0" after rounding a tiny negative
    let sign = if grouped == "0" && frac == "0" { "" } else { sign };
    format!("{}{}.{}", sign, grouped, frac)
}
