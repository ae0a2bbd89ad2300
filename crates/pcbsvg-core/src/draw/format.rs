//! Numeric formatting for SVG attributes.

/// Rounds to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Formats a drawing coordinate: one decimal place, integral values without
/// a decimal point, non-finite values as `0`.
///
/// # Examples
///
/// ```
/// # use pcbsvg_core::draw::fmt_num;
/// assert_eq!(fmt_num(12.0), "12");
/// assert_eq!(fmt_num(12.34), "12.3");
/// assert_eq!(fmt_num(-0.04), "0");
/// assert_eq!(fmt_num(f64::NAN), "0");
/// ```
pub fn fmt_num(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let rounded = round1(value);
    if rounded == 0.0 {
        return "0".to_string();
    }
    if rounded.fract() == 0.0 {
        format!("{rounded:.0}")
    } else {
        format!("{rounded:.1}")
    }
}
