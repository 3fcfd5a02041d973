//! Territory code normalization.
//!
//! The boundary layer and the indicator table do not agree on how codes
//! are written: spreadsheet exports turn `200000172` into `200000172.0`,
//! and `GeoJSON` properties may hold numbers instead of strings. Both
//! sides go through [`normalize_code`] before the join.

use geojson::JsonValue;

/// Normalizes a textual territory code.
///
/// Trims whitespace and strips a trailing `.0` float artifact.
#[must_use]
pub fn normalize_code(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed.strip_suffix(".0").unwrap_or(trimmed).to_string()
}

/// Normalizes a `GeoJSON` property value holding a territory code.
///
/// Integral numbers are rendered without a fractional part. Returns
/// `None` for null, empty, and non-scalar values.
#[must_use]
pub fn code_from_json(value: &JsonValue) -> Option<String> {
    let code = match value {
        JsonValue::String(s) => normalize_code(s),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else {
                let f = n.as_f64()?;
                if f.fract() == 0.0 && f.is_finite() {
                    format!("{f:.0}")
                } else {
                    normalize_code(&f.to_string())
                }
            }
        }
        _ => return None,
    };

    if code.is_empty() { None } else { Some(code) }
}
