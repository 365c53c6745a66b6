//! Integer-cent money helpers.

/// Render an amount in cents as a dollar string, e.g. `1999` → `"$19.99"`.
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}${}.{:02}", abs / 100, abs % 100)
}
