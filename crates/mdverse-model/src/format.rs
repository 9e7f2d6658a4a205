// SPDX-License-Identifier: Apache-2.0

pub const BYTES_PER_GIGABYTE: f64 = 1e9;

/// Renders `1234567` as `1,234,567`.
#[must_use]
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Rounds to whole gigabytes and groups thousands.
#[must_use]
pub fn format_gigabytes(value: f64) -> String {
    if !value.is_finite() || value <= 0.0 {
        return "0".to_string();
    }
    format_thousands(value.round() as u64)
}
