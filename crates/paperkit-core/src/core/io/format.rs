/// printf-compatible column formats used when writing numeric tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnFormat {
    /// `%d`: truncated toward zero.
    Integer,
    /// `%.{p}g`
    General(usize),
    /// `%.{p}e`
    Scientific(usize),
}

impl ColumnFormat {
    pub fn format(&self, value: f64) -> String {
        match *self {
            ColumnFormat::Integer => format_integer(value),
            ColumnFormat::General(precision) => format_general(value, precision),
            ColumnFormat::Scientific(precision) => format_scientific(value, precision),
        }
    }
}

impl Default for ColumnFormat {
    fn default() -> Self {
        ColumnFormat::Scientific(18)
    }
}

fn format_non_finite(value: f64) -> Option<String> {
    if value.is_nan() {
        Some("nan".to_string())
    } else if value.is_infinite() {
        Some(if value > 0.0 { "inf" } else { "-inf" }.to_string())
    } else {
        None
    }
}

fn format_integer(value: f64) -> String {
    if let Some(s) = format_non_finite(value) {
        return s;
    }
    format!("{}", value.trunc() as i64)
}

/// Splits Rust's `{:e}` output into mantissa and decimal exponent.
fn split_exponent(formatted: &str) -> (&str, i32) {
    match formatted.split_once('e') {
        Some((mantissa, exp)) => (mantissa, exp.parse().unwrap_or(0)),
        None => (formatted, 0),
    }
}

fn c_exponent(exp: i32) -> String {
    let sign = if exp < 0 { '-' } else { '+' };
    format!("e{}{:02}", sign, exp.abs())
}

/// Formats `value` like C's `%.{precision}e` (`1.500000e+00`).
pub fn format_scientific(value: f64, precision: usize) -> String {
    if let Some(s) = format_non_finite(value) {
        return s;
    }
    let raw = format!("{:.*e}", precision, value);
    let (mantissa, exp) = split_exponent(&raw);
    format!("{}{}", mantissa, c_exponent(exp))
}

fn strip_trailing_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// Formats `value` like C's `%.{precision}g`.
///
/// Parameters handed to external programs are rendered with this so that the
/// command lines match what the programs have always been given (`2`, `0.01`,
/// `1e-10`).
pub fn format_general(value: f64, precision: usize) -> String {
    if let Some(s) = format_non_finite(value) {
        return s;
    }
    let precision = precision.max(1);
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    let sci = format!("{:.*e}", precision - 1, value);
    let (mantissa, exp) = split_exponent(&sci);

    if exp < -4 || exp >= precision as i32 {
        format!("{}{}", strip_trailing_zeros(mantissa), c_exponent(exp))
    } else {
        let decimals = (precision as i32 - 1 - exp).max(0) as usize;
        let fixed = format!("{:.*}", decimals, value);
        strip_trailing_zeros(&fixed).to_string()
    }
}

/// `%g` with the default precision of six significant digits.
pub fn g(value: f64) -> String {
    format_general(value, 6)
}
