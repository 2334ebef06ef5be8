use thiserror::Error;

/// Money is represented as integer paise (cents) so policy floors compare exactly.
/// 1 Rs = 100 cents, so Rs 50.00 = 5000 cents.
pub type Cents = i64;

/// Whole rupees to cents. Used for policy constants and seed balances.
pub const fn rupees(units: i64) -> Cents {
    units * 100
}

/// Format cents as a human-readable amount.
/// Example: 5000 -> "50.00", -1234 -> "-12.34"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs_cents / 100, abs_cents % 100)
}

/// Parse a non-negative decimal string into cents.
/// Example: "50.00" -> 5000, "12.5" -> 1250, "100" -> 10000
///
/// Signs and more than two fractional digits are rejected rather than
/// truncated: an amount typed by a user must mean exactly what it says.
pub fn parse_cents(input: &str) -> Result<Cents, ParseCentsError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ParseCentsError::Empty);
    }

    let (units, fraction) = match input.split_once('.') {
        Some((units, fraction)) => (units, fraction),
        None => (input, ""),
    };

    if !units.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit())
    {
        return Err(ParseCentsError::InvalidFormat(input.to_string()));
    }
    if units.is_empty() && fraction.is_empty() {
        return Err(ParseCentsError::InvalidFormat(input.to_string()));
    }
    if fraction.len() > 2 {
        return Err(ParseCentsError::TooPrecise(input.to_string()));
    }

    let whole: i64 = if units.is_empty() {
        0
    } else {
        units
            .parse()
            .map_err(|_| ParseCentsError::Overflow(input.to_string()))?
    };

    // "5" after the point means 50 cents
    let fractional: i64 = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<i64>().unwrap_or(0) * 10,
        _ => fraction.parse::<i64>().unwrap_or(0),
    };

    whole
        .checked_mul(100)
        .and_then(|c| c.checked_add(fractional))
        .ok_or_else(|| ParseCentsError::Overflow(input.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCentsError {
    #[error("amount is empty")]
    Empty,

    #[error("invalid money format: '{0}'")]
    InvalidFormat(String),

    #[error("at most two decimal places are allowed: '{0}'")]
    TooPrecise(String),

    #[error("amount is too large: '{0}'")]
    Overflow(String),
}
