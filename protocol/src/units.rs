//! # Amount Units
//!
//! All ledger arithmetic happens on [`Amount`] in base units. Whole-token
//! quantities only exist at the edges: configuration files and display.
//! With 18 decimals one token is `10^18` base units, so a billion-token cap
//! is `10^27`. That is beyond `u64`, which is why amounts are `u128`.

use thiserror::Error;

/// A token quantity in base units.
pub type Amount = u128;

/// Errors that can occur while parsing a decimal amount.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UnitsError {
    /// The input is empty or contains something other than digits and one dot.
    #[error("malformed amount: {0:?}")]
    Malformed(String),

    /// More fractional digits than the token's precision allows.
    #[error("too many fractional digits: {got} (max {max})")]
    TooPrecise {
        /// Fractional digits supplied.
        got: usize,
        /// Token decimals.
        max: u8,
    },

    /// The value does not fit in an [`Amount`].
    #[error("amount overflows u128")]
    Overflow,
}

/// Returns `10^decimals`, or `None` if that overflows.
pub fn unit_scale(decimals: u8) -> Option<Amount> {
    10u128.checked_pow(u32::from(decimals))
}

/// Scales a whole-token quantity to base units.
pub fn to_base_units(whole: Amount, decimals: u8) -> Option<Amount> {
    unit_scale(decimals)?.checked_mul(whole)
}

/// Renders a base-unit amount as a decimal token quantity.
///
/// Trailing fractional zeros are trimmed, and the dot is dropped entirely
/// for whole amounts.
pub fn format_units(amount: Amount, decimals: u8) -> String {
    let Some(scale) = unit_scale(decimals) else {
        // Every representable amount is a tiny fraction at this precision.
        let digits = amount.to_string();
        let pad = usize::from(decimals).saturating_sub(digits.len());
        let frac = format!("{}{}", "0".repeat(pad), digits);
        let frac = frac.trim_end_matches('0');
        return if frac.is_empty() {
            "0".to_string()
        } else {
            format!("0.{}", frac)
        };
    };

    let whole = amount / scale;
    let frac = amount % scale;
    if frac == 0 {
        return whole.to_string();
    }
    let frac = format!("{:0width$}", frac, width = usize::from(decimals));
    format!("{}.{}", whole, frac.trim_end_matches('0'))
}

/// Parses a decimal token quantity (e.g. `"12.5"`) into base units.
pub fn parse_units(text: &str, decimals: u8) -> Result<Amount, UnitsError> {
    let text = text.trim();
    let malformed = || UnitsError::Malformed(text.to_string());

    let (whole, frac) = match text.split_once('.') {
        Some((w, f)) => (w, f),
        None => (text, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return Err(malformed());
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
        return Err(malformed());
    }
    if frac.len() > usize::from(decimals) {
        return Err(UnitsError::TooPrecise {
            got: frac.len(),
            max: decimals,
        });
    }

    let whole: Amount = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| UnitsError::Overflow)?
    };
    let frac_value: Amount = if frac.is_empty() {
        0
    } else {
        let padded = format!("{:0<width$}", frac, width = usize::from(decimals));
        padded.parse().map_err(|_| UnitsError::Overflow)?
    };

    to_base_units(whole, decimals)
        .and_then(|base| base.checked_add(frac_value))
        .ok_or(UnitsError::Overflow)
}
