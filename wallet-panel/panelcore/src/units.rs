//! Decimal <-> base-unit conversion for the chain's native currency.
//!
//! Amounts arrive from form input as decimal strings ("0.5") and go on-chain
//! as wei. Parsing is strict: unsigned, at most one decimal point, no
//! exponent, no more precision than the currency has.

use alloy_primitives::U256;

use crate::error::PanelError;

pub const NATIVE_DECIMALS: usize = 18;

/// Parse a decimal ether string into wei.
pub fn parse_amount(input: &str) -> Result<U256, PanelError> {
    parse_units(input, NATIVE_DECIMALS)
}

/// Format wei as an ether decimal string, e.g. `500000000000000000` -> `"0.5"`.
pub fn format_amount(value: U256) -> String {
    format_units(value, NATIVE_DECIMALS)
}

pub fn parse_units(input: &str, decimals: usize) -> Result<U256, PanelError> {
    if input.is_empty() {
        return Err(PanelError::amount(input, "empty"));
    }
    if input.starts_with('-') {
        return Err(PanelError::amount(input, "negative amounts are not allowed"));
    }
    if let Some(bad) = input.chars().find(|c| !c.is_ascii_digit() && *c != '.') {
        return Err(PanelError::amount(input, format!("unexpected character {bad:?}")));
    }

    let (whole, fraction) = match input.split_once('.') {
        Some((_, rest)) if rest.contains('.') => {
            return Err(PanelError::amount(input, "more than one decimal point"));
        }
        Some((whole, fraction)) => (whole, fraction),
        None => (input, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return Err(PanelError::amount(input, "no digits"));
    }

    // trailing zeros carry no precision
    let fraction = fraction.trim_end_matches('0');
    if fraction.len() > decimals {
        return Err(PanelError::amount(
            input,
            format!("fractional component exceeds {decimals} decimals"),
        ));
    }

    let mut digits = String::with_capacity(whole.len() + decimals);
    digits.push_str(if whole.is_empty() { "0" } else { whole });
    digits.push_str(fraction);
    digits.extend(std::iter::repeat('0').take(decimals - fraction.len()));

    U256::from_str_radix(&digits, 10).map_err(|e| PanelError::amount(input, e.to_string()))
}

pub fn format_units(value: U256, decimals: usize) -> String {
    let raw = value.to_string();
    let (whole, fraction) = if raw.len() > decimals {
        let split = raw.len() - decimals;
        (raw[..split].to_string(), raw[split..].to_string())
    } else {
        ("0".to_string(), format!("{raw:0>decimals$}"))
    };
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        format!("{whole}.0")
    } else {
        format!("{whole}.{fraction}")
    }
}
