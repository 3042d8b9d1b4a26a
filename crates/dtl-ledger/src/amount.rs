use crate::error::{LedgerError, LedgerResult};

/// Parse a decimal amount argument.
///
/// Accepts an optional sign and ASCII digits. Zero is a valid amount;
/// negative, non-numeric, and out-of-range inputs are rejected.
pub fn parse_amount(text: &str) -> LedgerResult<u64> {
    match text.parse::<u64>() {
        Ok(amount) => Ok(amount),
        Err(_) => {
            let reason = match text.parse::<i128>() {
                Ok(0) => return Ok(0),
                Ok(n) if n < 0 => "amount must not be negative",
                Ok(_) => "amount out of range",
                Err(_) => "not an integer",
            };
            Err(LedgerError::invalid_amount(text, reason))
        }
    }
}
