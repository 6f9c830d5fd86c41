//! Net transaction amount of a single movement.

use crate::config::RunConfig;
use crate::decimal::Amount;
use crate::error::RecordError;
use crate::record::DecodedRecord;
use std::str::FromStr;

/// Computes `long - short` for one record.
///
/// With sign indicators honoured, each quantity counts as positive only when
/// its sign field is exactly `+`; any other value, including blank, negates it.
pub fn net_amount(record: &DecodedRecord, config: &RunConfig) -> Result<Amount, RecordError> {
    let long = parse_quantity("quantity_long", &record.quantity_long)?;
    let short = parse_quantity("quantity_short", &record.quantity_short)?;

    if config.ignore_sign_indicators() {
        return Ok(long - short);
    }

    let long = apply_sign(long, &record.quantity_long_sign);
    let short = apply_sign(short, &record.quantity_short_sign);
    Ok(long - short)
}

fn parse_quantity(field: &'static str, value: &str) -> Result<Amount, RecordError> {
    Amount::from_str(value).map_err(|_| RecordError::NotNumeric {
        field,
        value: value.to_string(),
    })
}

fn apply_sign(quantity: Amount, sign: &str) -> Amount {
    if sign == "+" {
        quantity
    } else {
        -quantity
    }
}
