//! Fixed-width movement records.
//!
//! Every line carries 35 fields at fixed byte positions. Lines may be shorter
//! than the nominal 303 bytes: fields past the end of the line decode as empty
//! strings, and the trailing filler takes whatever is left after byte 176.

use crate::error::RecordError;
use serde::Serialize;

/// Nominal length of a movement line in bytes.
pub const RECORD_LEN: usize = 303;

/// Shortest line that still carries every field used for keys and amounts
/// (everything up to and including `quantity_short`).
pub const MIN_RECORD_LEN: usize = 73;

/// Position of one field, 1-based and inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub start: usize,
    pub end: usize,
}

impl FieldSpec {
    /// Width of the field in bytes.
    pub fn width(&self) -> usize {
        self.end - self.start + 1
    }

    /// Extracts and trims this field from `line`, clamping to its length.
    fn slice(&self, line: &str) -> Result<String, RecordError> {
        let from = (self.start - 1).min(line.len());
        let to = self.end.min(line.len());
        line.get(from..to)
            .map(|raw| raw.trim().to_string())
            .ok_or(RecordError::SplitCharacter { field: self.name })
    }
}

macro_rules! movement_record {
    ($($(#[$doc:meta])* $field:ident: $start:literal..=$end:literal,)*) => {
        /// One decoded line. Values are trimmed but otherwise unvalidated.
        ///
        /// Serializes as a map from field name to value, for dumping
        /// decoded records.
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
        pub struct DecodedRecord {
            $($(#[$doc])* pub $field: String,)*
        }

        /// Byte layout of a movement line, in field order.
        pub const LAYOUT: &[FieldSpec] = &[
            $(FieldSpec { name: stringify!($field), start: $start, end: $end },)*
        ];

        impl DecodedRecord {
            fn slice_all(line: &str) -> Result<Self, RecordError> {
                Ok(DecodedRecord {
                    $($field: FieldSpec {
                        name: stringify!($field),
                        start: $start,
                        end: $end,
                    }
                    .slice(line)?,)*
                })
            }
        }
    };
}

movement_record! {
    record_code: 1..=3,
    client_type: 4..=7,
    client_number: 8..=11,
    account_number: 12..=15,
    sub_account_number: 16..=19,
    opposite_party_code: 20..=25,
    product_group_code: 26..=27,
    exchange_code: 28..=31,
    symbol: 32..=37,
    /// `YYYYMMDD`
    expiration_date: 38..=45,
    currency_code: 46..=48,
    movement_code: 49..=50,
    buy_sell_code: 51..=51,
    /// `+` marks a long quantity as positive; anything else negates it.
    quantity_long_sign: 52..=52,
    quantity_long: 53..=62,
    quantity_short_sign: 63..=63,
    quantity_short: 64..=73,
    exch_broker_fee_dec: 74..=85,
    exch_broker_fee_dc: 86..=86,
    exch_broker_fee_cur_code: 87..=89,
    clearing_fee_dec: 90..=101,
    clearing_fee_dc: 102..=102,
    clearing_fee_cur_code: 103..=105,
    commission: 106..=117,
    commission_dc: 118..=118,
    commission_cur_code: 119..=121,
    transaction_date: 122..=129,
    future_reference: 130..=135,
    ticket_number: 136..=141,
    external_number: 142..=147,
    transaction_price_dec: 148..=162,
    trader_initials: 163..=168,
    opposite_trader_id: 169..=175,
    open_close_code: 176..=176,
    filler: 177..=303,
}

impl DecodedRecord {
    /// Decodes one line (without its terminator).
    ///
    /// Fails only when the line is too short to hold the mandatory fields or
    /// a field boundary splits a character; content is not checked here.
    pub fn decode(line: &str) -> Result<Self, RecordError> {
        if line.len() < MIN_RECORD_LEN {
            return Err(RecordError::TooShort {
                len: line.len(),
                min: MIN_RECORD_LEN,
            });
        }
        Self::slice_all(line)
    }
}
