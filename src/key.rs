//! Grouping keys.
//!
//! A movement is grouped by client (type, number, account, sub-account) and by
//! product (exchange, product group, symbol, expiration). Product keys are
//! stored with every period removed so that `FU.SGX.NK.20100910` and
//! `FUSGXNK20100910` land in the same group.

use crate::error::RecordError;
use crate::record::DecodedRecord;
use log::debug;

/// Separator between the client and product halves of a combined key.
pub const KEY_DELIMITER: char = ',';

/// Client and product identity of a movement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupKey {
    pub client: String,
    pub product: String,
}

impl GroupKey {
    /// Derives both keys from a decoded record.
    ///
    /// Rejects records whose key subfields contain the delimiter, since the
    /// combined key could then no longer be split back into its two halves.
    pub fn from_record(record: &DecodedRecord) -> Result<Self, RecordError> {
        let client_parts = [
            ("client_type", &record.client_type),
            ("client_number", &record.client_number),
            ("account_number", &record.account_number),
            ("sub_account_number", &record.sub_account_number),
        ];
        let product_parts = [
            ("exchange_code", &record.exchange_code),
            ("product_group_code", &record.product_group_code),
            ("symbol", &record.symbol),
            ("expiration_date", &record.expiration_date),
        ];

        for (field, value) in client_parts.iter().chain(product_parts.iter()) {
            if value.contains(KEY_DELIMITER) {
                return Err(RecordError::DelimiterInKey { field: *field });
            }
        }

        let client: String = client_parts.iter().map(|(_, v)| v.as_str()).collect();
        let raw_product: String = product_parts.iter().map(|(_, v)| v.as_str()).collect();
        let product = normalize_product_key(&raw_product);
        if product.len() != raw_product.len() {
            debug!("Stripped periods from product key {}", raw_product);
        }

        Ok(GroupKey { client, product })
    }

    /// The `client,product` string used as the aggregation key.
    pub fn combined(&self) -> String {
        let mut key = String::with_capacity(self.client.len() + self.product.len() + 1);
        key.push_str(&self.client);
        key.push(KEY_DELIMITER);
        key.push_str(&self.product);
        key
    }

    /// Splits a combined key on its first delimiter.
    ///
    /// A key without a delimiter is treated as all client.
    pub fn split_combined(combined: &str) -> (&str, &str) {
        combined.split_once(KEY_DELIMITER).unwrap_or((combined, ""))
    }
}

/// Removes every `.` from a product key. Applying it twice changes nothing.
pub fn normalize_product_key(key: &str) -> String {
    key.chars().filter(|&c| c != '.').collect()
}
