//! One-invoice-per-line encoding
//!
//! ```text
//! <US><id><US><invoice json>
//! ```
//!
//! `<US>` is the ASCII unit separator (0x1F). `serde_json` escapes every
//! control character inside strings, so a raw 0x1F never occurs in the JSON
//! body and `<US><id><US>` cannot match any line but its own under the
//! store's substring lookup. Digits are delimited on both sides, so id 1 does
//! not match id 12.

use super::errors::{InvoiceError, InvoiceResult};
use super::model::Invoice;

/// Key delimiter
pub const UNIT_SEPARATOR: char = '\u{1f}';

/// Returns the store key for an invoice id.
pub fn key_for(id: u64) -> String {
    format!("{UNIT_SEPARATOR}{id}{UNIT_SEPARATOR}")
}

/// Encodes an invoice that already has an id.
pub fn encode(invoice: &Invoice) -> InvoiceResult<String> {
    let id = invoice.id.ok_or(InvoiceError::MissingId)?;
    let json = serde_json::to_string(invoice)?;
    Ok(format!("{}{}", key_for(id), json))
}

/// Decodes one stored line.
pub fn decode(line: &str) -> InvoiceResult<Invoice> {
    let rest = line
        .strip_prefix(UNIT_SEPARATOR)
        .ok_or_else(|| InvoiceError::MalformedRecord("missing key prefix".to_string()))?;
    let (id, json) = rest
        .split_once(UNIT_SEPARATOR)
        .ok_or_else(|| InvoiceError::MalformedRecord("unterminated key".to_string()))?;
    let id: u64 = id
        .parse()
        .map_err(|_| InvoiceError::MalformedRecord(format!("bad id '{}'", id)))?;

    let mut invoice: Invoice = serde_json::from_str(json)?;
    if let Some(body_id) = invoice.id {
        if body_id != id {
            return Err(InvoiceError::MalformedRecord(format!(
                "key id {} does not match body id {}",
                id, body_id
            )));
        }
    }
    invoice.id = Some(id);
    Ok(invoice)
}
