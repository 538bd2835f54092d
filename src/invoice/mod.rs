//! Invoice book
//!
//! The service layer on top of the record store: invoices are serialized one
//! per line, keyed by a delimited id, and issued ids from a sequence seeded
//! from the largest persisted id.

mod book;
mod codec;
mod errors;
mod model;
mod sequence;

pub use book::InvoiceBook;
pub use codec::{decode, encode, key_for, UNIT_SEPARATOR};
pub use errors::{InvoiceError, InvoiceResult};
pub use model::{
    messages, Company, Invoice, InvoiceEntry, PaymentState, Product, ProductType, TaxType,
};
pub use sequence::IdSequence;
