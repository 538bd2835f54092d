//! Invoice book: CRUD over the record store
//!
//! All store access goes through one `Mutex`, held for the full duration of
//! each call, so a delete's rewrite-and-swap never interleaves with another
//! append or scan issued through the same book.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::NaiveDate;

use super::codec::{decode, encode, key_for};
use super::errors::{InvoiceError, InvoiceResult};
use super::model::Invoice;
use super::sequence::IdSequence;
use crate::observability::{log_event, log_event_with_fields, Event, Severity};
use crate::storage::LineStore;

pub struct InvoiceBook {
    store: Mutex<LineStore>,
    ids: IdSequence,
}

impl InvoiceBook {
    /// Wraps a store, seeding the id sequence from the records it holds.
    pub fn open(store: LineStore) -> InvoiceResult<Self> {
        let max_id = store
            .read_all()?
            .iter()
            .map(|line| decode(line).map(|inv| inv.id.unwrap_or(0)))
            .collect::<InvoiceResult<Vec<_>>>()?
            .into_iter()
            .max();

        log_event(
            Event::SequenceSeeded,
            &[("max_id", &max_id.unwrap_or(0).to_string())],
        );

        Ok(Self {
            store: Mutex::new(store),
            ids: IdSequence::seeded_from(max_id),
        })
    }

    fn store(&self) -> MutexGuard<'_, LineStore> {
        // Store state lives on disk; a panicked holder leaves nothing in memory to repair
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check(invoice: &Invoice) -> InvoiceResult<()> {
        let errors = invoice.validate();
        if errors.is_empty() {
            return Ok(());
        }
        log_event_with_fields(
            Event::InvoiceRejected,
            Severity::Warn,
            &[("name", &invoice.name), ("errors", &errors.join("; "))],
        );
        Err(InvoiceError::Validation(errors))
    }

    /// Validates, assigns a fresh id and stores the invoice.
    ///
    /// Any id already set on `invoice` is replaced.
    pub fn add(&self, mut invoice: Invoice) -> InvoiceResult<Invoice> {
        Self::check(&invoice)?;

        let mut store = self.store();
        invoice.id = Some(self.ids.next_id()?);
        store.append(&encode(&invoice)?)?;
        Ok(invoice)
    }

    pub fn find(&self, id: u64) -> InvoiceResult<Invoice> {
        let line = self.store().read_line(&key_for(id))?;
        if line.is_empty() {
            return Err(InvoiceError::NotFound(id.to_string()));
        }
        decode(&line)
    }

    /// Finds the first invoice, in insertion order, with the given name.
    pub fn find_by_name(&self, name: &str) -> InvoiceResult<Invoice> {
        self.list()?
            .into_iter()
            .find(|inv| inv.name == name)
            .ok_or_else(|| InvoiceError::NotFound(name.to_string()))
    }

    /// All invoices in insertion order.
    pub fn list(&self) -> InvoiceResult<Vec<Invoice>> {
        self.store().read_all()?.iter().map(|l| decode(l)).collect()
    }

    /// Invoices issued within `from..=to`.
    pub fn list_by_issue_date(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> InvoiceResult<Vec<Invoice>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|inv| inv.issue_date >= from && inv.issue_date <= to)
            .collect())
    }

    pub fn remove(&self, id: u64) -> InvoiceResult<()> {
        let removed = self.store().delete_line(&key_for(id))?;
        if removed == 0 {
            return Err(InvoiceError::NotFound(id.to_string()));
        }
        Ok(())
    }

    /// Replaces a stored invoice, keeping its id.
    ///
    /// The replacement moves to the end of the file.
    pub fn update(&self, invoice: Invoice) -> InvoiceResult<Invoice> {
        let id = invoice.id.ok_or(InvoiceError::MissingId)?;
        Self::check(&invoice)?;
        let line = encode(&invoice)?;

        let mut store = self.store();
        if store.read_line(&key_for(id))?.is_empty() {
            return Err(InvoiceError::NotFound(id.to_string()));
        }
        store.delete_line(&key_for(id))?;
        store.append(&line)?;
        Ok(invoice)
    }

    /// Last id issued or seeded.
    pub fn last_id(&self) -> u64 {
        self.ids.last_issued()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use crate::invoice::model::fixtures::invoice;
    use tempfile::TempDir;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2019, 6, d).unwrap()
    }

    fn open_book(dir: &TempDir) -> InvoiceBook {
        let config = StoreConfig::new(
            dir.path().join("inv.db"),
            dir.path().join("inv.tmp"),
            20,
            1,
        )
        .unwrap();
        InvoiceBook::open(LineStore::open(config).unwrap()).unwrap()
    }

    #[test]
    fn test_add_assigns_sequential_ids() {
        let dir = TempDir::new().unwrap();
        let book = open_book(&dir);
        let a = book.add(invoice("FV 1", date(1))).unwrap();
        let b = book.add(invoice("FV 2", date(2))).unwrap();
        assert_eq!(a.id, Some(1));
        assert_eq!(b.id, Some(2));
        assert_eq!(book.find(2).unwrap().name, "FV 2");
    }

    #[test]
    fn test_add_rejects_invalid() {
        let dir = TempDir::new().unwrap();
        let book = open_book(&dir);
        let mut inv = invoice("FV 1", date(1));
        inv.products.clear();
        assert!(matches!(book.add(inv), Err(InvoiceError::Validation(_))));
        assert!(book.list().unwrap().is_empty());
        assert_eq!(book.last_id(), 0);
    }

    #[test]
    fn test_ids_survive_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let book = open_book(&dir);
            for d in 1..=3 {
                book.add(invoice("FV", date(d))).unwrap();
            }
            book.remove(3).unwrap();
        }
        let book = open_book(&dir);
        assert_eq!(book.last_id(), 2);
        assert_eq!(book.add(invoice("FV", date(9))).unwrap().id, Some(3));
    }

    #[test]
    fn test_add_fails_cleanly_when_ids_exhausted() {
        let dir = TempDir::new().unwrap();
        {
            let book = open_book(&dir);
            let mut last = invoice("FV MAX", date(1));
            last.id = Some(u64::MAX);
            let line = crate::invoice::codec::encode(&last).unwrap();
            book.store().append(&line).unwrap();
        }

        let book = open_book(&dir);
        assert_eq!(book.last_id(), u64::MAX);
        let err = book.add(invoice("FV next", date(2))).unwrap_err();
        assert!(matches!(err, InvoiceError::IdsExhausted(u64::MAX)));
        assert_eq!(book.list().unwrap().len(), 1);
    }

    #[test]
    fn test_find_missing() {
        let dir = TempDir::new().unwrap();
        let book = open_book(&dir);
        assert!(matches!(book.find(5), Err(InvoiceError::NotFound(_))));
        assert!(matches!(book.remove(5), Err(InvoiceError::NotFound(_))));
    }

    #[test]
    fn test_remove_does_not_touch_prefix_ids() {
        let dir = TempDir::new().unwrap();
        let book = open_book(&dir);
        for d in 1..=12 {
            book.add(invoice(&format!("FV {d}"), date(d))).unwrap();
        }
        book.remove(1).unwrap();
        let ids: Vec<_> = book.list().unwrap().iter().map(|i| i.id.unwrap()).collect();
        assert_eq!(ids, (2..=12).collect::<Vec<_>>());
    }

    #[test]
    fn test_update_replaces_content() {
        let dir = TempDir::new().unwrap();
        let book = open_book(&dir);
        let mut inv = book.add(invoice("FV 1", date(1))).unwrap();
        book.add(invoice("FV 2", date(2))).unwrap();

        inv.name = "FV 1 corrected".to_string();
        book.update(inv).unwrap();

        assert_eq!(book.find(1).unwrap().name, "FV 1 corrected");
        assert_eq!(book.list().unwrap().len(), 2);
    }

    #[test]
    fn test_update_unknown_id() {
        let dir = TempDir::new().unwrap();
        let book = open_book(&dir);
        let mut inv = invoice("FV 1", date(1));
        inv.id = Some(99);
        assert!(matches!(book.update(inv), Err(InvoiceError::NotFound(_))));
    }

    #[test]
    fn test_find_by_name_and_date_range() {
        let dir = TempDir::new().unwrap();
        let book = open_book(&dir);
        book.add(invoice("FV A", date(1))).unwrap();
        book.add(invoice("FV B", date(10))).unwrap();
        book.add(invoice("FV C", date(20))).unwrap();

        assert_eq!(book.find_by_name("FV B").unwrap().id, Some(2));
        let mid = book.list_by_issue_date(date(5), date(20)).unwrap();
        assert_eq!(mid.len(), 2);
        assert!(matches!(book.find_by_name("nope"), Err(InvoiceError::NotFound(_))));
    }
}
