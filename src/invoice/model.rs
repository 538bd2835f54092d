//! Invoice domain model
//!
//! Plain serde structs. Money is kept in minor units (grosze) to avoid
//! floating point. `validate` returns every problem found, not just the first.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Validation messages
pub mod messages {
    pub const COMPANY_NO_NAME: &str = "Company name is empty";
    pub const COMPANY_NO_ADDRESS: &str = "Company address is empty";
    pub const COMPANY_NO_CITY: &str = "Company city is empty";
    pub const COMPANY_NO_NIP: &str = "Company NIP is empty";
    pub const COMPANY_NO_ZIPCODE: &str = "Company zip code is empty";
    pub const COMPANY_NO_BANK_ACCOUNT: &str = "Company bank account number is empty";
    pub const PRODUCT_NO_NAME: &str = "Product name is empty";
    pub const PRODUCT_NEGATIVE_PRICE: &str = "Product net price is negative";
    pub const PRODUCT_INCORRECT_AMOUNT: &str = "Product amount must be positive";
    pub const PRODUCTS_LIST_EMPTY: &str = "Invoice has no products";
    pub const INVOICE_NO_NAME: &str = "Invoice name is empty";
    pub const PAYMENT_BEFORE_ISSUE: &str = "Payment date is before issue date";
    pub const PAYMENT_STATE_EMPTY: &str = "Payment state is empty";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaxType {
    #[default]
    Linear,
    Progressive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductType {
    Car,
    Office,
    Electronics,
    Cleaners,
    #[default]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentState {
    Paid,
    NotPaid,
}

/// Buyer or seller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub name: String,
    pub address: String,
    pub city: String,
    pub zip_code: String,
    pub nip: String,
    pub bank_account_number: String,
    #[serde(default)]
    pub tax_type: TaxType,
    #[serde(default)]
    pub personal_car_usage: bool,
}

impl Company {
    pub fn validate(&self) -> Vec<String> {
        let required = [
            (&self.name, messages::COMPANY_NO_NAME),
            (&self.address, messages::COMPANY_NO_ADDRESS),
            (&self.city, messages::COMPANY_NO_CITY),
            (&self.nip, messages::COMPANY_NO_NIP),
            (&self.zip_code, messages::COMPANY_NO_ZIPCODE),
            (&self.bank_account_number, messages::COMPANY_NO_BANK_ACCOUNT),
        ];
        required
            .iter()
            .filter(|(value, _)| value.trim().is_empty())
            .map(|(_, msg)| msg.to_string())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Net unit price in minor currency units
    pub net_price: i64,
    /// VAT rate in whole percent
    pub vat_rate: u8,
    #[serde(default)]
    pub product_type: ProductType,
}

impl Product {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(messages::PRODUCT_NO_NAME.to_string());
        }
        if self.net_price < 0 {
            errors.push(messages::PRODUCT_NEGATIVE_PRICE.to_string());
        }
        errors
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceEntry {
    pub product: Product,
    pub amount: i64,
}

impl InvoiceEntry {
    /// Net value of this line in minor units
    pub fn net_value(&self) -> i64 {
        self.product.net_price * self.amount
    }

    /// VAT due on this line, rounded half up to a whole minor unit
    pub fn vat_value(&self) -> i64 {
        (self.net_value() * i64::from(self.product.vat_rate) + 50) / 100
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    /// Assigned by the invoice book on insert
    #[serde(rename = "invoiceId", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub name: String,
    pub buyer: Company,
    pub seller: Company,
    pub issue_date: NaiveDate,
    pub payment_date: NaiveDate,
    pub products: Vec<InvoiceEntry>,
    pub payment_state: Option<PaymentState>,
}

impl Invoice {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(messages::INVOICE_NO_NAME.to_string());
        }
        errors.extend(self.seller.validate());
        errors.extend(self.buyer.validate());
        if self.payment_date < self.issue_date {
            errors.push(messages::PAYMENT_BEFORE_ISSUE.to_string());
        }
        if self.products.is_empty() {
            errors.push(messages::PRODUCTS_LIST_EMPTY.to_string());
        }
        for entry in &self.products {
            if entry.amount <= 0 {
                errors.push(messages::PRODUCT_INCORRECT_AMOUNT.to_string());
            }
            errors.extend(entry.product.validate());
        }
        if self.payment_state.is_none() {
            errors.push(messages::PAYMENT_STATE_EMPTY.to_string());
        }
        errors
    }

    pub fn total_net(&self) -> i64 {
        self.products.iter().map(InvoiceEntry::net_value).sum()
    }

    pub fn total_vat(&self) -> i64 {
        self.products.iter().map(InvoiceEntry::vat_value).sum()
    }

    pub fn total_gross(&self) -> i64 {
        self.total_net() + self.total_vat()
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_valid_invoice_has_no_errors() {
        assert!(invoice("FV 1/2019", date(2019, 6, 15)).validate().is_empty());
    }

    #[test]
    fn test_company_reports_every_missing_field() {
        let mut c = company("");
        c.city = " ".to_string();
        let errors = c.validate();
        assert_eq!(errors.len(), 2);
        assert!(errors.contains(&messages::COMPANY_NO_NAME.to_string()));
        assert!(errors.contains(&messages::COMPANY_NO_CITY.to_string()));
    }

    #[test]
    fn test_invoice_collects_nested_errors() {
        let mut inv = invoice("FV 1", date(2019, 6, 15));
        inv.products[0].amount = 0;
        inv.payment_state = None;
        inv.payment_date = date(2019, 6, 1);
        let errors = inv.validate();
        assert!(errors.contains(&messages::PRODUCT_INCORRECT_AMOUNT.to_string()));
        assert!(errors.contains(&messages::PAYMENT_STATE_EMPTY.to_string()));
        assert!(errors.contains(&messages::PAYMENT_BEFORE_ISSUE.to_string()));
    }

    #[test]
    fn test_empty_products_rejected() {
        let mut inv = invoice("FV 1", date(2019, 6, 15));
        inv.products.clear();
        assert_eq!(inv.validate(), vec![messages::PRODUCTS_LIST_EMPTY.to_string()]);
    }

    #[test]
    fn test_totals() {
        let inv = invoice("FV 1", date(2019, 6, 15));
        assert_eq!(inv.total_net(), 20_000);
        assert_eq!(inv.total_vat(), 4_600);
        assert_eq!(inv.total_gross(), 24_600);
    }

    #[test]
    fn test_json_uses_invoice_id_field() {
        let mut inv = invoice("FV 1", date(2019, 6, 15));
        inv.id = Some(7);
        let json = serde_json::to_value(&inv).unwrap();
        assert_eq!(json["invoiceId"], 7);
        assert_eq!(json["issueDate"], "2019-06-15");
        assert_eq!(json["paymentState"], "NOT_PAID");
    }
}
