use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: Uuid,
    pub invoice_number: String,
    pub client_name: String,
    pub client_email: String,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    pub items: sqlx::types::Json<Vec<InvoiceItem>>,
    pub currency: String,
    pub subtotal: BigDecimal,
    pub total: BigDecimal,
    pub notes: Option<String>,
    pub status: InvoiceStatus,
    pub created_by: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf_data: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItem {
    pub description: String,
    pub quantity: u32,
    pub amount: BigDecimal,
}

string_enum! {
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
    #[serde(rename_all = "lowercase")]
    pub enum InvoiceStatus {
        Draft => "draft",
        Sent => "sent",
        Paid => "paid",
        Overdue => "overdue",
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceInput {
    pub invoice_number: String,
    pub client_name: String,
    pub client_email: String,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    pub items: Vec<InvoiceItem>,
    pub currency: Option<String>,
    pub notes: Option<String>,
    /// Base64-encoded rendered PDF, stored opaque.
    pub pdf_data: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceStatusInput {
    pub status: InvoiceStatus,
}

impl InvoiceInput {
    /// Line totals are quantity x amount; no tax line in this system.
    pub fn subtotal(&self) -> BigDecimal {
        self.items
            .iter()
            .map(|item| &item.amount * BigDecimal::from(item.quantity))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn subtotal_sums_quantity_times_amount() {
        let input = InvoiceInput {
            invoice_number: "INV-001".into(),
            client_name: "Acme".into(),
            client_email: "billing@acme.test".into(),
            invoice_date: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2025, 2, 10).unwrap(),
            items: vec![
                InvoiceItem {
                    description: "Consulting".into(),
                    quantity: 3,
                    amount: BigDecimal::from_str("150.50").unwrap(),
                },
                InvoiceItem {
                    description: "Support".into(),
                    quantity: 2,
                    amount: BigDecimal::from_str("99.99").unwrap(),
                },
            ],
            currency: None,
            notes: None,
            pdf_data: None,
        };
        assert_eq!(input.subtotal(), BigDecimal::from_str("651.48").unwrap());
    }
}
