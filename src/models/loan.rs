//! Loan listing records

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A loan or credit product held by the user
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Loan {
    pub product_id: i64,
    pub product_name: String,
    pub product_type: String,
    pub balance: f64,
    pub credit_limit: f64,
    pub start_date: String,
    pub end_date: String,
    pub status: Option<String>,
    pub payment_amount: f64,
    pub payment_frequency: String,
    pub interest_rate: Option<f64>,
    pub annual_fee: f64,
}

impl Loan {
    pub fn status_category(&self) -> LoanStatus {
        self.status
            .as_deref()
            .map(LoanStatus::from_status)
            .unwrap_or(LoanStatus::Other)
    }

    /// Status text for display, `N/A` when the backend sent none
    pub fn status_label(&self) -> &str {
        match self.status.as_deref() {
            Some(s) if !s.is_empty() => s,
            _ => "N/A",
        }
    }
}

/// Display category of a loan status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanStatus {
    Active,
    PaidOff,
    Defaulted,
    Pending,
    Other,
}

impl LoanStatus {
    /// Case-insensitive match against the known status values
    pub fn from_status(status: &str) -> Self {
        match status.to_lowercase().as_str() {
            "active" => LoanStatus::Active,
            "paid off" => LoanStatus::PaidOff,
            "defaulted" => LoanStatus::Defaulted,
            "pending" => LoanStatus::Pending,
            _ => LoanStatus::Other,
        }
    }
}

/// Decode the `loans` array of a listing response
///
/// Anything other than an array is logged and treated as an empty list.
pub fn decode_loans(mut body: Value) -> Vec<Loan> {
    let items = match body.get_mut("loans").map(Value::take) {
        Some(Value::Array(items)) => items,
        other => {
            tracing::warn!(loans = ?other, "Loans data is not an array");
            return Vec::new();
        }
    };

    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<Loan>(item) {
            Ok(loan) => Some(loan),
            Err(e) => {
                tracing::warn!("Skipping malformed loan record: {}", e);
                None
            }
        })
        .collect()
}
