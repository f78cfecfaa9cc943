//! Loan Book
//!
//! Read-only listing of the user's loans. One fetch per [`LoanBook::refresh`];
//! a failed fetch empties the book.

use crate::backend::{BackendError, FinanceBackend};
use crate::error::{AppError, AppResult};
use crate::models::{Identity, Loan};

/// Shown in place of the table when the user holds no loans
pub const NO_LOANS_MESSAGE: &str = "You currently have no active loans.";

pub const FETCH_FAILED: &str = "Failed to fetch loans";

/// State of the Loans page
#[derive(Debug, Clone, Default)]
pub struct LoanBook {
    identity: Option<Identity>,
    loans: Vec<Loan>,
}

impl LoanBook {
    pub fn new(identity: Option<Identity>) -> Self {
        Self {
            identity,
            loans: Vec::new(),
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn loans(&self) -> &[Loan] {
        &self.loans
    }

    pub fn is_empty(&self) -> bool {
        self.loans.is_empty()
    }

    /// Replace the book with a fetch result
    pub fn apply(&mut self, result: Result<Vec<Loan>, BackendError>) -> AppResult<&[Loan]> {
        match result {
            Ok(loans) => {
                tracing::debug!(count = loans.len(), "Loans loaded");
                self.loans = loans;
                Ok(&self.loans)
            }
            Err(e) => {
                tracing::error!(error = %e, "Error fetching loans");
                self.loans.clear();
                Err(AppError::backend(FETCH_FAILED, e))
            }
        }
    }

    pub async fn refresh(&mut self, backend: &dyn FinanceBackend) -> AppResult<&[Loan]> {
        let identity = self.identity.as_ref().ok_or(AppError::MissingIdentity)?;
        let result = backend.list_loans(identity).await;
        self.apply(result)
    }
}
