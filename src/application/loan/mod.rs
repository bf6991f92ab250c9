mod errors;
mod loan_service;

pub use errors::{ErrorKind, LoanServiceError, Result};
pub use loan_service::{
    ServiceDependencies, create_loan, get_loan, get_loans_by_user, list_loans, return_loan,
};
