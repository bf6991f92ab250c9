pub mod loan_store;

pub use loan_store::LoanStore as PostgresLoanStore;
