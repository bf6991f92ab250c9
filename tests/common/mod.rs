#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use library_loan_service::adapters::mock::InventoryClient as MockInventoryClient;
use library_loan_service::application::loan::ServiceDependencies;
use library_loan_service::domain::book::Book;
use library_loan_service::domain::loan::{Loan, LoanStatus, NewLoan};
use library_loan_service::domain::value_objects::{BookId, LoanId, UserId};
use library_loan_service::ports::loan_store::{LoanStore, Result, ReturnOutcome};
use std::sync::{Arc, Mutex};

// ============================================================================
// インメモリ台帳ストア実装（テスト用）
// ============================================================================

struct StoreState {
    loans: Vec<Loan>,
    next_id: i64,
    fail: bool,
}

/// インメモリLoanStore実装
///
/// IDの採番と条件付き返却更新をPostgreSQL実装と同じ契約で模倣する。
/// `set_fail` でコラボレータ障害を注入できる。
pub struct InMemoryLoanStore {
    state: Mutex<StoreState>,
}

impl InMemoryLoanStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(StoreState {
                loans: Vec::new(),
                next_id: 1,
                fail: false,
            }),
        }
    }

    /// 以降のすべての操作を失敗させる
    pub fn set_fail(&self, fail: bool) {
        self.state.lock().unwrap().fail = fail;
    }

    /// 台帳の行数
    pub fn loan_count(&self) -> usize {
        self.state.lock().unwrap().loans.len()
    }

    /// テストからの直接読み出し（エンジンを経由しない）
    pub fn get_sync(&self, loan_id: LoanId) -> Option<Loan> {
        self.state
            .lock()
            .unwrap()
            .loans
            .iter()
            .find(|l| l.id == loan_id)
            .cloned()
    }
}

fn store_error(message: &str) -> Box<dyn std::error::Error + Send + Sync> {
    Box::new(std::io::Error::new(
        std::io::ErrorKind::Other,
        message.to_string(),
    ))
}

#[async_trait]
impl LoanStore for InMemoryLoanStore {
    async fn insert(&self, new_loan: NewLoan) -> Result<Loan> {
        let mut state = self.state.lock().unwrap();
        if state.fail {
            return Err(store_error("injected ledger failure"));
        }

        let loan = Loan {
            id: LoanId::new(state.next_id),
            user_id: new_loan.user_id,
            book_id: new_loan.book_id,
            loan_date: new_loan.loan_date,
            due_date: new_loan.due_date,
            return_date: None,
            status: LoanStatus::Active,
        };
        state.next_id += 1;
        state.loans.push(loan.clone());
        Ok(loan)
    }

    async fn get(&self, loan_id: LoanId) -> Result<Option<Loan>> {
        let state = self.state.lock().unwrap();
        if state.fail {
            return Err(store_error("injected ledger failure"));
        }
        Ok(state.loans.iter().find(|l| l.id == loan_id).cloned())
    }

    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<Loan>> {
        let state = self.state.lock().unwrap();
        if state.fail {
            return Err(store_error("injected ledger failure"));
        }
        let mut loans: Vec<Loan> = state
            .loans
            .iter()
            .filter(|l| l.user_id == user_id)
            .cloned()
            .collect();
        loans.sort_by(|a, b| b.loan_date.cmp(&a.loan_date));
        Ok(loans)
    }

    async fn list_all(&self) -> Result<Vec<Loan>> {
        let state = self.state.lock().unwrap();
        if state.fail {
            return Err(store_error("injected ledger failure"));
        }
        let mut loans = state.loans.clone();
        loans.sort_by(|a, b| b.loan_date.cmp(&a.loan_date));
        Ok(loans)
    }

    async fn complete_return(
        &self,
        loan_id: LoanId,
        returned_at: DateTime<Utc>,
    ) -> Result<ReturnOutcome> {
        let mut state = self.state.lock().unwrap();
        if state.fail {
            return Err(store_error("injected ledger failure"));
        }

        let loan = match state.loans.iter_mut().find(|l| l.id == loan_id) {
            Some(loan) => loan,
            None => return Ok(ReturnOutcome::NotFound),
        };

        if loan.is_returned() {
            return Ok(ReturnOutcome::AlreadyReturned);
        }

        loan.return_date = Some(returned_at);
        loan.status = LoanStatus::Returned;
        Ok(ReturnOutcome::Returned(loan.clone()))
    }
}

// ============================================================================
// テストセットアップヘルパー
// ============================================================================

/// インメモリ依存でServiceDependenciesを組み立てる
pub fn build_dependencies() -> (
    ServiceDependencies,
    Arc<InMemoryLoanStore>,
    Arc<MockInventoryClient>,
) {
    let loan_store = Arc::new(InMemoryLoanStore::new());
    let inventory = Arc::new(MockInventoryClient::new());

    let deps = ServiceDependencies {
        loan_store: loan_store.clone(),
        inventory: inventory.clone(),
    };

    (deps, loan_store, inventory)
}

/// テスト用の書籍スナップショット
pub fn test_book(id: i64, available_quantity: i32) -> Book {
    Book::new(BookId::new(id), available_quantity)
}
