use crate::domain::loan::{self, Loan};
use crate::domain::value_objects::{BookId, LoanId, UserId};
use crate::ports::inventory::{InventoryClient, InventoryError};
use crate::ports::loan_store::{LoanStore, ReturnOutcome};
use chrono::Utc;
use std::sync::Arc;

use super::errors::{LoanServiceError, Result};

/// サービスの依存関係
///
/// プロセス起動時に一度だけ構築され、すべてのリクエストで共有される。
/// エンジン自身はリクエスト間に状態を持たず、依存はすべて
/// このデータ構造を通じて明示的に渡される。
#[derive(Clone)]
pub struct ServiceDependencies {
    pub loan_store: Arc<dyn LoanStore>,
    pub inventory: Arc<dyn InventoryClient>,
}

/// 必須パラメータの存在と形式を検証する
///
/// プロトコル層は欠落をエラーにせず欠落値のまま渡してくるため、
/// 必須判定はここで行う。
fn require_id(name: &'static str, value: Option<&str>) -> Result<i64> {
    let raw = value.ok_or(LoanServiceError::MissingParameter(name))?;
    raw.trim()
        .parse::<i64>()
        .map_err(|_| LoanServiceError::MalformedParameter {
            name,
            value: raw.to_string(),
        })
}

/// 在庫クライアントのエラーをエンジンのエラーへ写す
///
/// 「存在しない」「在庫なし」は呼び出し側の誤り／状態衝突として、
/// それ以外は一時的なコラボレータ障害として扱う。
fn map_inventory_error(err: InventoryError) -> LoanServiceError {
    match err {
        InventoryError::NotFound => LoanServiceError::BookNotFound,
        InventoryError::NotAvailable => LoanServiceError::BookNotAvailable,
        other => LoanServiceError::Inventory(other),
    }
}

/// 貸出を作成する
///
/// 台帳への挿入と在庫の減算という2つの効果を、共有トランザクション
/// なしに対にする。
///
/// 処理順序：
/// 1. パラメータ検証
/// 2. 在庫を原子的に1減らす（拒否された場合は台帳への書き込みなし）
/// 3. 台帳に ACTIVE の貸出行を挿入する（loan_date = 現在時刻、
///    due_date = loan_date + 14日）
/// 4. 挿入に失敗した場合は減算を補償（+1）してからエラーを返す
///
/// 減算が挿入に先行するため、「貸出行があるのに減算されていない」
/// 状態は発生しない。逆向きの乖離（減算済みで行なし）は挿入失敗かつ
/// 補償失敗の場合にのみ残り、その場合はログに記録される。
pub async fn create_loan(
    deps: &ServiceDependencies,
    user_id: Option<&str>,
    book_id: Option<&str>,
) -> Result<Loan> {
    // 1. パラメータ検証
    let user_id = UserId::new(require_id("userId", user_id)?);
    let book_id = BookId::new(require_id("bookId", book_id)?);

    // 2. 在庫の原子的な減算。拒否が貸出可否の唯一の判定根拠
    deps.inventory
        .adjust_availability(book_id, -1)
        .await
        .map_err(map_inventory_error)?;

    // 3. 台帳へ挿入
    let new_loan = loan::issue_loan(user_id, book_id, Utc::now());
    let loan = match deps.loan_store.insert(new_loan).await {
        Ok(loan) => loan,
        Err(store_err) => {
            // 4. 挿入失敗：先行した減算を補償する
            if let Err(comp_err) = deps.inventory.adjust_availability(book_id, 1).await {
                tracing::error!(
                    book_id = book_id.value(),
                    error = %comp_err,
                    "failed to compensate inventory decrement; availability diverged"
                );
            }
            return Err(LoanServiceError::Ledger(store_err));
        }
    };

    tracing::info!(
        loan_id = loan.id.value(),
        user_id = user_id.value(),
        book_id = book_id.value(),
        "loan created"
    );
    Ok(loan)
}

/// 貸出を返却する
///
/// 処理順序：
/// 1. パラメータ検証
/// 2. 条件付き更新で ACTIVE → RETURNED を原子的に遷移させる
///    （存在しない／返却済みはストアがここで区別する）
/// 3. 在庫を1戻す
///
/// 手順3の失敗は呼び出し側へ報告されるが、確定済みの返却は
/// 取り消さない。台帳と在庫の乖離はログに記録される。
pub async fn return_loan(deps: &ServiceDependencies, loan_id: Option<&str>) -> Result<Loan> {
    // 1. パラメータ検証
    let loan_id = LoanId::new(require_id("loanId", loan_id)?);

    // 2. 原子的な状態遷移
    let outcome = deps
        .loan_store
        .complete_return(loan_id, Utc::now())
        .await
        .map_err(LoanServiceError::Ledger)?;

    let loan = match outcome {
        ReturnOutcome::Returned(loan) => loan,
        ReturnOutcome::AlreadyReturned => return Err(LoanServiceError::AlreadyReturned),
        ReturnOutcome::NotFound => return Err(LoanServiceError::LoanNotFound),
    };

    // 3. 在庫を戻す
    if let Err(err) = deps.inventory.adjust_availability(loan.book_id, 1).await {
        tracing::error!(
            loan_id = loan.id.value(),
            book_id = loan.book_id.value(),
            error = %err,
            "loan returned but inventory restock failed; availability diverged"
        );
        return Err(map_inventory_error(err));
    }

    tracing::info!(loan_id = loan.id.value(), "loan returned");
    Ok(loan)
}

/// IDで貸出を取得する
pub async fn get_loan(deps: &ServiceDependencies, loan_id: Option<&str>) -> Result<Loan> {
    let loan_id = LoanId::new(require_id("loanId", loan_id)?);

    deps.loan_store
        .get(loan_id)
        .await
        .map_err(LoanServiceError::Ledger)?
        .ok_or(LoanServiceError::LoanNotFound)
}

/// 利用者の貸出を貸出日の降順で取得する
pub async fn get_loans_by_user(
    deps: &ServiceDependencies,
    user_id: Option<&str>,
) -> Result<Vec<Loan>> {
    let user_id = UserId::new(require_id("userId", user_id)?);

    deps.loan_store
        .find_by_user(user_id)
        .await
        .map_err(LoanServiceError::Ledger)
}

/// 全貸出を貸出日の降順で取得する
pub async fn list_loans(deps: &ServiceDependencies) -> Result<Vec<Loan>> {
    deps.loan_store
        .list_all()
        .await
        .map_err(LoanServiceError::Ledger)
}
