use crate::domain::loan::{Loan, NewLoan};
use crate::domain::value_objects::{LoanId, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 返却の条件付き更新の結果
///
/// 「返却済みチェック」と「更新」を分離すると同一貸出への並行返却が
/// 二重に成功しうるため、ストアは更新できなかった理由まで区別して返す。
#[derive(Debug, Clone, PartialEq)]
pub enum ReturnOutcome {
    /// 返却が確定した（更新後の行を含む）
    Returned(Loan),
    /// 既に返却済みだった
    AlreadyReturned,
    /// 貸出が存在しない
    NotFound,
}

/// 台帳ストアポート
///
/// 貸出レコードの永続化のみを担い、業務ルールは持たない。
/// 行の削除は提供しない（台帳は追記と一度きりの返却更新のみ）。
#[async_trait]
pub trait LoanStore: Send + Sync {
    /// 新しい貸出行を ACTIVE で挿入し、採番されたIDを含む行を返す
    async fn insert(&self, new_loan: NewLoan) -> Result<Loan>;

    /// IDで貸出を取得する
    async fn get(&self, loan_id: LoanId) -> Result<Option<Loan>>;

    /// 利用者の貸出を貸出日の降順で取得する
    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<Loan>>;

    /// 全貸出を貸出日の降順で取得する
    async fn list_all(&self) -> Result<Vec<Loan>>;

    /// ACTIVE な貸出を RETURNED に遷移させる（原子的な条件付き更新）
    ///
    /// `return_date` の設定とステータス遷移を1回の更新で行い、
    /// 現在のステータスを述語にすることで二重返却を排除する。
    async fn complete_return(
        &self,
        loan_id: LoanId,
        returned_at: DateTime<Utc>,
    ) -> Result<ReturnOutcome>;
}
