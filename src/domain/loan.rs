use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::value_objects::{BookId, LoanId, UserId};

/// 貸出期間（日数）
pub const LOAN_PERIOD_DAYS: i64 = 14;

/// 貸出ステータス
///
/// 遷移は ACTIVE → RETURNED の一方向のみ。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanStatus {
    /// 貸出中
    Active,
    /// 返却済み
    Returned,
}

impl LoanStatus {
    /// ワイヤ・台帳共通の文字列表現
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Active => "ACTIVE",
            LoanStatus::Returned => "RETURNED",
        }
    }
}

impl std::str::FromStr for LoanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(LoanStatus::Active),
            "RETURNED" => Ok(LoanStatus::Returned),
            _ => Err(format!("Invalid loan status: {}", s)),
        }
    }
}

/// 貸出レコード - 台帳の1行
///
/// 不変条件：
/// - `status == Returned` と `return_date` の存在は同値
/// - `due_date` は常に `loan_date + 14日`（導出値であり独立に設定不可）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    pub id: LoanId,
    pub user_id: UserId,
    pub book_id: BookId,
    pub loan_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
    pub status: LoanStatus,
}

impl Loan {
    pub fn is_returned(&self) -> bool {
        matches!(self.status, LoanStatus::Returned)
    }
}

/// 挿入前の貸出 - IDは台帳ストアが採番する
///
/// 挿入時のステータスは常に ACTIVE、`return_date` はなし。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLoan {
    pub user_id: UserId,
    pub book_id: BookId,
    pub loan_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
}

/// 純粋関数：貸出を起票する
///
/// `due_date` をここで導出することで、貸出期間のルールを
/// 台帳ストアやプロトコル層に漏らさない。
pub fn issue_loan(user_id: UserId, book_id: BookId, loan_date: DateTime<Utc>) -> NewLoan {
    NewLoan {
        user_id,
        book_id,
        loan_date,
        due_date: loan_date + Duration::days(LOAN_PERIOD_DAYS),
    }
}
