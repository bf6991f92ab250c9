use crate::domain::loan::{Loan, LoanStatus, NewLoan};
use crate::domain::value_objects::{BookId, LoanId, UserId};
use crate::ports::loan_store::{LoanStore as LoanStoreTrait, Result, ReturnOutcome};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row, postgres::PgRow};
use std::str::FromStr;

/// PostgreSQLの行データをLoanに変換する
///
/// ステータス列の文字列変換でエラーハンドリングを行う。
fn map_row_to_loan(row: &PgRow) -> Result<Loan> {
    let status_str: &str = row.get("status");
    let status = LoanStatus::from_str(status_str).map_err(|e| {
        Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
            as Box<dyn std::error::Error + Send + Sync>
    })?;

    Ok(Loan {
        id: LoanId::new(row.get("id")),
        user_id: UserId::new(row.get("user_id")),
        book_id: BookId::new(row.get("book_id")),
        loan_date: row.get("loan_date"),
        due_date: row.get("due_date"),
        return_date: row.get("return_date"),
        status,
    })
}

/// LoanStoreのPostgreSQL実装
///
/// コネクションプールを共有し、ハンドラ間の直列化は行わない。
pub struct LoanStore {
    pool: PgPool,
}

impl LoanStore {
    /// PostgreSQLコネクションプールから新しいLoanStoreを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LoanStoreTrait for LoanStore {
    /// 貸出行を ACTIVE で挿入し、採番された行を返す
    async fn insert(&self, new_loan: NewLoan) -> Result<Loan> {
        let row = sqlx::query(
            r#"
            INSERT INTO loans (user_id, book_id, loan_date, due_date, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, book_id, loan_date, due_date, return_date, status
            "#,
        )
        .bind(new_loan.user_id.value())
        .bind(new_loan.book_id.value())
        .bind(new_loan.loan_date)
        .bind(new_loan.due_date)
        .bind(LoanStatus::Active.as_str())
        .fetch_one(&self.pool)
        .await?;

        map_row_to_loan(&row)
    }

    /// IDで貸出を取得
    async fn get(&self, loan_id: LoanId) -> Result<Option<Loan>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, book_id, loan_date, due_date, return_date, status
            FROM loans
            WHERE id = $1
            "#,
        )
        .bind(loan_id.value())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_loan).transpose()
    }

    /// 利用者の貸出を貸出日の降順で取得
    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<Loan>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, book_id, loan_date, due_date, return_date, status
            FROM loans
            WHERE user_id = $1
            ORDER BY loan_date DESC
            "#,
        )
        .bind(user_id.value())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row_to_loan).collect()
    }

    /// 全貸出を貸出日の降順で取得
    async fn list_all(&self) -> Result<Vec<Loan>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, book_id, loan_date, due_date, return_date, status
            FROM loans
            ORDER BY loan_date DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row_to_loan).collect()
    }

    /// ACTIVE な貸出を RETURNED に遷移させる（条件付き更新）
    ///
    /// 現在のステータスをWHERE句の述語にすることで、並行する返却の
    /// どちらか一方だけが行を更新できる。更新できなかった場合のみ
    /// 理由の判別のために行を読み直す。
    async fn complete_return(
        &self,
        loan_id: LoanId,
        returned_at: DateTime<Utc>,
    ) -> Result<ReturnOutcome> {
        let row = sqlx::query(
            r#"
            UPDATE loans
            SET return_date = $2, status = $3
            WHERE id = $1 AND status = $4
            RETURNING id, user_id, book_id, loan_date, due_date, return_date, status
            "#,
        )
        .bind(loan_id.value())
        .bind(returned_at)
        .bind(LoanStatus::Returned.as_str())
        .bind(LoanStatus::Active.as_str())
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = row.as_ref() {
            return Ok(ReturnOutcome::Returned(map_row_to_loan(row)?));
        }

        let exists = sqlx::query("SELECT 1 FROM loans WHERE id = $1")
            .bind(loan_id.value())
            .fetch_optional(&self.pool)
            .await?;

        if exists.is_some() {
            Ok(ReturnOutcome::AlreadyReturned)
        } else {
            Ok(ReturnOutcome::NotFound)
        }
    }
}
