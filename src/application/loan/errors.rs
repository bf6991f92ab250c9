use crate::ports::inventory::InventoryError;
use thiserror::Error;

/// エラー種別（4分類）
///
/// プロトコル層はこの種別だけを見てワイヤ上の機械可読コードを決める。
/// メッセージ本文での分岐を呼び出し側に強いない。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 呼び出し側の誤り：必須パラメータの欠落・不正
    Validation,
    /// 呼び出し側の誤り：対象（貸出・書籍）が存在しない
    NotFound,
    /// 状態の衝突：返却済みの再返却、在庫なし
    StateConflict,
    /// 一時的なインフラ障害：台帳ストアまたは在庫サービス
    Collaborator,
}

impl ErrorKind {
    /// ワイヤ上の機械可読コード
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "VALIDATION_ERROR",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::StateConflict => "STATE_CONFLICT",
            ErrorKind::Collaborator => "COLLABORATOR_UNAVAILABLE",
        }
    }
}

/// 貸出オーケストレーションのエラー
#[derive(Debug, Error)]
pub enum LoanServiceError {
    /// 必須パラメータの欠落
    #[error("{0} is required")]
    MissingParameter(&'static str),

    /// パラメータが整数IDとして解釈できない
    #[error("{name} is not a valid id: {value}")]
    MalformedParameter { name: &'static str, value: String },

    /// 貸出が見つからない
    #[error("Loan not found")]
    LoanNotFound,

    /// 書籍が見つからない
    #[error("Book not found")]
    BookNotFound,

    /// 既に返却済み
    #[error("Loan already returned")]
    AlreadyReturned,

    /// 在庫なし
    #[error("Book is not available")]
    BookNotAvailable,

    /// 台帳ストアのエラー
    #[error("Ledger store error: {0}")]
    Ledger(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// 在庫サービスのエラー
    #[error("Inventory service error: {0}")]
    Inventory(#[source] InventoryError),
}

impl LoanServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingParameter(_) | Self::MalformedParameter { .. } => ErrorKind::Validation,
            Self::LoanNotFound | Self::BookNotFound => ErrorKind::NotFound,
            Self::AlreadyReturned | Self::BookNotAvailable => ErrorKind::StateConflict,
            Self::Ledger(_) | Self::Inventory(_) => ErrorKind::Collaborator,
        }
    }
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, LoanServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds_cover_the_four_classes() {
        assert_eq!(
            LoanServiceError::MissingParameter("userId").kind(),
            ErrorKind::Validation
        );
        assert_eq!(LoanServiceError::LoanNotFound.kind(), ErrorKind::NotFound);
        assert_eq!(
            LoanServiceError::AlreadyReturned.kind(),
            ErrorKind::StateConflict
        );
        assert_eq!(
            LoanServiceError::BookNotAvailable.kind(),
            ErrorKind::StateConflict
        );
        assert_eq!(
            LoanServiceError::Inventory(InventoryError::Unreachable("down".into())).kind(),
            ErrorKind::Collaborator
        );
    }

    #[test]
    fn test_messages_match_the_wire_contract() {
        assert_eq!(
            LoanServiceError::BookNotAvailable.to_string(),
            "Book is not available"
        );
        assert_eq!(LoanServiceError::LoanNotFound.to_string(), "Loan not found");
        assert_eq!(
            LoanServiceError::AlreadyReturned.to_string(),
            "Loan already returned"
        );
    }
}
