use crate::domain::book::Book;
use crate::domain::value_objects::BookId;
use async_trait::async_trait;
use thiserror::Error;

/// 在庫クライアントのエラー
///
/// 呼び出し側（オーケストレーションエンジン）が種別で分岐できるよう、
/// 「存在しない」「在庫なし」と到達性の問題を型で区別する。
#[derive(Debug, Error)]
pub enum InventoryError {
    /// 書籍が存在しない
    #[error("Book not found")]
    NotFound,

    /// 在庫が足りず減算を拒否した
    #[error("Book is not available")]
    NotAvailable,

    /// 在庫サービスに到達できない（接続失敗・タイムアウト）
    #[error("inventory service unreachable: {0}")]
    Unreachable(String),

    /// 在庫サービスが想定外のステータスを返した
    #[error("unexpected inventory response: HTTP {0}")]
    UnexpectedStatus(u16),

    /// 在庫サービスの応答本文を解釈できない
    #[error("invalid inventory payload: {0}")]
    InvalidPayload(String),
}

/// 在庫クライアントポート
///
/// 書籍在庫サービスとの境界。貸出コンテキストは書籍の詳細を知らず、
/// `availableQuantity` を中心としたスナップショットのみを扱う。
#[async_trait]
pub trait InventoryClient: Send + Sync {
    /// 書籍スナップショットを取得する
    async fn fetch_book(&self, book_id: BookId) -> Result<Book, InventoryError>;

    /// 書籍レコードを全フィールド置換で更新する
    ///
    /// 部分更新のAPIは存在しないため、呼び出し側は読み取った
    /// スナップショットの全フィールドを送り返す必要がある。
    async fn update_book(&self, book_id: BookId, book: &Book) -> Result<Book, InventoryError>;

    /// `availableQuantity` を条件付きで増減し、更新後のスナップショットを返す
    ///
    /// 減算で在庫が 0 を下回る場合は `NotAvailable` で拒否する。
    /// この拒否が貸出可否の唯一の判定根拠であり、呼び出し側は
    /// 別途の読み取り・検査を行ってはならない。
    async fn adjust_availability(&self, book_id: BookId, delta: i32)
    -> Result<Book, InventoryError>;
}
