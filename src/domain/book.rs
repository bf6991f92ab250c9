use serde::{Deserialize, Serialize};

use super::value_objects::BookId;

/// 書籍スナップショット - 在庫サービスが所有するレコードの写し
///
/// 貸出コンテキストが関心を持つのは `available_quantity` のみ。
/// 在庫サービスの更新APIは全フィールド置換であるため、読み取った
/// スナップショットの残りのフィールドは `extra` にそのまま保持し、
/// 変更せずに送り返す。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: BookId,
    pub available_quantity: i32,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Book {
    pub fn new(id: BookId, available_quantity: i32) -> Self {
        Self {
            id,
            available_quantity,
            extra: serde_json::Map::new(),
        }
    }
}
