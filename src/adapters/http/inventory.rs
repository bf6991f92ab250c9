use crate::domain::book::Book;
use crate::domain::value_objects::BookId;
use crate::ports::inventory::{InventoryClient as InventoryClientTrait, InventoryError};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// InventoryClientのHTTP実装
///
/// 書籍在庫サービスのREST API（GET/PUT /api/books/:id）に接続する。
/// すべてのリクエストはクライアント全体のタイムアウトで制限され、
/// 接続失敗・タイムアウトは `Unreachable` として報告される。
pub struct HttpInventoryClient {
    client: Client,
    base_url: String,
}

impl HttpInventoryClient {
    /// ベースURLとタイムアウトからクライアントを構築する
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, InventoryError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| InventoryError::Unreachable(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn book_url(&self, book_id: BookId) -> String {
        format!("{}/api/books/{}", self.base_url, book_id.value())
    }

    /// 応答を書籍スナップショットとして解釈する
    async fn read_book_response(response: reqwest::Response) -> Result<Book, InventoryError> {
        match response.status() {
            StatusCode::OK => response
                .json::<Book>()
                .await
                .map_err(|e| InventoryError::InvalidPayload(e.to_string())),
            StatusCode::NOT_FOUND => Err(InventoryError::NotFound),
            status => Err(InventoryError::UnexpectedStatus(status.as_u16())),
        }
    }
}

#[async_trait]
impl InventoryClientTrait for HttpInventoryClient {
    async fn fetch_book(&self, book_id: BookId) -> Result<Book, InventoryError> {
        let response = self
            .client
            .get(self.book_url(book_id))
            .send()
            .await
            .map_err(|e| InventoryError::Unreachable(e.to_string()))?;

        Self::read_book_response(response).await
    }

    /// 全フィールド置換のPUT。部分更新のAPIは存在しない
    async fn update_book(&self, book_id: BookId, book: &Book) -> Result<Book, InventoryError> {
        let response = self
            .client
            .put(self.book_url(book_id))
            .json(book)
            .send()
            .await
            .map_err(|e| InventoryError::Unreachable(e.to_string()))?;

        Self::read_book_response(response).await
    }

    /// リモートに条件付き書き込みAPIがないため、読み直しと検査を
    /// 挟んだ全置換で近似する
    async fn adjust_availability(
        &self,
        book_id: BookId,
        delta: i32,
    ) -> Result<Book, InventoryError> {
        let mut book = self.fetch_book(book_id).await?;

        let adjusted = book.available_quantity + delta;
        if adjusted < 0 {
            return Err(InventoryError::NotAvailable);
        }

        book.available_quantity = adjusted;
        self.update_book(book_id, &book).await
    }
}
