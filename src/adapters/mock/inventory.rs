use crate::domain::book::Book;
use crate::domain::value_objects::BookId;
use crate::ports::inventory::{InventoryClient as InventoryClientTrait, InventoryError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
struct InventoryState {
    books: HashMap<BookId, Book>,
    fail_fetch: bool,
    fail_update: bool,
}

/// In-memory implementation of InventoryClient
///
/// Supports stateful testing by storing book snapshots. Availability
/// adjustments happen under a single lock, so the conditional
/// decrement is genuinely atomic here. Failures can be injected per
/// call kind to exercise the collaborator-error paths.
pub struct InventoryClient {
    state: Mutex<InventoryState>,
}

impl InventoryClient {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(InventoryState::default()),
        }
    }

    /// Register a book snapshot for testing purposes
    pub fn add_book(&self, book: Book) {
        self.state.lock().unwrap().books.insert(book.id, book);
    }

    /// Current availability of a book, if it exists
    pub fn available_quantity(&self, book_id: BookId) -> Option<i32> {
        self.state
            .lock()
            .unwrap()
            .books
            .get(&book_id)
            .map(|b| b.available_quantity)
    }

    /// Make subsequent fetches fail as unreachable
    pub fn set_fail_fetch(&self, fail: bool) {
        self.state.lock().unwrap().fail_fetch = fail;
    }

    /// Make subsequent updates and adjustments fail as unreachable
    pub fn set_fail_update(&self, fail: bool) {
        self.state.lock().unwrap().fail_update = fail;
    }
}

impl Default for InventoryClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InventoryClientTrait for InventoryClient {
    async fn fetch_book(&self, book_id: BookId) -> Result<Book, InventoryError> {
        let state = self.state.lock().unwrap();
        if state.fail_fetch {
            return Err(InventoryError::Unreachable(
                "injected fetch failure".to_string(),
            ));
        }
        state
            .books
            .get(&book_id)
            .cloned()
            .ok_or(InventoryError::NotFound)
    }

    async fn update_book(&self, book_id: BookId, book: &Book) -> Result<Book, InventoryError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_update {
            return Err(InventoryError::Unreachable(
                "injected update failure".to_string(),
            ));
        }
        if !state.books.contains_key(&book_id) {
            return Err(InventoryError::NotFound);
        }
        state.books.insert(book_id, book.clone());
        Ok(book.clone())
    }

    async fn adjust_availability(
        &self,
        book_id: BookId,
        delta: i32,
    ) -> Result<Book, InventoryError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_update {
            return Err(InventoryError::Unreachable(
                "injected update failure".to_string(),
            ));
        }

        let book = state.books.get_mut(&book_id).ok_or(InventoryError::NotFound)?;

        let adjusted = book.available_quantity + delta;
        if adjusted < 0 {
            return Err(InventoryError::NotAvailable);
        }

        book.available_quantity = adjusted;
        Ok(book.clone())
    }
}
