//! Message History
//!
//! Paginated history between two users. Pages are counted from the most
//! recent message backwards; the messages inside a page are returned
//! oldest first so a client can append them in display order.

use serde::{Deserialize, Serialize};

use crate::shared::message::Message;

/// Query parameters for `GET /api/messages/{user_id}`
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Pagination metadata
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub pages: u64,
}

impl Pagination {
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        let pages = if limit == 0 { 0 } else { total.div_ceil(u64::from(limit)) };
        Self {
            page,
            limit,
            total,
            pages,
        }
    }

    /// Number of messages to skip to reach this page
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

/// One page of history with a peer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryPage {
    pub messages: Vec<Message>,
    pub pagination: Pagination,
}
