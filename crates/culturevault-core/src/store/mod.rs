//! Seams between the search-merge engine and the outside world: the remote
//! lookup, the persisted recency history, and the session stash that carries
//! remote payloads to the destination page.
//!
//! | Trait | Purpose | Operations |
//! |-------|---------|------------|
//! | [`RemoteLookup`] | Resolve free text to structured place info | `invoke` |
//! | [`HistoryStore`] | Persisted list of recently selected names | `get`, `set`, `clear` |
//! | [`StashStore`] | One-shot hand-off of remote payloads | `stash`, `take` |

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::PlaceInfo;

/// Outcome envelope for a remote lookup, mirroring the gateway wire format:
/// `success: true` with a payload, or `success: false` with a message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<PlaceInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LookupResponse {
    pub fn ok(data: PlaceInfo) -> Self {
        LookupResponse {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(message: &str) -> Self {
        LookupResponse {
            success: false,
            data: None,
            error: Some(message.to_string()),
        }
    }
}

/// A remote place lookup.
///
/// Implementations resolve a free-text query to structured place info.
/// Failures may surface either as `Err` or as a `success: false` response;
/// the search-merge engine treats both the same and shows local results only.
#[async_trait]
pub trait RemoteLookup: Send + Sync {
    async fn invoke(&self, query: &str) -> Result<LookupResponse>;
}

/// Persisted list of recently selected place names, most recent first.
pub trait HistoryStore: Send + Sync {
    /// Read the full list.
    fn get(&self) -> Result<Vec<String>>;
    /// Replace the full list.
    fn set(&self, entries: &[String]) -> Result<()>;
    /// Remove every entry.
    fn clear(&self) -> Result<()>;
}

/// Session hand-off for remote lookup payloads.
///
/// `stash` files a payload under its destination id; `take` consumes it.
/// A stashed payload is read at most once, so a second `take` for the same
/// id returns `None`.
pub trait StashStore: Send + Sync {
    fn stash(&self, id: &str, payload: &PlaceInfo) -> Result<()>;
    fn take(&self, id: &str) -> Result<Option<PlaceInfo>>;
}
