//! Request Dedup Guard
//!
//! Single-slot idempotency check per session: each session remembers the
//! `(code, page)` pair of its most recently accepted recommendation
//! request, and an identical resubmission is rejected before the pager
//! runs. This is a guard, not a cache: rejection returns a sentinel
//! status, never the previous page. The slot is overwritten on every
//! accepted request and dropped when the session logs out.

use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

/// The request signature remembered per session
type RequestSignature = (Option<String>, i64);

/// In-process, per-session dedup slots
#[derive(Debug, Default)]
pub struct DedupGuard {
    slots: Mutex<HashMap<Uuid, RequestSignature>>,
}

impl DedupGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept or reject a request for this session.
    ///
    /// Rejects when the incoming `(code, page)` equals the stored pair;
    /// otherwise stores the new pair and accepts. A session's first
    /// request is always accepted.
    pub async fn accept(&self, session_id: Uuid, code: Option<&str>, page: i64) -> bool {
        let incoming: RequestSignature = (code.map(str::to_owned), page);
        let mut slots = self.slots.lock().await;

        match slots.get(&session_id) {
            Some(stored) if *stored == incoming => false,
            _ => {
                slots.insert(session_id, incoming);
                true
            }
        }
    }

    /// Drop a session's slot. Called on logout so the map does not
    /// accumulate entries for sessions that no longer exist.
    pub async fn remove(&self, session_id: Uuid) {
        self.slots.lock().await.remove(&session_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_request_accepted() {
        let guard = DedupGuard::new();
        assert!(guard.accept(Uuid::new_v4(), Some("abc"), 1).await);
    }

    #[tokio::test]
    async fn test_identical_pair_rejected() {
        // Scenario D: same code and page resubmitted back to back.
        let guard = DedupGuard::new();
        let session = Uuid::new_v4();
        assert!(guard.accept(session, Some("abc"), 1).await);
        assert!(!guard.accept(session, Some("abc"), 1).await);
    }

    #[tokio::test]
    async fn test_different_page_accepted() {
        let guard = DedupGuard::new();
        let session = Uuid::new_v4();
        assert!(guard.accept(session, Some("abc"), 1).await);
        assert!(guard.accept(session, Some("abc"), 2).await);
    }

    #[tokio::test]
    async fn test_different_code_accepted() {
        let guard = DedupGuard::new();
        let session = Uuid::new_v4();
        assert!(guard.accept(session, Some("abc"), 1).await);
        assert!(guard.accept(session, Some("def"), 1).await);
    }

    #[tokio::test]
    async fn test_slot_is_overwritten_not_accumulated() {
        // Only the most recent pair is remembered: after a different
        // request, the original pair is accepted again.
        let guard = DedupGuard::new();
        let session = Uuid::new_v4();
        assert!(guard.accept(session, Some("abc"), 1).await);
        assert!(guard.accept(session, Some("abc"), 2).await);
        assert!(guard.accept(session, Some("abc"), 1).await);
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let guard = DedupGuard::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert!(guard.accept(a, Some("abc"), 1).await);
        assert!(guard.accept(b, Some("abc"), 1).await);
        assert!(!guard.accept(a, Some("abc"), 1).await);
    }

    #[tokio::test]
    async fn test_removed_session_starts_fresh() {
        // After the slot is dropped, the same pair is accepted again.
        let guard = DedupGuard::new();
        let session = Uuid::new_v4();
        assert!(guard.accept(session, Some("abc"), 1).await);
        guard.remove(session).await;
        assert!(guard.accept(session, Some("abc"), 1).await);
    }

    #[tokio::test]
    async fn test_remove_unknown_session_is_harmless() {
        let guard = DedupGuard::new();
        guard.remove(Uuid::new_v4()).await;
    }

    #[tokio::test]
    async fn test_missing_code_still_dedups() {
        let guard = DedupGuard::new();
        let session = Uuid::new_v4();
        assert!(guard.accept(session, None, 1).await);
        assert!(!guard.accept(session, None, 1).await);
        assert!(guard.accept(session, None, 2).await);
    }
}
