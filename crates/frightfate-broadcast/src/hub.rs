//! The broadcast hub.
//!
//! Each session has its own bucket with its own lock, so unrelated sessions
//! never contend. The outer map lock is only held to look up, insert or
//! remove a bucket. No lock is held while sending.
//!
//! A bucket that empties is marked closed before it is removed from the
//! map; a `connect` that finds a closed bucket replaces it instead of
//! joining it, so a viewer can never land in a bucket that is on its way out.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use frightfate_core::viewer::ViewerConnection;
use futures::future::join_all;
use tracing::{debug, warn};
use uuid::Uuid;

#[derive(Default)]
struct Viewers {
    connections: Vec<Arc<dyn ViewerConnection>>,
    closed: bool,
}

#[derive(Default)]
struct Bucket {
    viewers: Mutex<Viewers>,
}

impl Bucket {
    fn lock(&self) -> std::sync::MutexGuard<'_, Viewers> {
        self.viewers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Per-session fan-out of text frames to live viewers.
#[derive(Default)]
pub struct BroadcastHub {
    sessions: RwLock<HashMap<String, Arc<Bucket>>>,
}

impl std::fmt::Debug for BroadcastHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BroadcastHub")
            .field("sessions", &self.session_count())
            .finish()
    }
}

impl BroadcastHub {
    /// Creates an empty hub.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn bucket(&self, session_code: &str) -> Option<Arc<Bucket>> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(session_code)
            .cloned()
    }

    fn bucket_or_insert(&self, session_code: &str) -> Arc<Bucket> {
        if let Some(bucket) = self.bucket(session_code) {
            return bucket;
        }
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(sessions.entry(session_code.to_owned()).or_default())
    }

    /// Drops the map entry for `session_code` if it is still `bucket`.
    fn remove_if_current(&self, session_code: &str, bucket: &Arc<Bucket>) {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        if sessions
            .get(session_code)
            .is_some_and(|current| Arc::ptr_eq(current, bucket))
        {
            sessions.remove(session_code);
        }
    }

    /// Adds a viewer to a session, creating the session's bucket if needed.
    pub fn connect(&self, session_code: &str, connection: Arc<dyn ViewerConnection>) {
        loop {
            let bucket = self.bucket_or_insert(session_code);
            {
                let mut viewers = bucket.lock();
                if !viewers.closed {
                    viewers.connections.push(connection);
                    debug!(
                        session_code,
                        viewers = viewers.connections.len(),
                        "viewer connected"
                    );
                    return;
                }
            }
            self.remove_if_current(session_code, &bucket);
        }
    }

    /// Removes a viewer, deleting the session's bucket once it is empty.
    pub fn disconnect(&self, session_code: &str, connection_id: Uuid) {
        let Some(bucket) = self.bucket(session_code) else {
            return;
        };
        let emptied = {
            let mut viewers = bucket.lock();
            viewers.connections.retain(|c| c.id() != connection_id);
            viewers.closed = viewers.connections.is_empty();
            viewers.closed
        };
        if emptied {
            self.remove_if_current(session_code, &bucket);
        }
        debug!(session_code, %connection_id, "viewer disconnected");
    }

    /// Sends `message` verbatim to every viewer of a session, the sender
    /// included. Sends run concurrently; a failed send is logged and skipped.
    ///
    /// Returns the number of viewers that accepted the message.
    pub async fn broadcast(&self, session_code: &str, message: &str) -> usize {
        let Some(bucket) = self.bucket(session_code) else {
            return 0;
        };
        let snapshot = bucket.lock().connections.clone();

        let outcomes = join_all(snapshot.iter().map(|c| c.send_text(message))).await;
        let mut delivered = 0;
        for outcome in outcomes {
            match outcome {
                Ok(()) => delivered += 1,
                Err(error) => warn!(session_code, %error, "dropping frame for unreachable viewer"),
            }
        }
        delivered
    }

    /// Number of viewers currently connected to a session.
    #[must_use]
    pub fn connection_count(&self, session_code: &str) -> usize {
        self.bucket(session_code)
            .map_or(0, |bucket| bucket.lock().connections.len())
    }

    /// Number of sessions with at least one viewer.
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
