// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Debounced persistence of the assignment editor document.
//!
//! Drag-and-drop edits arrive far faster than they are worth persisting.
//! The editor marks the document dirty on every edit; this task flushes
//! it once the edits go quiet for the debounce window, and the server
//! performs a final flush on shutdown so the last window is never lost.
//!
//! Coalescing is a write-rate optimization, not a correctness mechanism:
//! concurrent editors remain last-write-wins.

use std::sync::Arc;
use tokio::sync::{Mutex, Notify, broadcast};
use tokio::time::{Duration, sleep};
use tracing::{error, info};

use saferide_api::{AuthenticatedActor, UpdateAssignmentsRequest, update_assignments};
use saferide_audit::Cause;
use saferide_persistence::SqlitePersistence;

use crate::live::{self, LiveEvent};

/// How long edits must stay quiet before the document is flushed.
pub const DEBOUNCE: Duration = Duration::from_secs(2);

/// One not-yet-persisted assignment editor state.
///
/// Later edits replace earlier ones wholesale; the document is a full
/// snapshot, not a delta.
pub struct PendingEdit {
    /// The full replacement document.
    pub request: UpdateAssignmentsRequest,
    /// Who made the edit.
    pub actor: AuthenticatedActor,
    /// Why (the originating request).
    pub cause: Cause,
}

struct Inner {
    pending: Option<PendingEdit>,
    version: u64,
}

/// The debounced autosave service.
///
/// One instance serves the whole process; `run` is spawned once at
/// startup and `flush` is called a final time on shutdown.
pub struct AssignmentAutosave {
    inner: Mutex<Inner>,
    wakeup: Notify,
    persistence: Arc<Mutex<SqlitePersistence>>,
    live: broadcast::Sender<LiveEvent>,
}

impl AssignmentAutosave {
    /// Creates the autosave service.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The shared persistence layer
    /// * `live` - The live event channel to announce flushes on
    #[must_use]
    pub fn new(
        persistence: Arc<Mutex<SqlitePersistence>>,
        live: broadcast::Sender<LiveEvent>,
    ) -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(Inner {
                pending: None,
                version: 0,
            }),
            wakeup: Notify::new(),
            persistence,
            live,
        })
    }

    /// Records an edit and restarts the debounce window.
    pub async fn mark_dirty(&self, edit: PendingEdit) {
        let mut inner = self.inner.lock().await;
        inner.pending = Some(edit);
        inner.version += 1;
        drop(inner);
        self.wakeup.notify_one();
    }

    /// Runs the flush loop. Spawned once; never returns.
    pub async fn run(self: Arc<Self>) {
        loop {
            self.wakeup.notified().await;
            loop {
                let version: u64 = self.inner.lock().await.version;
                sleep(DEBOUNCE).await;
                let settled: bool = self.inner.lock().await.version == version;
                if settled {
                    self.flush().await;
                    break;
                }
            }
        }
    }

    /// Flushes the pending document, if any.
    ///
    /// Flush failures are logged and the edit is dropped; the next edit
    /// will carry the full document again.
    pub async fn flush(&self) {
        let edit: Option<PendingEdit> = self.inner.lock().await.pending.take();
        let Some(edit) = edit else {
            return;
        };

        let persistence = self.persistence.lock().await;
        let state = match persistence.load_state() {
            Ok(state) => state,
            Err(e) => {
                error!(error = %e, "Autosave could not load state; edit dropped");
                return;
            }
        };
        drop(persistence);

        match update_assignments(&state, edit.request, &edit.actor, edit.cause) {
            Ok(result) => {
                let mut persistence = self.persistence.lock().await;
                match persistence.persist_transition(&result.transition()) {
                    Ok(receipt) => {
                        info!(
                            ndr_id = %result.response.ndr_id,
                            event_id = receipt.event_id,
                            "Flushed assignment edits"
                        );
                        live::publish(
                            &self.live,
                            LiveEvent::AssignmentsUpdated {
                                ndr_id: result.response.ndr_id.clone(),
                            },
                        );
                    }
                    Err(e) => {
                        error!(error = %e, "Autosave flush failed; edit dropped");
                    }
                }
            }
            Err(e) => {
                // The NDR ended (or was archived) while the edit sat in
                // the window; the document is view-only now.
                error!(error = %e, "Stale assignment edit dropped");
            }
        }
    }
}
