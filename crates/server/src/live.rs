// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Live state streaming support for dispatch dashboards.
//!
//! This module provides read-only, non-authoritative state change
//! notifications via WebSocket connections. Events represent facts about
//! what changed in the canonical state, not directives or domain logic.
//!
//! # Architecture
//!
//! - Events are broadcast to all connected clients
//! - Events are informational only and never authoritative
//! - No commands are executed over WebSocket connections
//! - No audit events are emitted for streaming activity
//! - Clients must still query canonical state via HTTP APIs for
//!   authoritative data

use axum::{
    extract::{
        WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
};
use futures::{SinkExt, stream::StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Maximum number of events to buffer in the broadcast channel.
/// If clients cannot keep up, older events will be dropped.
const EVENT_BUFFER_SIZE: usize = 100;

/// Live state event types.
///
/// These events represent changes to canonical state and are purely
/// informational. They are derived from successful state transitions,
/// not the source of truth.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LiveEvent {
    /// A pending NDR was created.
    NdrCreated {
        /// The NDR id.
        ndr_id: String,
    },
    /// An NDR became active.
    NdrActivated {
        /// The NDR id.
        ndr_id: String,
    },
    /// The active NDR ended.
    NdrEnded {
        /// The NDR id.
        ndr_id: String,
        /// Rides completed this night.
        completed_rides: u32,
        /// Riders delivered this night.
        completed_riders: u32,
    },
    /// A completed NDR was archived.
    NdrArchived {
        /// The NDR id.
        ndr_id: String,
    },
    /// The assignment map or notes changed.
    AssignmentsUpdated {
        /// The NDR id.
        ndr_id: String,
    },
    /// A phone-in ride was logged.
    RideLogged {
        /// The owning NDR id.
        ndr_id: String,
        /// The ride id.
        ride_id: String,
    },
}

/// Creates the broadcast channel live events flow through.
///
/// The receiver half is dropped; subscribers come and go per WebSocket
/// connection via `Sender::subscribe`.
#[must_use]
pub fn channel() -> broadcast::Sender<LiveEvent> {
    broadcast::channel(EVENT_BUFFER_SIZE).0
}

/// Publishes a live event, ignoring the no-subscribers case.
pub fn publish(tx: &broadcast::Sender<LiveEvent>, event: LiveEvent) {
    // send only fails when no client is connected, which is fine
    if tx.send(event.clone()).is_ok() {
        debug!(?event, "Published live event");
    }
}

/// Upgrades an HTTP request to a live event stream.
pub fn upgrade(ws: WebSocketUpgrade, tx: broadcast::Sender<LiveEvent>) -> Response {
    ws.on_upgrade(move |socket| stream_events(socket, tx))
}

/// Forwards broadcast events to one WebSocket client until it leaves.
async fn stream_events(socket: WebSocket, tx: broadcast::Sender<LiveEvent>) {
    let mut rx: broadcast::Receiver<LiveEvent> = tx.subscribe();
    let (mut sink, mut stream) = socket.split();

    debug!("Live client connected");

    loop {
        tokio::select! {
            event = rx.recv() => {
                match event {
                    Ok(event) => {
                        let payload: String = match serde_json::to_string(&event) {
                            Ok(payload) => payload,
                            Err(e) => {
                                warn!(error = %e, "Failed to serialize live event");
                                continue;
                            }
                        };
                        if sink.send(Message::Text(payload.into())).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Live client lagged; events dropped");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            inbound = stream.next() => {
                match inbound {
                    // Clients never send commands; only close is meaningful.
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    debug!("Live client disconnected");
}
