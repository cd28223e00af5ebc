// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Serde shapes for the JSON payload columns.
//!
//! Audit actor/cause/action/snapshot values are stored as JSON text so
//! the audit table never needs a migration when their fields grow.

use serde::{Deserialize, Serialize};

/// JSON shape of an audit actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorData {
    /// The actor id.
    pub id: String,
    /// The actor type.
    pub actor_type: String,
}

/// JSON shape of an audit cause.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CauseData {
    /// The cause id.
    pub id: String,
    /// The cause description.
    pub description: String,
}

/// JSON shape of an audit action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionData {
    /// The action name.
    pub name: String,
    /// Optional action details.
    pub details: Option<String>,
}

/// JSON shape of an audit state snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshotData {
    /// The snapshot rendering.
    pub data: String,
}
