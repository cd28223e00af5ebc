// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

mod blacklist;
mod members;
mod persistence;
mod queries;
mod rides;
mod schema;

pub use blacklist::{delete_temporary_for_ndr, insert_entry, list_entries};
pub use members::{get_member, list_members, upsert_member};
pub use persistence::{PersistReceipt, persist_transition};
pub use queries::{
    get_active_ndr, get_audit_event, get_audit_timeline, get_ndr, list_ndrs_by_status, load_state,
};
pub use rides::{get_rides_for_ndr, insert_ride};
pub use schema::initialize_schema;
