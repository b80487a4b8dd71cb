//! Local entity definitions for the two synced collections and the sync
//! metadata table.
//!
//! Rows carry one field the server never sees: `sync_status`, a TEXT column
//! recording *why* the row is dirty. It is stored as a plain string and
//! converted through [`SyncStatus`] rather than a typed column, so the schema
//! stays readable from any SQLite tool.

use serde::{Deserialize, Serialize};

pub mod project;
pub mod sync_meta;
pub mod task;

/// Why a local row is out of sync with the server.
///
/// Transitions only ever move toward [`Synced`](SyncStatus::Synced) on upload
/// acknowledgment; a local mutation moves a synced row back to
/// [`Updated`](SyncStatus::Updated). [`Deleted`](SyncStatus::Deleted) is
/// terminal locally: a tombstoned row never becomes `Created` or `Updated`
/// again before the server confirms the delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncStatus {
    /// The server has acknowledged this row in its current form.
    #[default]
    Synced,
    /// Created locally, never uploaded.
    Created,
    /// Modified locally since the last acknowledgment.
    Updated,
    /// Tombstoned locally; the delete has not propagated yet.
    Deleted,
}

impl SyncStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SyncStatus::Synced => "synced",
            SyncStatus::Created => "created",
            SyncStatus::Updated => "updated",
            SyncStatus::Deleted => "deleted",
        }
    }

    /// Parse a stored status string. Unknown values read as `Synced`, which
    /// keeps a row with a corrupt status out of the upload set instead of
    /// re-sending it forever.
    pub fn parse(s: &str) -> SyncStatus {
        match s {
            "created" => SyncStatus::Created,
            "updated" => SyncStatus::Updated,
            "deleted" => SyncStatus::Deleted,
            _ => SyncStatus::Synced,
        }
    }
}

/// One entry of a task's ordered checklist, stored (and sent over the wire)
/// as a JSON array in the task's `items` column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChecklistItem {
    pub id: String,
    pub title: String,
    pub completed: bool,
    pub sort_order: i64,
}

impl Default for ChecklistItem {
    fn default() -> Self {
        Self {
            id: String::new(),
            title: String::new(),
            completed: false,
            sort_order: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips() {
        for status in [
            SyncStatus::Synced,
            SyncStatus::Created,
            SyncStatus::Updated,
            SyncStatus::Deleted,
        ] {
            assert_eq!(SyncStatus::parse(status.as_str()), status);
        }
    }

    #[test]
    fn test_unknown_status_reads_as_synced() {
        assert_eq!(SyncStatus::parse("garbage"), SyncStatus::Synced);
        assert_eq!(SyncStatus::parse(""), SyncStatus::Synced);
    }

    #[test]
    fn test_checklist_item_wire_shape() {
        let item = ChecklistItem {
            id: "i1".into(),
            title: "step one".into(),
            completed: true,
            sort_order: 3,
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["sortOrder"], 3);
        assert_eq!(json["completed"], true);
    }
}
