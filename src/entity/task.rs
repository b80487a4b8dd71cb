//! The `tasks` collection.
//!
//! `tags` and `items` hold JSON-encoded arrays (`Vec<String>` and
//! `Vec<ChecklistItem>` respectively); the mapper decodes them at the wire
//! boundary. `project_id` may be the empty string, meaning "unfiled".

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tasks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub project_id: String,
    pub title: String,
    pub content: String,
    pub status: i32,
    pub priority: i32,
    pub progress: i32,
    pub is_all_day: bool,
    pub time_zone: String,
    pub start_date: Option<i64>,
    pub due_date: Option<i64>,
    /// JSON array of label strings.
    pub tags: String,
    /// JSON array of [`ChecklistItem`](crate::ChecklistItem)s.
    pub items: String,
    pub is_deleted: bool,
    /// Epoch milliseconds of the last local or server-confirmed mutation.
    /// The sole timestamp used for conflict resolution.
    pub modified_time: i64,
    /// Local-only dirty marker, see [`SyncStatus`](crate::SyncStatus).
    pub sync_status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
