//! The `projects` collection: a container for tasks (`kind = "list"`) or a
//! notes container (`kind = "note"`).

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub sort_order: i64,
    pub color: String,
    pub kind: String,
    pub parent_id: String,
    pub is_deleted: bool,
    pub modified_time: i64,
    /// Local-only dirty marker, see [`SyncStatus`](crate::SyncStatus).
    pub sync_status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
