//! The `sync_meta` key/value table.
//!
//! Values are JSON-encoded so the table can hold the checkpoint cursor
//! (under [`CHECKPOINT_KEY`](crate::store::CHECKPOINT_KEY)) next to whatever
//! else an embedding app wants to stash.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "sync_meta")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub key: String,
    /// JSON-encoded value.
    pub value: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
