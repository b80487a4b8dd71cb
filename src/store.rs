//! Local entity store: a SQLite-backed replica of the user's tasks and
//! projects plus the sync cursor.
//!
//! [`SyncDb`] wraps a SeaORM [`DatabaseConnection`] and exposes typed CRUD for
//! the two collections. Every local write stamps `modified_time` and advances
//! `sync_status`, so the sync engine can later select the dirty rows without
//! the store knowing anything about the protocol. The one concurrency
//! guarantee the store itself provides is the [`transaction`](SyncDb::transaction)
//! primitive: a group of writes across both collections and the meta table
//! commits atomically or not at all, and readers never observe a partial
//! state mid-transaction.

use std::future::Future;
use std::pin::Pin;

use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, ConnectOptions, ConnectionTrait, Database, DatabaseConnection,
    DatabaseTransaction, EntityTrait, IntoActiveModel, Iterable, QueryFilter, TransactionTrait,
};
use uuid::Uuid;

use crate::entity::{ChecklistItem, SyncStatus, project, sync_meta, task};
use crate::error::SyncError;
use crate::remote::ProjectResponse;

/// Meta key under which the sync checkpoint is stored.
pub const CHECKPOINT_KEY: &str = "checkPoint";

/// Default project color for new projects.
pub const DEFAULT_PROJECT_COLOR: &str = "#c2e7ff";

/// Current wall-clock time in epoch milliseconds.
pub(crate) fn now_ms() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

const CREATE_TASKS: &str = "CREATE TABLE IF NOT EXISTS tasks (
    id TEXT PRIMARY KEY NOT NULL,
    project_id TEXT NOT NULL,
    title TEXT NOT NULL,
    content TEXT NOT NULL,
    status INTEGER NOT NULL,
    priority INTEGER NOT NULL,
    progress INTEGER NOT NULL,
    is_all_day INTEGER NOT NULL,
    time_zone TEXT NOT NULL,
    start_date INTEGER,
    due_date INTEGER,
    tags TEXT NOT NULL,
    items TEXT NOT NULL,
    is_deleted INTEGER NOT NULL,
    modified_time INTEGER NOT NULL,
    sync_status TEXT NOT NULL
)";

const CREATE_PROJECTS: &str = "CREATE TABLE IF NOT EXISTS projects (
    id TEXT PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    sort_order INTEGER NOT NULL,
    color TEXT NOT NULL,
    kind TEXT NOT NULL,
    parent_id TEXT NOT NULL,
    is_deleted INTEGER NOT NULL,
    modified_time INTEGER NOT NULL,
    sync_status TEXT NOT NULL
)";

const CREATE_SYNC_META: &str = "CREATE TABLE IF NOT EXISTS sync_meta (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL
)";

const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_tasks_sync_status ON tasks (sync_status)",
    "CREATE INDEX IF NOT EXISTS idx_tasks_is_deleted ON tasks (is_deleted)",
    "CREATE INDEX IF NOT EXISTS idx_tasks_modified_time ON tasks (modified_time)",
    "CREATE INDEX IF NOT EXISTS idx_tasks_project_id ON tasks (project_id)",
    "CREATE INDEX IF NOT EXISTS idx_tasks_due_date ON tasks (due_date)",
    "CREATE INDEX IF NOT EXISTS idx_projects_sync_status ON projects (sync_status)",
    "CREATE INDEX IF NOT EXISTS idx_projects_is_deleted ON projects (is_deleted)",
    "CREATE INDEX IF NOT EXISTS idx_projects_modified_time ON projects (modified_time)",
];

/// Builder for [`SyncDb`].
pub struct SyncDbBuilder {
    database_url: String,
    time_zone: String,
}

impl SyncDbBuilder {
    pub fn new(url: &str) -> Self {
        Self {
            database_url: url.to_string(),
            time_zone: "UTC".to_string(),
        }
    }

    /// IANA zone name used for new tasks and for defaulting server rows that
    /// arrive without one. A library has no ambient "device zone", so the
    /// embedding app passes its own here.
    pub fn with_time_zone(mut self, tz: &str) -> Self {
        self.time_zone = tz.to_string();
        self
    }

    /// Connect and create the tables and indexes if they do not exist yet.
    pub async fn build(self) -> Result<SyncDb, SyncError> {
        let opts = ConnectOptions::new(&self.database_url);
        let conn = Database::connect(opts).await?;

        conn.execute_unprepared(CREATE_TASKS).await?;
        conn.execute_unprepared(CREATE_PROJECTS).await?;
        conn.execute_unprepared(CREATE_SYNC_META).await?;
        for ddl in CREATE_INDEXES {
            conn.execute_unprepared(ddl).await?;
        }

        Ok(SyncDb {
            conn,
            time_zone: self.time_zone,
        })
    }
}

/// Handle to the local store. Cheap to clone; all clones share one
/// connection pool.
#[derive(Clone)]
pub struct SyncDb {
    conn: DatabaseConnection,
    time_zone: String,
}

impl SyncDb {
    /// The underlying SeaORM connection, for callers that need raw access.
    pub fn conn(&self) -> &DatabaseConnection {
        &self.conn
    }

    /// The zone configured on the builder.
    pub fn time_zone(&self) -> &str {
        &self.time_zone
    }

    /// Run a group of writes as one atomic unit. All succeed or all roll
    /// back; concurrent readers never see a partial state.
    pub async fn transaction<F, T>(&self, callback: F) -> Result<T, SyncError>
    where
        F: for<'c> FnOnce(
                &'c DatabaseTransaction,
            )
                -> Pin<Box<dyn Future<Output = Result<T, SyncError>> + Send + 'c>>
            + Send,
        T: Send,
    {
        Ok(self.conn.transaction::<F, T, SyncError>(callback).await?)
    }

    // ---- tasks ----

    /// Create a task locally with `sync_status = created`. The id is
    /// client-generated (UUID v4) unless the draft carries one.
    pub async fn create_task(&self, draft: TaskDraft) -> Result<task::Model, SyncError> {
        let row = draft.into_model(now_ms(), &self.time_zone)?;
        put_task(&self.conn, row.clone()).await?;
        Ok(row)
    }

    pub async fn task(&self, id: &str) -> Result<Option<task::Model>, SyncError> {
        get_task(&self.conn, id).await
    }

    /// Full-collection read, tombstones included.
    pub async fn tasks(&self) -> Result<Vec<task::Model>, SyncError> {
        Ok(task::Entity::find().all(&self.conn).await?)
    }

    /// Apply a partial update. Only the fields set on the patch change;
    /// `modified_time` is restamped and `sync_status` advances
    /// (`created` stays `created`, `deleted` stays `deleted`, anything else
    /// becomes `updated`).
    pub async fn update_task(&self, id: &str, patch: TaskPatch) -> Result<task::Model, SyncError> {
        let mut row = get_task(&self.conn, id)
            .await?
            .ok_or_else(|| SyncError::NotFound(id.to_string()))?;
        patch.apply(&mut row, now_ms())?;
        put_task(&self.conn, row.clone()).await?;
        Ok(row)
    }

    /// Soft delete: the row becomes a tombstone (`is_deleted = true`,
    /// `sync_status = deleted`) and keeps its content for a late upload.
    pub async fn delete_task(&self, id: &str) -> Result<(), SyncError> {
        let mut row = get_task(&self.conn, id)
            .await?
            .ok_or_else(|| SyncError::NotFound(id.to_string()))?;
        row.is_deleted = true;
        row.sync_status = SyncStatus::Deleted.as_str().to_string();
        row.modified_time = now_ms();
        put_task(&self.conn, row).await
    }

    // ---- projects ----

    pub async fn create_project(&self, draft: ProjectDraft) -> Result<project::Model, SyncError> {
        let row = draft.into_model(now_ms());
        put_project(&self.conn, row.clone()).await?;
        Ok(row)
    }

    pub async fn project(&self, id: &str) -> Result<Option<project::Model>, SyncError> {
        get_project(&self.conn, id).await
    }

    pub async fn projects(&self) -> Result<Vec<project::Model>, SyncError> {
        Ok(project::Entity::find().all(&self.conn).await?)
    }

    pub async fn update_project(
        &self,
        id: &str,
        patch: ProjectPatch,
    ) -> Result<project::Model, SyncError> {
        let mut row = get_project(&self.conn, id)
            .await?
            .ok_or_else(|| SyncError::NotFound(id.to_string()))?;
        patch.apply(&mut row, now_ms());
        put_project(&self.conn, row.clone()).await?;
        Ok(row)
    }

    pub async fn delete_project(&self, id: &str) -> Result<(), SyncError> {
        let mut row = get_project(&self.conn, id)
            .await?
            .ok_or_else(|| SyncError::NotFound(id.to_string()))?;
        row.is_deleted = true;
        row.sync_status = SyncStatus::Deleted.as_str().to_string();
        row.modified_time = now_ms();
        put_project(&self.conn, row).await
    }

    /// Mirror a project DTO returned by the remote CRUD endpoints into the
    /// local store as already-synced state. The server-assigned
    /// `serverUpdateTime` becomes the row's `modified_time`, so a later sync
    /// cycle compares against the server's own clock.
    pub async fn mirror_project(&self, resp: &ProjectResponse) -> Result<project::Model, SyncError> {
        let row = project::Model {
            id: resp.id.clone(),
            name: resp.name.clone(),
            sort_order: resp.sort_order,
            color: resp.color.clone(),
            kind: resp.kind.clone(),
            parent_id: resp.parent_id.clone(),
            is_deleted: resp.is_deleted,
            modified_time: resp.server_update_time,
            sync_status: SyncStatus::Synced.as_str().to_string(),
        };
        put_project(&self.conn, row.clone()).await?;
        Ok(row)
    }

    // ---- meta / maintenance ----

    /// The stored checkpoint cursor. `None` means the meta row is absent
    /// (never synced) — distinct from a stored `0`.
    pub async fn checkpoint(&self) -> Result<Option<i64>, SyncError> {
        get_checkpoint(&self.conn).await
    }

    /// Physically remove tombstones the server has already confirmed
    /// (`is_deleted` and `sync_status = synced`). Returns the number of rows
    /// removed. This is the only path that deletes rows outside [`reset`](SyncDb::reset).
    pub async fn purge_synced_tombstones(&self) -> Result<u64, SyncError> {
        let synced = SyncStatus::Synced.as_str();
        let tasks = task::Entity::delete_many()
            .filter(task::Column::IsDeleted.eq(true))
            .filter(task::Column::SyncStatus.eq(synced))
            .exec(&self.conn)
            .await?;
        let projects = project::Entity::delete_many()
            .filter(project::Column::IsDeleted.eq(true))
            .filter(project::Column::SyncStatus.eq(synced))
            .exec(&self.conn)
            .await?;
        Ok(tasks.rows_affected + projects.rows_affected)
    }

    /// Clear all three tables (the logout path). The next cycle starts from
    /// checkpoint 0 and pulls the server's full snapshot again.
    pub async fn reset(&self) -> Result<(), SyncError> {
        self.transaction(|txn| {
            Box::pin(async move {
                task::Entity::delete_many().exec(txn).await?;
                project::Entity::delete_many().exec(txn).await?;
                sync_meta::Entity::delete_many().exec(txn).await?;
                Ok(())
            })
        })
        .await
    }
}

// ---- row-level helpers, generic over connection so the merge transaction
// can reuse them ----

pub(crate) async fn get_task<C: ConnectionTrait>(
    conn: &C,
    id: &str,
) -> Result<Option<task::Model>, SyncError> {
    Ok(task::Entity::find_by_id(id).one(conn).await?)
}

pub(crate) async fn put_task<C: ConnectionTrait>(
    conn: &C,
    row: task::Model,
) -> Result<(), SyncError> {
    task::Entity::insert(row.into_active_model())
        .on_conflict(
            OnConflict::column(task::Column::Id)
                .update_columns(task::Column::iter().filter(|c| !matches!(c, task::Column::Id)))
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;
    Ok(())
}

pub(crate) async fn get_project<C: ConnectionTrait>(
    conn: &C,
    id: &str,
) -> Result<Option<project::Model>, SyncError> {
    Ok(project::Entity::find_by_id(id).one(conn).await?)
}

pub(crate) async fn put_project<C: ConnectionTrait>(
    conn: &C,
    row: project::Model,
) -> Result<(), SyncError> {
    project::Entity::insert(row.into_active_model())
        .on_conflict(
            OnConflict::column(project::Column::Id)
                .update_columns(
                    project::Column::iter().filter(|c| !matches!(c, project::Column::Id)),
                )
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;
    Ok(())
}

/// Acknowledge an upload: set `sync_status = synced`, but only if the row's
/// `modified_time` still matches the snapshot taken before the exchange. A
/// row edited while the request was in flight keeps its new dirty status.
pub(crate) async fn mark_task_synced_if_unchanged<C: ConnectionTrait>(
    conn: &C,
    id: &str,
    snapshot_modified_time: i64,
) -> Result<(), SyncError> {
    task::Entity::update_many()
        .col_expr(
            task::Column::SyncStatus,
            Expr::value(SyncStatus::Synced.as_str()),
        )
        .filter(task::Column::Id.eq(id))
        .filter(task::Column::ModifiedTime.eq(snapshot_modified_time))
        .exec(conn)
        .await?;
    Ok(())
}

pub(crate) async fn mark_project_synced_if_unchanged<C: ConnectionTrait>(
    conn: &C,
    id: &str,
    snapshot_modified_time: i64,
) -> Result<(), SyncError> {
    project::Entity::update_many()
        .col_expr(
            project::Column::SyncStatus,
            Expr::value(SyncStatus::Synced.as_str()),
        )
        .filter(project::Column::Id.eq(id))
        .filter(project::Column::ModifiedTime.eq(snapshot_modified_time))
        .exec(conn)
        .await?;
    Ok(())
}

pub(crate) async fn get_checkpoint<C: ConnectionTrait>(
    conn: &C,
) -> Result<Option<i64>, SyncError> {
    let row = sync_meta::Entity::find_by_id(CHECKPOINT_KEY).one(conn).await?;
    Ok(row.and_then(|m| serde_json::from_str::<i64>(&m.value).ok()))
}

pub(crate) async fn set_checkpoint<C: ConnectionTrait>(
    conn: &C,
    check_point: i64,
) -> Result<(), SyncError> {
    let row = sync_meta::Model {
        key: CHECKPOINT_KEY.to_string(),
        value: serde_json::to_string(&check_point)?,
    };
    sync_meta::Entity::insert(row.into_active_model())
        .on_conflict(
            OnConflict::column(sync_meta::Column::Key)
                .update_column(sync_meta::Column::Value)
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;
    Ok(())
}

/// A local mutation advances the status without ever regressing a tombstone
/// or forgetting that a row was never uploaded.
fn dirtied(current: &str) -> SyncStatus {
    match SyncStatus::parse(current) {
        SyncStatus::Created => SyncStatus::Created,
        SyncStatus::Deleted => SyncStatus::Deleted,
        _ => SyncStatus::Updated,
    }
}

/// Input for [`SyncDb::create_task`]. Required fields up front, everything
/// else defaults the way the original client seeds a new task.
#[derive(Debug, Clone)]
pub struct TaskDraft {
    id: Option<String>,
    project_id: String,
    title: String,
    content: String,
    status: i32,
    priority: i32,
    is_all_day: bool,
    time_zone: Option<String>,
    start_date: Option<i64>,
    due_date: Option<i64>,
    tags: Vec<String>,
    items: Vec<ChecklistItem>,
}

impl TaskDraft {
    pub fn new(project_id: &str, title: &str) -> Self {
        Self {
            id: None,
            project_id: project_id.to_string(),
            title: title.to_string(),
            content: String::new(),
            status: 0,
            priority: 0,
            is_all_day: false,
            time_zone: None,
            start_date: None,
            due_date: None,
            tags: Vec::new(),
            items: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_content(mut self, content: &str) -> Self {
        self.content = content.to_string();
        self
    }

    pub fn with_status(mut self, status: i32) -> Self {
        self.status = status;
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_all_day(mut self, all_day: bool) -> Self {
        self.is_all_day = all_day;
        self
    }

    pub fn with_time_zone(mut self, tz: &str) -> Self {
        self.time_zone = Some(tz.to_string());
        self
    }

    pub fn with_start_date(mut self, epoch_ms: i64) -> Self {
        self.start_date = Some(epoch_ms);
        self
    }

    pub fn with_due_date(mut self, epoch_ms: i64) -> Self {
        self.due_date = Some(epoch_ms);
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_items(mut self, items: Vec<ChecklistItem>) -> Self {
        self.items = items;
        self
    }

    fn into_model(self, now: i64, default_tz: &str) -> Result<task::Model, SyncError> {
        Ok(task::Model {
            id: self.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            project_id: self.project_id,
            title: self.title,
            content: self.content,
            status: self.status,
            priority: self.priority,
            progress: 0,
            is_all_day: self.is_all_day,
            time_zone: self.time_zone.unwrap_or_else(|| default_tz.to_string()),
            start_date: self.start_date,
            due_date: self.due_date,
            tags: serde_json::to_string(&self.tags)?,
            items: serde_json::to_string(&self.items)?,
            is_deleted: false,
            modified_time: now,
            sync_status: SyncStatus::Created.as_str().to_string(),
        })
    }
}

/// Input for [`SyncDb::create_project`].
#[derive(Debug, Clone)]
pub struct ProjectDraft {
    id: Option<String>,
    name: String,
    color: String,
    kind: String,
    parent_id: String,
    sort_order: Option<i64>,
}

impl ProjectDraft {
    pub fn new(name: &str) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            color: DEFAULT_PROJECT_COLOR.to_string(),
            kind: "list".to_string(),
            parent_id: String::new(),
            sort_order: None,
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_color(mut self, color: &str) -> Self {
        self.color = color.to_string();
        self
    }

    pub fn with_kind(mut self, kind: &str) -> Self {
        self.kind = kind.to_string();
        self
    }

    pub fn with_parent(mut self, parent_id: &str) -> Self {
        self.parent_id = parent_id.to_string();
        self
    }

    pub fn with_sort_order(mut self, sort_order: i64) -> Self {
        self.sort_order = Some(sort_order);
        self
    }

    fn into_model(self, now: i64) -> project::Model {
        project::Model {
            id: self.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            name: self.name,
            // New projects sort to the end; creation time is a monotonic
            // enough default, same as the original client.
            sort_order: self.sort_order.unwrap_or(now),
            color: self.color,
            kind: self.kind,
            parent_id: self.parent_id,
            is_deleted: false,
            modified_time: now,
            sync_status: SyncStatus::Created.as_str().to_string(),
        }
    }
}

/// Explicit partial update for a task. Only the fields set here change;
/// applying a patch always restamps `modified_time` and advances
/// `sync_status`.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    title: Option<String>,
    content: Option<String>,
    project_id: Option<String>,
    status: Option<i32>,
    priority: Option<i32>,
    progress: Option<i32>,
    is_all_day: Option<bool>,
    time_zone: Option<String>,
    start_date: Option<Option<i64>>,
    due_date: Option<Option<i64>>,
    tags: Option<Vec<String>>,
    items: Option<Vec<ChecklistItem>>,
}

impl TaskPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn content(mut self, content: &str) -> Self {
        self.content = Some(content.to_string());
        self
    }

    pub fn project_id(mut self, project_id: &str) -> Self {
        self.project_id = Some(project_id.to_string());
        self
    }

    pub fn status(mut self, status: i32) -> Self {
        self.status = Some(status);
        self
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn progress(mut self, progress: i32) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn all_day(mut self, all_day: bool) -> Self {
        self.is_all_day = Some(all_day);
        self
    }

    pub fn time_zone(mut self, tz: &str) -> Self {
        self.time_zone = Some(tz.to_string());
        self
    }

    /// `None` clears the date (open-ended range).
    pub fn start_date(mut self, epoch_ms: Option<i64>) -> Self {
        self.start_date = Some(epoch_ms);
        self
    }

    /// `None` clears the date.
    pub fn due_date(mut self, epoch_ms: Option<i64>) -> Self {
        self.due_date = Some(epoch_ms);
        self
    }

    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }

    pub fn items(mut self, items: Vec<ChecklistItem>) -> Self {
        self.items = Some(items);
        self
    }

    fn apply(&self, row: &mut task::Model, now: i64) -> Result<(), SyncError> {
        if let Some(v) = &self.title {
            row.title = v.clone();
        }
        if let Some(v) = &self.content {
            row.content = v.clone();
        }
        if let Some(v) = &self.project_id {
            row.project_id = v.clone();
        }
        if let Some(v) = self.status {
            row.status = v;
        }
        if let Some(v) = self.priority {
            row.priority = v;
        }
        if let Some(v) = self.progress {
            row.progress = v;
        }
        if let Some(v) = self.is_all_day {
            row.is_all_day = v;
        }
        if let Some(v) = &self.time_zone {
            row.time_zone = v.clone();
        }
        if let Some(v) = self.start_date {
            row.start_date = v;
        }
        if let Some(v) = self.due_date {
            row.due_date = v;
        }
        if let Some(v) = &self.tags {
            row.tags = serde_json::to_string(v)?;
        }
        if let Some(v) = &self.items {
            row.items = serde_json::to_string(v)?;
        }
        row.modified_time = now;
        row.sync_status = dirtied(&row.sync_status).as_str().to_string();
        Ok(())
    }
}

/// Explicit partial update for a project.
#[derive(Debug, Clone, Default)]
pub struct ProjectPatch {
    name: Option<String>,
    color: Option<String>,
    kind: Option<String>,
    parent_id: Option<String>,
    sort_order: Option<i64>,
}

impl ProjectPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn color(mut self, color: &str) -> Self {
        self.color = Some(color.to_string());
        self
    }

    pub fn kind(mut self, kind: &str) -> Self {
        self.kind = Some(kind.to_string());
        self
    }

    pub fn parent_id(mut self, parent_id: &str) -> Self {
        self.parent_id = Some(parent_id.to_string());
        self
    }

    pub fn sort_order(mut self, sort_order: i64) -> Self {
        self.sort_order = Some(sort_order);
        self
    }

    fn apply(&self, row: &mut project::Model, now: i64) {
        if let Some(v) = &self.name {
            row.name = v.clone();
        }
        if let Some(v) = &self.color {
            row.color = v.clone();
        }
        if let Some(v) = &self.kind {
            row.kind = v.clone();
        }
        if let Some(v) = &self.parent_id {
            row.parent_id = v.clone();
        }
        if let Some(v) = self.sort_order {
            row.sort_order = v;
        }
        row.modified_time = now;
        row.sync_status = dirtied(&row.sync_status).as_str().to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_task(sync_status: SyncStatus) -> task::Model {
        task::Model {
            id: "t1".into(),
            project_id: "p1".into(),
            title: "old title".into(),
            content: String::new(),
            status: 0,
            priority: 0,
            progress: 0,
            is_all_day: false,
            time_zone: "UTC".into(),
            start_date: None,
            due_date: Some(1000),
            tags: "[]".into(),
            items: "[]".into(),
            is_deleted: false,
            modified_time: 100,
            sync_status: sync_status.as_str().into(),
        }
    }

    #[test]
    fn test_patch_only_touches_set_fields() {
        let mut row = sample_task(SyncStatus::Synced);
        TaskPatch::new().title("new title").apply(&mut row, 200).unwrap();
        assert_eq!(row.title, "new title");
        assert_eq!(row.project_id, "p1");
        assert_eq!(row.due_date, Some(1000));
    }

    #[test]
    fn test_patch_always_stamps_time_and_status() {
        let mut row = sample_task(SyncStatus::Synced);
        TaskPatch::new().apply(&mut row, 200).unwrap();
        assert_eq!(row.modified_time, 200);
        assert_eq!(row.sync_status, "updated");
    }

    #[test]
    fn test_patch_keeps_created_created() {
        let mut row = sample_task(SyncStatus::Created);
        TaskPatch::new().title("x").apply(&mut row, 200).unwrap();
        assert_eq!(row.sync_status, "created");
    }

    #[test]
    fn test_patch_never_regresses_deleted() {
        let mut row = sample_task(SyncStatus::Deleted);
        TaskPatch::new().title("x").apply(&mut row, 200).unwrap();
        assert_eq!(row.sync_status, "deleted");
    }

    #[test]
    fn test_patch_clears_due_date() {
        let mut row = sample_task(SyncStatus::Synced);
        TaskPatch::new().due_date(None).apply(&mut row, 200).unwrap();
        assert_eq!(row.due_date, None);
    }

    #[test]
    fn test_task_draft_defaults() {
        let row = TaskDraft::new("p1", "Buy milk")
            .into_model(123, "Europe/Berlin")
            .unwrap();
        assert_eq!(row.sync_status, "created");
        assert_eq!(row.modified_time, 123);
        assert_eq!(row.time_zone, "Europe/Berlin");
        assert_eq!(row.tags, "[]");
        assert!(!row.is_deleted);
        assert!(!row.id.is_empty());
    }

    #[test]
    fn test_project_draft_defaults() {
        let row = ProjectDraft::new("Inbox").into_model(456);
        assert_eq!(row.color, DEFAULT_PROJECT_COLOR);
        assert_eq!(row.kind, "list");
        assert_eq!(row.sort_order, 456);
        assert_eq!(row.sync_status, "created");
    }
}
