//! # ticksync
//!
//! Offline-first sync engine for a local-first task manager.
//!
//! ticksync keeps a full replica of the user's tasks and projects in a local
//! SQLite database (via [`SyncDb`]) and reconciles it with a remote server
//! through a periodic, debounced, checkpoint-based protocol. Local writes
//! always succeed immediately and mark the row dirty; the [`SyncScheduler`]
//! later drives a [`SyncEngine`] cycle that uploads the dirty rows, merges the
//! server's delta back with last-write-wins conflict resolution, and advances
//! the checkpoint cursor — all inside one atomic local transaction.
//!
//! ## Quick start
//!
//! ```ignore
//! use std::sync::Arc;
//! use ticksync::{HttpRemote, SchedulerConfig, SyncDbBuilder, SyncEngine, SyncScheduler, TaskDraft};
//!
//! let db = SyncDbBuilder::new("sqlite:./app.db?mode=rwc").build().await?;
//! let remote = Arc::new(HttpRemote::new("https://api.example.com"));
//! let scheduler = SyncScheduler::spawn(
//!     SyncEngine::new(db.clone(), remote),
//!     SchedulerConfig::default(),
//! );
//!
//! // Local writes succeed immediately; the scheduler syncs them later.
//! db.create_task(TaskDraft::new("inbox", "Buy milk")).await?;
//! scheduler.notify_mutation();
//! ```
//!
//! ## Key types
//!
//! - [`SyncDb`] / [`SyncDbBuilder`] — the local entity store (tasks, projects,
//!   sync metadata) and its transaction primitive
//! - [`SyncEngine`] — one `sync_once()` exchange-and-merge cycle
//! - [`SyncScheduler`] / [`SchedulerHandle`] — debounce/interval/online
//!   triggers, at most one cycle in flight
//! - [`Remote`] — the transport seam; [`HttpRemote`] is the HTTP implementation

pub mod entity;
pub mod error;
pub mod mapper;
pub mod remote;
pub mod scheduler;
pub mod store;
pub mod sync;

pub use entity::{ChecklistItem, SyncStatus};
pub use error::SyncError;
pub use mapper::{ProjectDto, TaskDto};
pub use remote::{
    ChangeSet, Changes, HttpRemote, ListProjectsParams, ProjectPayload, ProjectResponse, Remote,
    SyncRequest, SyncResponse, Updates,
};
pub use scheduler::{SchedulerConfig, SchedulerHandle, SyncScheduler, SyncState};
pub use store::{ProjectDraft, ProjectPatch, SyncDb, SyncDbBuilder, TaskDraft, TaskPatch};
pub use sync::{SyncEngine, SyncReport};

// Re-export sea-orm for users of the library
pub use sea_orm;
