//! The sync cycle: upload the dirty rows, merge the server's delta back,
//! advance the checkpoint.
//!
//! [`SyncEngine::sync_once`] is idempotent and safe to call repeatedly; the
//! scheduler guarantees at most one call is in flight. A cycle that fails —
//! transport or store — commits nothing: the pending rows stay dirty and the
//! next trigger retries from scratch.

use std::collections::HashSet;
use std::sync::Arc;

use crate::entity::{SyncStatus, task};
use crate::error::SyncError;
use crate::mapper;
use crate::remote::{ChangeSet, Changes, Remote, SyncRequest};
use crate::store::{self, SyncDb};

/// Counts from one completed cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    /// Rows in the pending set that were sent (creates + updates + deletes).
    pub uploaded: usize,
    /// Rows the server returned in `updates`.
    pub downloaded: usize,
    /// The checkpoint after the cycle.
    pub check_point: i64,
}

pub struct SyncEngine {
    db: SyncDb,
    remote: Arc<dyn Remote>,
}

impl SyncEngine {
    pub fn new(db: SyncDb, remote: Arc<dyn Remote>) -> Self {
        Self { db, remote }
    }

    pub fn db(&self) -> &SyncDb {
        &self.db
    }

    /// Run one exchange-and-merge cycle.
    ///
    /// 1. Read the checkpoint (`0` when the meta row is absent).
    /// 2. Select the pending set: rows whose `sync_status` is not `synced`.
    /// 3. Short-circuit: nothing pending and a checkpoint row exists — no
    ///    network round trip. Without a checkpoint row the exchange always
    ///    runs, so a fresh replica pulls the server's initial snapshot.
    /// 4. Partition pending rows into add/update/delete and exchange.
    /// 5. Merge, inside one transaction spanning both collections and the
    ///    meta table: apply incoming rows under last-write-wins (a strictly
    ///    newer local `modified_time` wins, the server wins ties), then mark
    ///    the pending rows the server did not echo back as `synced` — unless
    ///    they were edited again while the request was in flight — and
    ///    persist the new checkpoint last.
    pub async fn sync_once(&self) -> Result<SyncReport, SyncError> {
        let stored = self.db.checkpoint().await?;
        let check_point = stored.unwrap_or(0);

        let tasks = self.db.tasks().await?;
        let projects = self.db.projects().await?;

        let pending_tasks: Vec<task::Model> = tasks
            .into_iter()
            .filter(|t| SyncStatus::parse(&t.sync_status) != SyncStatus::Synced)
            .collect();
        let pending_projects: Vec<crate::entity::project::Model> = projects
            .into_iter()
            .filter(|p| SyncStatus::parse(&p.sync_status) != SyncStatus::Synced)
            .collect();

        if pending_tasks.is_empty() && pending_projects.is_empty() && stored.is_some() {
            log::debug!("sync: nothing pending at checkpoint {check_point}, skipping exchange");
            return Ok(SyncReport {
                uploaded: 0,
                downloaded: 0,
                check_point,
            });
        }

        // Fixed snapshot of the pending set, taken before the exchange. Rows
        // mutated during the round trip get a newer modified_time and are
        // left dirty by the acknowledgment below.
        let task_snapshot: Vec<(String, i64)> = pending_tasks
            .iter()
            .map(|t| (t.id.clone(), t.modified_time))
            .collect();
        let project_snapshot: Vec<(String, i64)> = pending_projects
            .iter()
            .map(|p| (p.id.clone(), p.modified_time))
            .collect();
        let uploaded = pending_tasks.len() + pending_projects.len();

        let request = SyncRequest {
            check_point,
            changes: Changes {
                tasks: split_changes(
                    &pending_tasks,
                    |t| SyncStatus::parse(&t.sync_status),
                    |t| t.id.clone(),
                    mapper::task_to_api,
                ),
                projects: split_changes(
                    &pending_projects,
                    |p| SyncStatus::parse(&p.sync_status),
                    |p| p.id.clone(),
                    mapper::project_to_api,
                ),
            },
        };

        log::debug!("sync: exchanging {uploaded} pending rows at checkpoint {check_point}");
        let response = self.remote.exchange(request).await?;

        let new_check_point = response.check_point.unwrap_or(check_point);
        let updates = response.updates;
        let downloaded = updates.tasks.len() + updates.projects.len();
        let fallback_tz = self.db.time_zone().to_string();

        self.db
            .transaction(move |txn| {
                Box::pin(async move {
                    // Rows freshly written from server data this cycle; the
                    // acknowledgment pass must not touch them again.
                    let mut fresh_tasks: HashSet<String> = HashSet::new();
                    let mut fresh_projects: HashSet<String> = HashSet::new();

                    for dto in &updates.tasks {
                        let incoming = mapper::task_from_api(dto, &fallback_tz);
                        if let Some(local) = store::get_task(txn, &incoming.id).await?
                            && local.modified_time > incoming.modified_time
                        {
                            log::debug!(
                                "sync: local task {} wins ({} > {})",
                                incoming.id,
                                local.modified_time,
                                incoming.modified_time
                            );
                            continue;
                        }
                        fresh_tasks.insert(incoming.id.clone());
                        store::put_task(txn, incoming).await?;
                    }

                    for dto in &updates.projects {
                        let incoming = mapper::project_from_api(dto);
                        if let Some(local) = store::get_project(txn, &incoming.id).await?
                            && local.modified_time > incoming.modified_time
                        {
                            log::debug!(
                                "sync: local project {} wins ({} > {})",
                                incoming.id,
                                local.modified_time,
                                incoming.modified_time
                            );
                            continue;
                        }
                        fresh_projects.insert(incoming.id.clone());
                        store::put_project(txn, incoming).await?;
                    }

                    for (id, snap_time) in &task_snapshot {
                        if fresh_tasks.contains(id) {
                            continue;
                        }
                        store::mark_task_synced_if_unchanged(txn, id, *snap_time).await?;
                    }
                    for (id, snap_time) in &project_snapshot {
                        if fresh_projects.contains(id) {
                            continue;
                        }
                        store::mark_project_synced_if_unchanged(txn, id, *snap_time).await?;
                    }

                    store::set_checkpoint(txn, new_check_point).await?;
                    Ok(())
                })
            })
            .await?;

        log::info!(
            "sync: cycle done, uploaded {uploaded}, downloaded {downloaded}, checkpoint {new_check_point}"
        );
        Ok(SyncReport {
            uploaded,
            downloaded,
            check_point: new_check_point,
        })
    }
}

/// Partition pending rows by status: `created → add`, `deleted → delete`
/// (ids only), everything else `→ update`.
fn split_changes<M, D>(
    rows: &[M],
    status: impl Fn(&M) -> SyncStatus,
    id: impl Fn(&M) -> String,
    to_api: impl Fn(&M) -> D,
) -> ChangeSet<D> {
    let mut changes = ChangeSet::default();
    for row in rows {
        match status(row) {
            SyncStatus::Created => changes.add.push(to_api(row)),
            SyncStatus::Deleted => changes.delete.push(id(row)),
            _ => changes.update.push(to_api(row)),
        }
    }
    changes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending(id: &str, status: SyncStatus) -> task::Model {
        task::Model {
            id: id.into(),
            project_id: String::new(),
            title: id.into(),
            content: String::new(),
            status: 0,
            priority: 0,
            progress: 0,
            is_all_day: false,
            time_zone: "UTC".into(),
            start_date: None,
            due_date: None,
            tags: "[]".into(),
            items: "[]".into(),
            is_deleted: status == SyncStatus::Deleted,
            modified_time: 1,
            sync_status: status.as_str().into(),
        }
    }

    #[test]
    fn test_split_changes_partitions_by_status() {
        let rows = vec![
            pending("a", SyncStatus::Created),
            pending("b", SyncStatus::Updated),
            pending("c", SyncStatus::Deleted),
            pending("d", SyncStatus::Created),
        ];
        let changes = split_changes(
            &rows,
            |t| SyncStatus::parse(&t.sync_status),
            |t| t.id.clone(),
            mapper::task_to_api,
        );
        assert_eq!(changes.add.len(), 2);
        assert_eq!(changes.update.len(), 1);
        assert_eq!(changes.delete, vec!["c".to_string()]);
        assert_eq!(changes.add[0].id, "a");
        assert_eq!(changes.update[0].id, "b");
    }
}
