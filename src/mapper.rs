//! DTO ⇄ local-row conversion.
//!
//! Pure functions, no I/O. `*_to_api` strips the local-only `sync_status`
//! field and decodes the JSON columns; `*_from_api` is total — every field of
//! the local shape gets a documented default when the DTO omits it, and the
//! result is always marked `synced`.

use serde::{Deserialize, Serialize};

use crate::entity::{ChecklistItem, SyncStatus, project, task};
use crate::store::now_ms;

/// Wire shape of a task: the local shape minus `syncStatus`. Every field
/// except `id` is optional on the way in, so a partial server payload still
/// maps to a complete local row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskDto {
    pub id: String,
    pub project_id: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub status: Option<i32>,
    pub priority: Option<i32>,
    pub progress: Option<i32>,
    pub is_all_day: Option<bool>,
    pub time_zone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<i64>,
    pub tags: Option<Vec<String>>,
    pub items: Option<Vec<ChecklistItem>>,
    pub is_deleted: Option<bool>,
    pub modified_time: Option<i64>,
}

/// Wire shape of a project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectDto {
    pub id: String,
    pub name: Option<String>,
    pub sort_order: Option<i64>,
    pub color: Option<String>,
    pub kind: Option<String>,
    pub parent_id: Option<String>,
    pub is_deleted: Option<bool>,
    pub modified_time: Option<i64>,
}

/// Local task row → wire DTO. Rows written by the store always hold valid
/// JSON in `tags`/`items`; anything unreadable decodes to an empty list
/// rather than failing the upload.
pub fn task_to_api(row: &task::Model) -> TaskDto {
    TaskDto {
        id: row.id.clone(),
        project_id: Some(row.project_id.clone()),
        title: Some(row.title.clone()),
        content: Some(row.content.clone()),
        status: Some(row.status),
        priority: Some(row.priority),
        progress: Some(row.progress),
        is_all_day: Some(row.is_all_day),
        time_zone: Some(row.time_zone.clone()),
        start_date: row.start_date,
        due_date: row.due_date,
        tags: Some(serde_json::from_str(&row.tags).unwrap_or_default()),
        items: Some(serde_json::from_str(&row.items).unwrap_or_default()),
        is_deleted: Some(row.is_deleted),
        modified_time: Some(row.modified_time),
    }
}

/// Wire DTO → local task row, `sync_status = synced`. `fallback_tz` fills an
/// absent `timeZone`; an absent `modifiedTime` defaults to now.
pub fn task_from_api(dto: &TaskDto, fallback_tz: &str) -> task::Model {
    task::Model {
        id: dto.id.clone(),
        project_id: dto.project_id.clone().unwrap_or_default(),
        title: dto.title.clone().unwrap_or_default(),
        content: dto.content.clone().unwrap_or_default(),
        status: dto.status.unwrap_or(0),
        priority: dto.priority.unwrap_or(0),
        progress: dto.progress.unwrap_or(0),
        is_all_day: dto.is_all_day.unwrap_or(false),
        time_zone: dto
            .time_zone
            .clone()
            .unwrap_or_else(|| fallback_tz.to_string()),
        start_date: dto.start_date,
        due_date: dto.due_date,
        tags: encode(dto.tags.as_deref().unwrap_or_default()),
        items: encode(dto.items.as_deref().unwrap_or_default()),
        is_deleted: dto.is_deleted.unwrap_or(false),
        modified_time: dto.modified_time.unwrap_or_else(now_ms),
        sync_status: SyncStatus::Synced.as_str().to_string(),
    }
}

pub fn project_to_api(row: &project::Model) -> ProjectDto {
    ProjectDto {
        id: row.id.clone(),
        name: Some(row.name.clone()),
        sort_order: Some(row.sort_order),
        color: Some(row.color.clone()),
        kind: Some(row.kind.clone()),
        parent_id: Some(row.parent_id.clone()),
        is_deleted: Some(row.is_deleted),
        modified_time: Some(row.modified_time),
    }
}

pub fn project_from_api(dto: &ProjectDto) -> project::Model {
    project::Model {
        id: dto.id.clone(),
        name: dto.name.clone().unwrap_or_default(),
        sort_order: dto.sort_order.unwrap_or_else(now_ms),
        color: dto
            .color
            .clone()
            .unwrap_or_else(|| crate::store::DEFAULT_PROJECT_COLOR.to_string()),
        kind: dto.kind.clone().unwrap_or_else(|| "list".to_string()),
        parent_id: dto.parent_id.clone().unwrap_or_default(),
        is_deleted: dto.is_deleted.unwrap_or(false),
        modified_time: dto.modified_time.unwrap_or_else(now_ms),
        sync_status: SyncStatus::Synced.as_str().to_string(),
    }
}

fn encode<T: Serialize>(value: &[T]) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_api_is_total_on_bare_dto() {
        // Only an id — every other field must come out defined.
        let dto = TaskDto {
            id: "t1".into(),
            ..Default::default()
        };
        let row = task_from_api(&dto, "Asia/Tokyo");
        assert_eq!(row.id, "t1");
        assert_eq!(row.title, "");
        assert_eq!(row.status, 0);
        assert_eq!(row.priority, 0);
        assert_eq!(row.progress, 0);
        assert!(!row.is_all_day);
        assert_eq!(row.time_zone, "Asia/Tokyo");
        assert_eq!(row.tags, "[]");
        assert_eq!(row.items, "[]");
        assert!(!row.is_deleted);
        assert!(row.modified_time > 0);
        assert_eq!(row.sync_status, "synced");
    }

    #[test]
    fn test_from_api_always_marks_synced() {
        let dto = TaskDto {
            id: "t1".into(),
            modified_time: Some(42),
            ..Default::default()
        };
        let row = task_from_api(&dto, "UTC");
        assert_eq!(row.sync_status, "synced");
        assert_eq!(row.modified_time, 42);
    }

    #[test]
    fn test_to_api_has_no_sync_status_field() {
        let dto = TaskDto {
            id: "t1".into(),
            ..Default::default()
        };
        let mut row = task_from_api(&dto, "UTC");
        row.sync_status = "updated".into();
        let json = serde_json::to_value(task_to_api(&row)).unwrap();
        assert!(json.get("syncStatus").is_none());
        assert!(json.get("sync_status").is_none());
        assert_eq!(json["id"], "t1");
    }

    #[test]
    fn test_round_trip_preserves_fields() {
        let dto = TaskDto {
            id: "t1".into(),
            project_id: Some("p1".into()),
            title: Some("Buy milk".into()),
            due_date: Some(1234),
            tags: Some(vec!["home".into(), "errand".into()]),
            items: Some(vec![ChecklistItem {
                id: "i1".into(),
                title: "pay".into(),
                completed: false,
                sort_order: 1,
            }]),
            modified_time: Some(99),
            ..Default::default()
        };
        let row = task_from_api(&dto, "UTC");
        let back = task_to_api(&row);
        assert_eq!(back.title.as_deref(), Some("Buy milk"));
        assert_eq!(back.due_date, Some(1234));
        assert_eq!(back.tags.as_ref().unwrap().len(), 2);
        assert_eq!(back.items.as_ref().unwrap()[0].id, "i1");
        assert_eq!(back.modified_time, Some(99));
    }

    #[test]
    fn test_project_from_api_defaults() {
        let dto = ProjectDto {
            id: "p1".into(),
            ..Default::default()
        };
        let row = project_from_api(&dto);
        assert_eq!(row.name, "");
        assert_eq!(row.kind, "list");
        assert_eq!(row.color, crate::store::DEFAULT_PROJECT_COLOR);
        assert_eq!(row.parent_id, "");
        assert_eq!(row.sync_status, "synced");
        assert!(row.sort_order > 0);
    }
}
