//! Remote endpoint seam: wire types for the checkpoint exchange, the
//! [`Remote`] trait the engine calls, and the HTTP implementation.
//!
//! Request signing, bearer tokens and 401-triggered refresh live outside this
//! crate; callers needing them hand [`HttpRemote::with_client`] a
//! preconfigured `reqwest::Client`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SyncError;
use crate::mapper::{ProjectDto, TaskDto};

/// One collection's outgoing delta: full DTOs for creates and updates, bare
/// ids for deletes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChangeSet<T> {
    pub add: Vec<T>,
    pub update: Vec<T>,
    pub delete: Vec<String>,
}

// Manual impl: the derive would demand `T: Default`, which the engine's
// generic partitioning has no reason to require.
impl<T> Default for ChangeSet<T> {
    fn default() -> Self {
        Self {
            add: Vec::new(),
            update: Vec::new(),
            delete: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Changes {
    pub tasks: ChangeSet<TaskDto>,
    pub projects: ChangeSet<ProjectDto>,
}

/// Body of `POST /sync`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRequest {
    pub check_point: i64,
    pub changes: Changes,
}

/// Rows the server has changed since the echoed checkpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Updates {
    pub tasks: Vec<TaskDto>,
    pub projects: Vec<ProjectDto>,
}

/// Response of `POST /sync`. A missing `checkPoint` means no cursor
/// progress; the engine reuses the prior one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SyncResponse {
    pub check_point: Option<i64>,
    pub updates: Updates,
}

/// The transport seam of the sync engine. One round trip: upload the local
/// delta, receive the server's delta and the new checkpoint.
#[async_trait]
pub trait Remote: Send + Sync {
    async fn exchange(&self, request: SyncRequest) -> Result<SyncResponse, SyncError>;
}

/// Payload for the direct project CRUD endpoints (used outside the sync
/// cycle, when the caller wants a server-assigned timestamp immediately).
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub color: String,
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

/// A project as returned by the CRUD endpoints. `server_update_time` becomes
/// the local `modified_time` when mirrored via
/// [`SyncDb::mirror_project`](crate::SyncDb::mirror_project).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectResponse {
    pub id: String,
    pub name: String,
    pub sort_order: i64,
    pub color: String,
    pub kind: String,
    pub parent_id: String,
    pub is_deleted: bool,
    pub server_update_time: i64,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListProjectsParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_deleted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ProjectListBody {
    #[serde(default)]
    items: Vec<ProjectResponse>,
}

/// HTTP implementation of the remote surface.
pub struct HttpRemote {
    base_url: String,
    client: reqwest::Client,
}

impl HttpRemote {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    /// Use a caller-supplied client (auth middleware, custom timeouts).
    pub fn with_client(base_url: &str, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn list_projects(
        &self,
        params: ListProjectsParams,
    ) -> Result<Vec<ProjectResponse>, SyncError> {
        let response = self
            .client
            .get(self.url("/projects"))
            .query(&params)
            .send()
            .await?;
        let body: ProjectListBody = check(response).await?.json().await?;
        Ok(body.items)
    }

    pub async fn create_project(
        &self,
        payload: &ProjectPayload,
    ) -> Result<ProjectResponse, SyncError> {
        let response = self
            .client
            .post(self.url("/projects"))
            .json(payload)
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    pub async fn update_project(
        &self,
        id: &str,
        payload: &ProjectPayload,
    ) -> Result<ProjectResponse, SyncError> {
        let response = self
            .client
            .put(self.url(&format!("/projects/{id}")))
            .json(payload)
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    pub async fn delete_project(&self, id: &str) -> Result<(), SyncError> {
        let response = self
            .client
            .delete(self.url(&format!("/projects/{id}")))
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }
}

#[async_trait]
impl Remote for HttpRemote {
    async fn exchange(&self, request: SyncRequest) -> Result<SyncResponse, SyncError> {
        let response = self
            .client
            .post(self.url("/sync"))
            .json(&request)
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }
}

async fn check(response: reqwest::Response) -> Result<reqwest::Response, SyncError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(SyncError::Transport(format!("{status}: {body}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_shape() {
        let request = SyncRequest {
            check_point: 7,
            changes: Changes {
                tasks: ChangeSet {
                    delete: vec!["t9".into()],
                    ..Default::default()
                },
                projects: ChangeSet::default(),
            },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["checkPoint"], 7);
        assert_eq!(json["changes"]["tasks"]["delete"][0], "t9");
        assert!(json["changes"]["projects"]["add"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_change_set_default_has_no_element_bound() {
        // Element types carried on the wire need not implement Default.
        struct Bare;
        let changes: ChangeSet<Bare> = ChangeSet::default();
        assert!(changes.add.is_empty() && changes.update.is_empty() && changes.delete.is_empty());
    }

    #[test]
    fn test_response_tolerates_missing_fields() {
        // No checkPoint, no updates at all.
        let response: SyncResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response.check_point, None);
        assert!(response.updates.tasks.is_empty());

        // Partial updates object.
        let response: SyncResponse =
            serde_json::from_str(r#"{"checkPoint": 3, "updates": {"tasks": [{"id": "t1"}]}}"#)
                .unwrap();
        assert_eq!(response.check_point, Some(3));
        assert_eq!(response.updates.tasks.len(), 1);
        assert!(response.updates.projects.is_empty());
    }
}
