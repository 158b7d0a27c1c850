//! Download Station task operations: list, info, create, delete, pause, resume.
//!
//! All payloads are decoded into typed structs at this boundary; callers never
//! see raw JSON. Task creation is additionally exposed through the
//! [`TaskCreator`] trait so the submission pipeline can be driven by a mock
//! in tests.

use crate::client::{SynoClient, TASK_CGI};
use crate::error::{ApiScope, Error, Result, describe_code};
use async_trait::async_trait;
use serde::Deserialize;

/// One download task as reported by `SYNO.DownloadStation.Task`
#[derive(Clone, Debug, Deserialize)]
pub struct DownloadTask {
    /// Task id, e.g. "dbid_123"
    pub id: String,
    /// Task type ("bt", "http", "ftp", ...)
    #[serde(rename = "type")]
    pub task_type: String,
    /// Total size in bytes (0 while the task is still resolving)
    pub size: i64,
    /// Status string ("downloading", "paused", "finished", ...)
    pub status: String,
    /// Display title
    pub title: String,
    /// Owning account
    pub username: String,
    /// Transfer and detail info requested via `additional=transfer,detail`
    #[serde(default)]
    pub additional: TaskAdditional,
}

/// Additional task info blocks
#[derive(Clone, Debug, Default, Deserialize)]
pub struct TaskAdditional {
    /// Transfer progress
    #[serde(default)]
    pub transfer: TaskTransfer,
    /// Static task detail
    #[serde(default)]
    pub detail: TaskDetail,
}

/// Transfer progress for one task
#[derive(Clone, Debug, Default, Deserialize)]
pub struct TaskTransfer {
    /// Bytes downloaded so far
    #[serde(default)]
    pub size_downloaded: i64,
    /// Current download speed in bytes per second
    #[serde(default)]
    pub speed_download: i64,
}

/// Static detail for one task
#[derive(Clone, Debug, Default, Deserialize)]
pub struct TaskDetail {
    /// Destination share/folder on the NAS
    #[serde(default)]
    pub destination: String,
    /// Original source URI
    #[serde(default)]
    pub uri: String,
}

/// Per-id outcome of a batch delete/pause/resume call.
///
/// These calls always answer `success: true` at the envelope level and report
/// failures per id inside the payload.
#[derive(Clone, Debug, Deserialize)]
pub struct ActionResult {
    /// Task id the action applied to
    pub id: String,
    /// Remote error code, 0 on success
    pub error: i64,
}

impl ActionResult {
    /// Whether the action succeeded for this id
    pub fn is_ok(&self) -> bool {
        self.error == 0
    }

    /// Decoded failure reason, or `None` when the action succeeded.
    ///
    /// Known codes render as `(code) reason`, unknown ones as the bare code.
    pub fn failure_reason(&self) -> Option<String> {
        if self.is_ok() {
            return None;
        }
        Some(match describe_code(ApiScope::DownloadStation, self.error) {
            Some(text) => format!("({}) {}", self.error, text),
            None => format!("({})", self.error),
        })
    }
}

/// The remote task-creation operation, as seen by the submission pipeline.
///
/// The pipeline only distinguishes success from failure; interpreting remote
/// error codes happens behind this seam.
#[async_trait]
pub trait TaskCreator: Send + Sync {
    /// Create one download task from a source URI or file path.
    async fn create_task(&self, uri: &str) -> Result<()>;
}

#[async_trait]
impl TaskCreator for SynoClient {
    async fn create_task(&self, uri: &str) -> Result<()> {
        self.call(
            TASK_CGI,
            ApiScope::DownloadStation,
            &[
                ("api", "SYNO.DownloadStation.Task"),
                ("version", "1"),
                ("method", "create"),
                ("uri", uri),
            ],
        )
        .await?;
        Ok(())
    }
}

/// Payload of `list` and `getinfo` responses
#[derive(Debug, Deserialize)]
struct TaskListData {
    tasks: Vec<DownloadTask>,
}

impl SynoClient {
    /// List all download tasks with transfer and detail info.
    pub async fn list_tasks(&self) -> Result<Vec<DownloadTask>> {
        let data: TaskListData = self
            .call_data(
                TASK_CGI,
                ApiScope::DownloadStation,
                &[
                    ("api", "SYNO.DownloadStation.Task"),
                    ("version", "1"),
                    ("method", "list"),
                    ("additional", "transfer,detail"),
                ],
            )
            .await?;
        Ok(data.tasks)
    }

    /// Fetch info for specific task ids (comma-separated).
    pub async fn get_tasks(&self, ids: &str) -> Result<Vec<DownloadTask>> {
        let data: TaskListData = self
            .call_data(
                TASK_CGI,
                ApiScope::DownloadStation,
                &[
                    ("api", "SYNO.DownloadStation.Task"),
                    ("version", "1"),
                    ("method", "getinfo"),
                    // the API accepts multiple ids separated by comma
                    ("id", ids),
                    ("additional", "transfer,detail"),
                ],
            )
            .await?;
        Ok(data.tasks)
    }

    /// Fetch exactly one task by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TaskNotFound`] when the id is absent from the
    /// response.
    pub async fn get_task(&self, id: &str) -> Result<DownloadTask> {
        let tasks = self.get_tasks(id).await?;
        tasks
            .into_iter()
            .find(|task| task.id == id)
            .ok_or_else(|| Error::TaskNotFound(id.to_string()))
    }

    /// Delete tasks by id (comma-separated), returning per-id outcomes.
    pub async fn delete_tasks(&self, ids: &str) -> Result<Vec<ActionResult>> {
        self.task_action("delete", ids).await
    }

    /// Pause tasks by id (comma-separated), returning per-id outcomes.
    pub async fn pause_tasks(&self, ids: &str) -> Result<Vec<ActionResult>> {
        self.task_action("pause", ids).await
    }

    /// Resume tasks by id (comma-separated), returning per-id outcomes.
    pub async fn resume_tasks(&self, ids: &str) -> Result<Vec<ActionResult>> {
        self.task_action("resume", ids).await
    }

    async fn task_action(&self, method: &str, ids: &str) -> Result<Vec<ActionResult>> {
        self.call_data(
            TASK_CGI,
            ApiScope::DownloadStation,
            &[
                ("api", "SYNO.DownloadStation.Task"),
                ("version", "1"),
                ("method", method),
                ("id", ids),
            ],
        )
        .await
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_result_success_has_no_reason() {
        let result = ActionResult {
            id: "dbid_1".to_string(),
            error: 0,
        };
        assert!(result.is_ok());
        assert_eq!(result.failure_reason(), None);
    }

    #[test]
    fn action_result_known_code_decodes() {
        let result = ActionResult {
            id: "dbid_1".to_string(),
            error: 404,
        };
        assert_eq!(
            result.failure_reason().as_deref(),
            Some("(404) Invalid task id")
        );
    }

    #[test]
    fn action_result_unknown_code_stays_numeric() {
        let result = ActionResult {
            id: "dbid_1".to_string(),
            error: 544,
        };
        assert_eq!(result.failure_reason().as_deref(), Some("(544)"));
    }

    #[test]
    fn task_json_decodes_with_additional_blocks() {
        let json = serde_json::json!({
            "id": "dbid_42",
            "type": "bt",
            "size": 1_500_000_000i64,
            "status": "downloading",
            "title": "some.release",
            "username": "admin",
            "additional": {
                "transfer": { "size_downloaded": 750_000_000i64, "speed_download": 1_000_000 },
                "detail": { "destination": "downloads", "uri": "magnet:?xt=urn:btih:abc" }
            }
        });

        let task: DownloadTask = serde_json::from_value(json).unwrap();
        assert_eq!(task.task_type, "bt");
        assert_eq!(task.additional.transfer.size_downloaded, 750_000_000);
        assert_eq!(task.additional.detail.destination, "downloads");
    }
}
