//! Integration tests for the HTTP client layer against a mock NAS.

use serde_json::json;
use synodl::{Config, Error, SynoClient, TaskCreator};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(server: &MockServer) -> Config {
    let uri = server.uri();
    let host = uri
        .strip_prefix("http://")
        .expect("mock server uri is http")
        .to_string();
    Config {
        host,
        scheme: "http".to_string(),
        username: "admin".to_string(),
        password: "hunter2".to_string(),
        timeout_secs: 5,
    }
}

async fn mock_login(server: &MockServer, sid: &str) {
    Mock::given(method("GET"))
        .and(path("/webapi/auth.cgi"))
        .and(query_param("method", "login"))
        .and(query_param("account", "admin"))
        .and(query_param("passwd", "hunter2"))
        .and(query_param("session", "DownloadStation"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": { "sid": sid }
            })),
        )
        .mount(server)
        .await;
}

async fn logged_in_client(server: &MockServer) -> SynoClient {
    mock_login(server, "SID123").await;
    let mut client = SynoClient::new(&test_config(server)).unwrap();
    client.login().await.unwrap();
    client
}

#[tokio::test]
async fn login_stores_sid_and_attaches_it_to_requests() {
    let server = MockServer::start().await;
    let client = logged_in_client(&server).await;
    assert!(client.is_logged_in());

    // The list call must carry the sid from login
    Mock::given(method("GET"))
        .and(path("/webapi/DownloadStation/task.cgi"))
        .and(query_param("method", "list"))
        .and(query_param("_sid", "SID123"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": { "tasks": [] }
            })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let tasks = client.list_tasks().await.unwrap();
    assert!(tasks.is_empty());
}

#[tokio::test]
async fn login_failure_decodes_auth_error_code() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/webapi/auth.cgi"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "error": { "code": 400 }
            })),
        )
        .mount(&server)
        .await;

    let mut client = SynoClient::new(&test_config(&server)).unwrap();
    let err = client.login().await.unwrap_err();
    assert!(
        err.to_string()
            .contains("(400) No such account or incorrect password"),
        "{err}"
    );
    assert!(!client.is_logged_in());
}

#[tokio::test]
async fn http_error_status_is_surfaced() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/webapi/auth.cgi"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let mut client = SynoClient::new(&test_config(&server)).unwrap();
    let err = client.login().await.unwrap_err();
    assert!(matches!(err, Error::Http(status) if status.as_u16() == 503));
}

#[tokio::test]
async fn list_tasks_decodes_typed_payload() {
    let server = MockServer::start().await;
    let client = logged_in_client(&server).await;

    Mock::given(method("GET"))
        .and(path("/webapi/DownloadStation/task.cgi"))
        .and(query_param("method", "list"))
        .and(query_param("additional", "transfer,detail"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {
                    "tasks": [{
                        "id": "dbid_101",
                        "type": "bt",
                        "size": 1_500_000_000i64,
                        "status": "downloading",
                        "title": "some.release",
                        "username": "admin",
                        "additional": {
                            "transfer": { "size_downloaded": 750_000_000i64, "speed_download": 1_048_576 },
                            "detail": { "destination": "downloads", "uri": "magnet:?xt=urn:btih:abc" }
                        }
                    }]
                }
            })),
        )
        .mount(&server)
        .await;

    let tasks = client.list_tasks().await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, "dbid_101");
    assert_eq!(tasks[0].additional.transfer.speed_download, 1_048_576);
    assert_eq!(tasks[0].additional.detail.destination, "downloads");
}

#[tokio::test]
async fn get_task_errors_when_id_absent() {
    let server = MockServer::start().await;
    let client = logged_in_client(&server).await;

    Mock::given(method("GET"))
        .and(path("/webapi/DownloadStation/task.cgi"))
        .and(query_param("method", "getinfo"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": { "tasks": [] }
            })),
        )
        .mount(&server)
        .await;

    let err = client.get_task("dbid_404").await.unwrap_err();
    assert!(matches!(err, Error::TaskNotFound(id) if id == "dbid_404"));
}

#[tokio::test]
async fn create_task_passes_source_as_uri() {
    let server = MockServer::start().await;
    let client = logged_in_client(&server).await;

    Mock::given(method("GET"))
        .and(path("/webapi/DownloadStation/task.cgi"))
        .and(query_param("method", "create"))
        .and(query_param("uri", "magnet:?xt=urn:btih:abc"))
        .and(query_param("_sid", "SID123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    client.create_task("magnet:?xt=urn:btih:abc").await.unwrap();
}

#[tokio::test]
async fn create_task_failure_decodes_download_station_code() {
    let server = MockServer::start().await;
    let client = logged_in_client(&server).await;

    Mock::given(method("GET"))
        .and(path("/webapi/DownloadStation/task.cgi"))
        .and(query_param("method", "create"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "error": { "code": 401 }
            })),
        )
        .mount(&server)
        .await;

    let err = client.create_task("magnet:x").await.unwrap_err();
    assert!(
        err.to_string().contains("(401) Max number of tasks reached"),
        "{err}"
    );
}

#[tokio::test]
async fn delete_reports_per_id_outcomes() {
    let server = MockServer::start().await;
    let client = logged_in_client(&server).await;

    // The envelope is success: true even when individual ids fail
    Mock::given(method("GET"))
        .and(path("/webapi/DownloadStation/task.cgi"))
        .and(query_param("method", "delete"))
        .and(query_param("id", "dbid_1,dbid_2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": [
                    { "id": "dbid_1", "error": 0 },
                    { "id": "dbid_2", "error": 544 }
                ]
            })),
        )
        .mount(&server)
        .await;

    let results = client.delete_tasks("dbid_1,dbid_2").await.unwrap();
    assert_eq!(results.len(), 2);
    assert!(results[0].is_ok());
    assert!(!results[1].is_ok());
    assert_eq!(results[1].failure_reason().as_deref(), Some("(544)"));
}

#[tokio::test]
async fn rename_returns_new_path() {
    let server = MockServer::start().await;
    let client = logged_in_client(&server).await;

    Mock::given(method("GET"))
        .and(path("/webapi/entry.cgi"))
        .and(query_param("api", "SYNO.FileStation.Rename"))
        .and(query_param("name", "new.iso"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": { "files": [{ "path": "/downloads/new.iso" }] }
            })),
        )
        .mount(&server)
        .await;

    let new_path = client.rename_file("/downloads/old.iso", "new.iso").await.unwrap();
    assert_eq!(new_path, "/downloads/new.iso");
}

#[tokio::test]
async fn rename_failure_decodes_nested_operation_code() {
    let server = MockServer::start().await;
    let client = logged_in_client(&server).await;

    Mock::given(method("GET"))
        .and(path("/webapi/entry.cgi"))
        .and(query_param("api", "SYNO.FileStation.Rename"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "error": {
                    "code": 1200,
                    "errors": [{ "code": 414 }]
                }
            })),
        )
        .mount(&server)
        .await;

    let err = client.rename_file("/downloads/old.iso", "new.iso").await.unwrap_err();
    let message = err.to_string();
    assert!(message.contains("Failed to rename file"), "{message}");
    assert!(message.contains("File already exists"), "{message}");
}

#[tokio::test]
async fn move_file_issues_copymove_start() {
    let server = MockServer::start().await;
    let client = logged_in_client(&server).await;

    Mock::given(method("GET"))
        .and(path("/webapi/entry.cgi"))
        .and(query_param("api", "SYNO.FileStation.CopyMove"))
        .and(query_param("method", "start"))
        .and(query_param("path", "/downloads/file.iso"))
        .and(query_param("dest_folder_path", "/archive"))
        .and(query_param("remove_src", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    client.move_file("/downloads/file.iso", "/archive").await.unwrap();
}

#[tokio::test]
async fn logout_ends_the_session() {
    let server = MockServer::start().await;
    let client = logged_in_client(&server).await;

    Mock::given(method("GET"))
        .and(path("/webapi/auth.cgi"))
        .and(query_param("method", "logout"))
        .and(query_param("_sid", "SID123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    client.logout().await.unwrap();
}
