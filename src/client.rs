//! HTTP/JSON plumbing and session management for the Synology web API.
//!
//! [`SynoClient`] owns the `reqwest` client, builds query-parameter requests
//! against the NAS `webapi` endpoints, and decodes the common
//! `{ success, data, error }` response envelope once, so the rest of the
//! crate only ever sees typed payloads or typed errors.

use crate::config::Config;
use crate::error::{ApiScope, Error, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

/// Authentication endpoint
pub(crate) const AUTH_CGI: &str = "webapi/auth.cgi";
/// Download Station task endpoint
pub(crate) const TASK_CGI: &str = "webapi/DownloadStation/task.cgi";
/// File Station entry endpoint
pub(crate) const ENTRY_CGI: &str = "webapi/entry.cgi";

/// Session name registered with the auth API
const SESSION_NAME: &str = "DownloadStation";

/// Common response envelope shared by every Synology web API call
#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    success: bool,
    #[serde(default)]
    data: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<ApiErrorBody>,
}

/// Error block of a failed envelope
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: i64,
    /// File Station responses nest per-operation errors here
    #[serde(default)]
    errors: Vec<NestedError>,
}

#[derive(Debug, Deserialize)]
struct NestedError {
    code: i64,
}

/// Payload of a successful login
#[derive(Debug, Deserialize)]
struct LoginData {
    sid: String,
}

/// Authenticated client for the Synology web API.
///
/// Construct with [`SynoClient::new`], authenticate with
/// [`SynoClient::login`], then share freely across tasks — the session id is
/// read-only for the lifetime of the client once login has completed.
pub struct SynoClient {
    http: reqwest::Client,
    base: Url,
    username: String,
    password: String,
    sid: Option<String>,
}

impl SynoClient {
    /// Build a client from configuration.
    ///
    /// The per-request timeout comes from `config.timeout_secs` and applies
    /// to every call made through this client, including the pipeline's
    /// task-creation requests.
    pub fn new(config: &Config) -> Result<Self> {
        let base = Url::parse(&format!("{}://{}/", config.scheme, config.host))?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            http,
            base,
            username: config.username.clone(),
            password: config.password.clone(),
            sid: None,
        })
    }

    /// Issue one GET request and decode the response envelope.
    ///
    /// Appends `_sid` to the query when a session is established. Non-2xx
    /// statuses become [`Error::Http`]; envelopes with `success: false` are
    /// decoded through the scope's error-code table.
    pub(crate) async fn call(
        &self,
        path: &str,
        scope: ApiScope,
        params: &[(&str, &str)],
    ) -> Result<Option<serde_json::Value>> {
        let mut url = self.base.join(path)?;
        {
            let mut query = url.query_pairs_mut();
            for (param, value) in params {
                query.append_pair(param, value);
            }
            if let Some(sid) = &self.sid {
                query.append_pair("_sid", sid);
            }
        }

        tracing::debug!(url = %url.path(), "request");
        let response = self
            .http
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Http(status));
        }

        let envelope: ApiEnvelope = response.json().await?;
        if envelope.success {
            return Ok(envelope.data);
        }

        let body = envelope.error.ok_or(Error::MissingField("error"))?;
        match (scope, body.errors.first()) {
            (ApiScope::FileStation, Some(nested)) => {
                Err(Error::file_operation(body.code, nested.code))
            }
            _ => Err(Error::api(scope, body.code)),
        }
    }

    /// Like [`call`](Self::call), but deserializes the `data` payload into a
    /// typed value; a missing payload is a malformed response.
    pub(crate) async fn call_data<T: DeserializeOwned>(
        &self,
        path: &str,
        scope: ApiScope,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let data = self
            .call(path, scope, params)
            .await?
            .ok_or(Error::MissingField("data"))?;
        Ok(serde_json::from_value(data)?)
    }

    /// Authenticate against `SYNO.API.Auth` and store the session id.
    ///
    /// Every subsequent request carries the sid until [`logout`](Self::logout).
    pub async fn login(&mut self) -> Result<()> {
        let data: LoginData = self
            .call_data(
                AUTH_CGI,
                ApiScope::Auth,
                &[
                    ("api", "SYNO.API.Auth"),
                    ("version", "2"),
                    ("method", "login"),
                    ("account", &self.username),
                    ("passwd", &self.password),
                    ("session", SESSION_NAME),
                    ("format", "sid"),
                ],
            )
            .await?;

        tracing::debug!(user = %self.username, "logged in");
        self.sid = Some(data.sid);
        Ok(())
    }

    /// End the session.
    pub async fn logout(&self) -> Result<()> {
        self.call(
            AUTH_CGI,
            ApiScope::Auth,
            &[
                ("api", "SYNO.API.Auth"),
                ("version", "2"),
                ("method", "logout"),
                ("session", SESSION_NAME),
            ],
        )
        .await?;
        Ok(())
    }

    /// Whether a session has been established
    pub fn is_logged_in(&self) -> bool {
        self.sid.is_some()
    }
}
