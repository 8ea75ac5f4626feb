//! Blocking client for the equipment backend's four endpoints.
//!
//! Every request carries `Authorization: Basic …` built from whatever the
//! credential store holds at call time. Calls run on background threads
//! spawned by the UI controller, never on the UI thread.

mod models;
mod multipart;

pub use models::{HistoryEntry, Summary, TypeDistribution, UploadResult};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use url::Url;

use crate::config::{ApiSettings, ConfigError};
use crate::credentials::{Credential, CredentialStore};
use crate::http_client;

pub const UPLOAD_PATH: &str = "upload/";
pub const SUMMARY_PATH: &str = "summary/";
pub const HISTORY_PATH: &str = "history/";
pub const PDF_PATH: &str = "pdf/";

/// Form field the backend reads the CSV from.
const UPLOAD_FIELD: &str = "file";
const MAX_JSON_RESPONSE_BYTES: usize = 4 * 1024 * 1024;
const MAX_PDF_RESPONSE_BYTES: usize = 64 * 1024 * 1024;
const MAX_ERROR_BODY_BYTES: usize = 64 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The backend answered 401.
    #[error("Request failed with status code 401")]
    Unauthorized { message: Option<String> },
    /// Any other non-2xx answer.
    #[error("Request failed with status code {code}")]
    Status { code: u16, message: Option<String> },
    #[error("Network error: {0}")]
    Transport(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid endpoint {path}: {reason}")]
    Endpoint { path: String, reason: String },
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Message the backend put in its error body, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Unauthorized { message } | Self::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// The server's message when present, otherwise this error's own text.
    pub fn user_message(&self) -> String {
        self.server_message()
            .map(str::to_string)
            .unwrap_or_else(|| self.to_string())
    }
}

/// Handle to the backend. Cheap to clone into worker threads.
#[derive(Clone)]
pub struct ApiClient {
    agent: ureq::Agent,
    base_url: Url,
    probe_path: String,
    credentials: Arc<dyn CredentialStore>,
}

impl ApiClient {
    pub fn new(
        settings: &ApiSettings,
        credentials: Arc<dyn CredentialStore>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            agent: http_client::agent(settings),
            base_url: settings.parsed_base_url()?,
            probe_path: settings.probe_path.clone(),
            credentials,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Send a CSV file from disk to `upload/`.
    pub fn upload_csv(&self, path: &Path) -> Result<UploadResult, ApiError> {
        let contents = std::fs::read(path).map_err(|source| ApiError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload.csv".to_string());
        self.upload_csv_bytes(&file_name, &contents)
    }

    /// Send in-memory CSV contents to `upload/` as multipart field `file`.
    pub fn upload_csv_bytes(
        &self,
        file_name: &str,
        contents: &[u8],
    ) -> Result<UploadResult, ApiError> {
        let form = multipart::MultipartForm::single_file(UPLOAD_FIELD, file_name, "text/csv", contents);
        tracing::info!("Uploading {file_name} ({} bytes)", contents.len());
        let request = self
            .request("POST", UPLOAD_PATH)?
            .set("Content-Type", &form.content_type());
        let response = finish(request.send_bytes(form.body()))?;
        parse_json(response)
    }

    pub fn get_summary(&self) -> Result<Summary, ApiError> {
        let response = finish(self.request("GET", SUMMARY_PATH)?.call())?;
        parse_json(response)
    }

    /// Up to five most recent uploads, in the order the backend returns them.
    pub fn get_history(&self) -> Result<Vec<HistoryEntry>, ApiError> {
        let response = finish(self.request("GET", HISTORY_PATH)?.call())?;
        parse_json(response)
    }

    /// Raw bytes of the generated PDF report.
    pub fn get_pdf(&self) -> Result<Vec<u8>, ApiError> {
        let response = finish(
            self.request("GET", PDF_PATH)?
                .set("Accept", "application/pdf")
                .call(),
        )?;
        http_client::read_response_bytes(response, MAX_PDF_RESPONSE_BYTES)
            .map_err(|err| ApiError::InvalidResponse(err.to_string()))
    }

    /// Validate a candidate pair with one authenticated GET of the probe endpoint.
    ///
    /// Only the status matters; the body is drained and discarded.
    pub fn probe(&self, credential: &Credential) -> Result<(), ApiError> {
        let url = self.endpoint(&self.probe_path)?;
        tracing::info!("Validating credentials against {url}");
        let response = finish(
            self.agent
                .request_url("GET", &url)
                .set("Accept", "application/json")
                .set("Authorization", &credential.authorization_header())
                .call(),
        )?;
        http_client::read_response_bytes(response, MAX_JSON_RESPONSE_BYTES)
            .map(|_| ())
            .map_err(|err| ApiError::InvalidResponse(err.to_string()))
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|err| ApiError::Endpoint {
                path: path.to_string(),
                reason: err.to_string(),
            })
    }

    fn request(&self, method: &str, path: &str) -> Result<ureq::Request, ApiError> {
        let url = self.endpoint(path)?;
        tracing::debug!("{method} {url}");
        let request = self
            .agent
            .request_url(method, &url)
            .set("Accept", "application/json");
        Ok(match self.stored_authorization() {
            Some(header) => request.set("Authorization", &header),
            None => request,
        })
    }

    fn stored_authorization(&self) -> Option<String> {
        match self.credentials.load() {
            Ok(Some(credential)) if credential.is_complete() => {
                Some(credential.authorization_header())
            }
            Ok(_) => None,
            Err(err) => {
                tracing::warn!("Credential store read failed; sending without auth: {err}");
                None
            }
        }
    }
}

fn finish(result: Result<ureq::Response, ureq::Error>) -> Result<ureq::Response, ApiError> {
    match result {
        Ok(response) => Ok(response),
        Err(ureq::Error::Status(code, response)) => {
            let message = error_message(response);
            tracing::warn!("Backend answered HTTP {code}");
            Err(if code == 401 {
                ApiError::Unauthorized { message }
            } else {
                ApiError::Status { code, message }
            })
        }
        Err(ureq::Error::Transport(err)) => {
            tracing::warn!("Backend unreachable: {err}");
            Err(ApiError::Transport(err.to_string()))
        }
    }
}

/// Pull `error` (or DRF's `detail`) out of a JSON error body.
fn error_message(response: ureq::Response) -> Option<String> {
    let bytes = http_client::read_response_bytes(response, MAX_ERROR_BODY_BYTES).ok()?;
    extract_error_message(&bytes)
}

fn extract_error_message(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    ["error", "detail"]
        .iter()
        .find_map(|key| value.get(*key).and_then(|field| field.as_str()))
        .map(|message| message.trim().to_string())
        .filter(|message| !message.is_empty())
}

fn parse_json<T: DeserializeOwned>(response: ureq::Response) -> Result<T, ApiError> {
    let bytes = http_client::read_response_bytes(response, MAX_JSON_RESPONSE_BYTES)
        .map_err(|err| ApiError::InvalidResponse(err.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|err| ApiError::InvalidResponse(err.to_string()))
}
