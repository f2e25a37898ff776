//! Image host upload client.
//!
//! Orders attach cloth photos. The photos live on a third-party image host
//! that takes one file per unsigned multipart request and answers with a
//! stable absolute URL. This client owns that contract; the repositories
//! only ever see the returned URL strings.
//!
//! Uploads for one order run as independent parallel requests: a single
//! file's failure does not cancel the others, and there is no all-or-nothing
//! batch semantics. The caller receives every per-file result and decides
//! whether to proceed with a partial image set.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, warn};
use url::Url;

use crate::config::ImageHostConfig;

/// Errors that can occur uploading a single image.
#[derive(Debug, Error)]
pub enum UploadError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The host answered with a non-success status.
    #[error("upload rejected: {status} - {message}")]
    Rejected {
        status: u16,
        message: String,
    },

    /// The response body was not the expected JSON shape.
    #[error("unexpected upload response: {0}")]
    Parse(String),

    /// The response carried no URL; the upload must be treated as failed,
    /// not retried automatically.
    #[error("upload response missing secure URL")]
    MissingUrl,

    /// The returned URL is not an absolute URL.
    #[error("upload returned invalid URL: {0}")]
    InvalidUrl(String),

    /// The upload task was torn down before completing.
    #[error("upload task aborted")]
    Aborted,
}

/// One file queued for upload.
#[derive(Debug, Clone)]
pub struct ImageFile {
    /// Original file name, used in failure reports.
    pub name: String,
    /// MIME type (e.g. `image/jpeg`).
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Upload progress, recomputed after each individual completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadProgress {
    pub completed: usize,
    pub total: usize,
}

impl UploadProgress {
    /// Progress as a whole percentage, the way the form's progress bar
    /// renders it.
    #[must_use]
    pub fn percent(self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        #[allow(
            clippy::cast_precision_loss,
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss
        )]
        let pct = ((self.completed as f64 / self.total as f64) * 100.0).round() as u8;
        pct
    }
}

/// The result of a batch upload: which files made it, which did not.
#[derive(Debug)]
pub struct UploadOutcome {
    /// URLs of successful uploads, in input file order.
    pub urls: Vec<String>,
    /// Failed files by name, with the error that sank each one.
    pub failures: Vec<(String, UploadError)>,
}

impl UploadOutcome {
    /// Whether every file uploaded.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
}

/// Client for the image host's unsigned upload endpoint.
#[derive(Clone)]
pub struct ImageHostClient {
    inner: Arc<ImageHostClientInner>,
}

struct ImageHostClientInner {
    client: reqwest::Client,
    upload_url: String,
    upload_preset: String,
    api_key: Option<SecretString>,
}

impl ImageHostClient {
    /// Create a new image host client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &ImageHostConfig) -> Result<Self, UploadError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            inner: Arc::new(ImageHostClientInner {
                client,
                upload_url: config.upload_url.clone(),
                upload_preset: config.upload_preset.clone(),
                api_key: config.api_key.clone(),
            }),
        })
    }

    /// Upload a single file, returning its stable absolute URL.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError`] on transport failure, a non-success status,
    /// an unparseable body, or a missing/invalid URL in the response.
    pub async fn upload(&self, file: ImageFile) -> Result<String, UploadError> {
        debug!(file = %file.name, bytes = file.bytes.len(), "uploading image");

        let part = reqwest::multipart::Part::bytes(file.bytes)
            .file_name(file.name.clone())
            .mime_str(&file.content_type)
            .map_err(|e| UploadError::Parse(format!("invalid content type: {e}")))?;

        let mut form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("upload_preset", self.inner.upload_preset.clone());
        if let Some(key) = &self.inner.api_key {
            form = form.text("api_key", key.expose_secret().to_owned());
        }

        let response = self
            .inner
            .client
            .post(&self.inner.upload_url)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(file = %file.name, status = %status, "image upload rejected");
            return Err(UploadError::Rejected {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        let parsed: UploadResponse =
            serde_json::from_str(&body).map_err(|e| UploadError::Parse(e.to_string()))?;
        let secure_url = parsed.secure_url.ok_or(UploadError::MissingUrl)?;

        if Url::parse(&secure_url).is_err() {
            return Err(UploadError::InvalidUrl(secure_url));
        }
        Ok(secure_url)
    }

    /// Upload many files as independent parallel requests.
    ///
    /// `on_progress` fires after each individual completion (success or
    /// failure) with the completed/total fraction. Successful URLs come
    /// back in input file order regardless of completion order; failures
    /// are reported per file so the caller can proceed with a partial set
    /// or abort.
    pub async fn upload_all<F>(&self, files: Vec<ImageFile>, mut on_progress: F) -> UploadOutcome
    where
        F: FnMut(UploadProgress),
    {
        let total = files.len();
        let mut results: Vec<Option<Result<String, UploadError>>> =
            (0..total).map(|_| None).collect();
        let mut names: Vec<String> = files.iter().map(|f| f.name.clone()).collect();

        let mut tasks = JoinSet::new();
        for (index, file) in files.into_iter().enumerate() {
            let client = self.clone();
            tasks.spawn(async move { (index, client.upload(file).await) });
        }

        let mut completed = 0usize;
        while let Some(joined) = tasks.join_next().await {
            let (index, result) = match joined {
                Ok(pair) => pair,
                Err(_) => continue, // task aborted; its slot stays failed
            };
            completed += 1;
            on_progress(UploadProgress { completed, total });
            if let Some(slot) = results.get_mut(index) {
                *slot = Some(result);
            }
        }

        let mut urls = Vec::new();
        let mut failures = Vec::new();
        for (index, slot) in results.into_iter().enumerate() {
            let name = names
                .get_mut(index)
                .map(std::mem::take)
                .unwrap_or_default();
            match slot {
                Some(Ok(url)) => urls.push(url),
                Some(Err(err)) => failures.push((name, err)),
                None => failures.push((name, UploadError::Aborted)),
            }
        }

        UploadOutcome { urls, failures }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_percent() {
        let p = UploadProgress {
            completed: 1,
            total: 3,
        };
        assert_eq!(p.percent(), 33);

        let p = UploadProgress {
            completed: 3,
            total: 3,
        };
        assert_eq!(p.percent(), 100);

        let p = UploadProgress {
            completed: 0,
            total: 0,
        };
        assert_eq!(p.percent(), 100);
    }

    #[test]
    fn test_outcome_completeness() {
        let outcome = UploadOutcome {
            urls: vec!["https://img.example/a.jpg".to_owned()],
            failures: Vec::new(),
        };
        assert!(outcome.is_complete());

        let outcome = UploadOutcome {
            urls: Vec::new(),
            failures: vec![("a.jpg".to_owned(), UploadError::MissingUrl)],
        };
        assert!(!outcome.is_complete());
    }

    #[test]
    fn test_upload_response_parses_missing_url_as_none() {
        let parsed: UploadResponse =
            serde_json::from_str(r#"{"error": {"message": "preset not found"}}"#)
                .expect("object should parse");
        assert!(parsed.secure_url.is_none());
    }
}
