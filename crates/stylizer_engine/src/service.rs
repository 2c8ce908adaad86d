use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use stylizer_core::{Asset, JobHandle, JobStatus, ResultLocator, StylizationRequest};
use stylizer_logging::{stylizer_debug, stylizer_info};
use url::Url;

use crate::filename::asset_file_name;
use crate::{FetchError, PollError, SetupError, SubmissionError};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub base_url: Url,
    pub connect_timeout: Duration,
    /// Whole-request ceiling; `None` leaves it to the transport.
    pub request_timeout: Option<Duration>,
    /// Cap on downloaded artifact and preset sizes.
    pub max_download_bytes: u64,
}

impl ServiceSettings {
    /// Parses and normalizes the service base location.
    pub fn with_base_url(base_url: &str) -> Result<Self, SetupError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            ..Self::default()
        })
    }
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            base_url: parse_base_url(DEFAULT_BASE_URL).expect("default base url is valid"),
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
            max_download_bytes: 50 * 1024 * 1024,
        }
    }
}

fn parse_base_url(raw: &str) -> Result<Url, SetupError> {
    let invalid = |reason: String| SetupError::BaseUrl {
        url: raw.to_string(),
        reason,
    };
    let mut url = Url::parse(raw.trim()).map_err(|err| invalid(err.to_string()))?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("expected an http(s) base location".to_string()));
    }
    // A trailing slash makes relative joins keep any path prefix.
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

/// The remote stylization service: submission, status checks and downloads.
#[async_trait::async_trait]
pub trait StyleService: Send + Sync {
    /// One submission exchange; never retried.
    async fn submit(&self, request: StylizationRequest) -> Result<JobHandle, SubmissionError>;

    /// One status check for `handle`.
    async fn check_status(&self, handle: &JobHandle) -> Result<JobStatus, PollError>;

    /// Downloads the finished artifact.
    async fn fetch_result(&self, locator: &ResultLocator) -> Result<Vec<u8>, FetchError>;

    /// Downloads a preset style image and wraps it like an upload.
    async fn fetch_preset(&self, url: &str) -> Result<Asset, FetchError>;
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    task_id: String,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    status: WireStatus,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum WireStatus {
    Pending,
    // What the service stores for a freshly created task.
    Processing,
    Complete,
    Failed,
}

struct Download {
    bytes: Vec<u8>,
    content_type: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ReqwestStyleService {
    settings: ServiceSettings,
    client: reqwest::Client,
}

impl ReqwestStyleService {
    pub fn new(settings: ServiceSettings) -> Result<Self, SetupError> {
        let mut builder = reqwest::Client::builder().connect_timeout(settings.connect_timeout);
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| SetupError::Client(err.to_string()))?;
        Ok(Self { settings, client })
    }

    pub fn settings(&self) -> &ServiceSettings {
        &self.settings
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.settings.base_url.clone();
        // The base was checked to be a base URL when the settings were built.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Resolves a result locator against the service base location.
    ///
    /// Root-relative locators (`/outputs/T1.jpg`) stay under the base path,
    /// so `http://host/api` yields `http://host/api/outputs/T1.jpg`. Absolute
    /// URLs are used as given.
    pub fn resolve(&self, locator: &ResultLocator) -> Result<Url, FetchError> {
        let raw = locator.as_str().trim();
        let relative = match raw.strip_prefix('/') {
            Some(rest) if !rest.starts_with('/') => rest,
            _ => raw,
        };
        self.settings
            .base_url
            .join(relative)
            .map_err(|err| FetchError::InvalidUrl(err.to_string()))
    }

    async fn download(&self, url: Url) -> Result<Download, FetchError> {
        let max_bytes = self.settings.max_download_bytes;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(FetchError::TooLarge {
                    max_bytes,
                    actual: Some(content_len),
                });
            }
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(FetchError::TooLarge {
                    max_bytes,
                    actual: Some(next_len),
                });
            }
            bytes.extend_from_slice(&chunk);
        }

        Ok(Download {
            bytes,
            content_type,
        })
    }
}

#[async_trait::async_trait]
impl StyleService for ReqwestStyleService {
    async fn submit(&self, request: StylizationRequest) -> Result<JobHandle, SubmissionError> {
        let (content, style, resolution, style_weight) = request.into_parts();
        let form = Form::new()
            .part("content_image", asset_part(content)?)
            .part("style_image", asset_part(style)?)
            .text("resolution", resolution.pixels().to_string())
            .text("style_weight", style_weight.to_string());

        let url = self.endpoint(&["stylize", ""]);
        stylizer_info!(
            "Submitting job url={} resolution={} style_weight={}",
            url,
            resolution.pixels(),
            style_weight
        );
        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|err| SubmissionError::Connectivity(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SubmissionError::Rejected(status.as_u16()));
        }
        let body = response
            .bytes()
            .await
            .map_err(|err| SubmissionError::Connectivity(err.to_string()))?;
        let parsed: SubmitResponse = serde_json::from_slice(&body)
            .map_err(|err| SubmissionError::MalformedResponse(err.to_string()))?;
        JobHandle::new(parsed.task_id)
            .ok_or_else(|| SubmissionError::MalformedResponse("empty task_id".to_string()))
    }

    async fn check_status(&self, handle: &JobHandle) -> Result<JobStatus, PollError> {
        let url = self.endpoint(&["status", handle.as_str()]);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| PollError::Connectivity(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PollError::HttpStatus(status.as_u16()));
        }
        let body = response
            .bytes()
            .await
            .map_err(|err| PollError::Connectivity(err.to_string()))?;
        let parsed: StatusResponse = serde_json::from_slice(&body)
            .map_err(|err| PollError::MalformedResponse(err.to_string()))?;
        stylizer_debug!("Status for {}: {:?}", handle, parsed.status);

        match parsed.status {
            WireStatus::Pending | WireStatus::Processing => Ok(JobStatus::Pending),
            WireStatus::Failed => Ok(JobStatus::Failed),
            WireStatus::Complete => match parsed.url {
                Some(url) if !url.trim().is_empty() => {
                    Ok(JobStatus::Complete(ResultLocator::new(url)))
                }
                _ => Err(PollError::MalformedResponse(
                    "complete status without url".to_string(),
                )),
            },
        }
    }

    async fn fetch_result(&self, locator: &ResultLocator) -> Result<Vec<u8>, FetchError> {
        let url = self.resolve(locator)?;
        stylizer_info!("Fetching result {}", url);
        let download = self.download(url).await?;
        Ok(download.bytes)
    }

    async fn fetch_preset(&self, url: &str) -> Result<Asset, FetchError> {
        let parsed = Url::parse(url).map_err(|err| FetchError::InvalidUrl(err.to_string()))?;
        let file_name = asset_file_name(&parsed);
        let download = self.download(parsed).await?;
        let media_type = download
            .content_type
            .as_deref()
            .and_then(|ct| ct.split(';').next())
            .map(str::trim)
            .filter(|ct| !ct.is_empty())
            .unwrap_or(FALLBACK_MEDIA_TYPE)
            .to_string();
        Ok(Asset::new(file_name, media_type, download.bytes))
    }
}

fn asset_part(asset: Asset) -> Result<Part, SubmissionError> {
    Part::bytes(asset.bytes)
        .file_name(asset.file_name)
        .mime_str(&asset.media_type)
        .map_err(|err| SubmissionError::InvalidRequest(err.to_string()))
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::Timeout;
    }
    FetchError::Network(err.to_string())
}
