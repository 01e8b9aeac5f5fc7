//! Export orchestration.
//!
//! An export run extracts the transcript, renders each requested format and
//! hands the bytes to a [`DownloadSink`]. Downloads are awaited one after
//! another (Markdown, then HTML) so that a sink backed by an interactive
//! save dialog never sees two requests at once. The first failure ends the
//! run and its message is reported verbatim.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use crate::error::Error;
use crate::extract::extract_transcript;
use crate::html_render::render_html;
use crate::markdown::render_markdown;
use crate::options::Options;
use crate::platform::Platform;

/// Formats requested by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Formats {
    /// Produce a `.md` file.
    pub markdown: bool,
    /// Produce a `.html` file.
    pub html: bool,
}

/// An export command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRequest {
    /// Formats to produce.
    pub formats: Formats,
}

/// Outcome of an export command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResponse {
    /// Whether every requested download succeeded.
    pub success: bool,

    /// Messages in the exported transcript.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_count: Option<usize>,

    /// Distinct images in the exported transcript.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_count: Option<usize>,

    /// User-facing failure message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExportResponse {
    fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Self::default()
        }
    }
}

/// One file handed to a [`DownloadSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    /// File contents.
    pub bytes: Vec<u8>,
    /// Proposed file name, without directory.
    pub suggested_filename: String,
    /// MIME type of `bytes`.
    pub content_type: &'static str,
    /// Ask the user where to save instead of saving silently.
    pub prompt_user_for_location: bool,
}

/// Destination for exported files.
///
/// `save` resolves once the file is stored (or the attempt failed). The
/// error string is shown to the user unchanged.
#[allow(async_fn_in_trait)]
pub trait DownloadSink {
    /// Store one file.
    async fn save(&self, request: DownloadRequest) -> Result<(), String>;
}

/// Writes exports into a directory.
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
    overwrite: bool,
}

impl FileSink {
    /// Sink writing into `dir`, refusing to replace existing files.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            overwrite: false,
        }
    }

    /// Allow replacing existing files.
    #[must_use]
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Target directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadSink for FileSink {
    async fn save(&self, request: DownloadRequest) -> Result<(), String> {
        let path = self.dir.join(&request.suggested_filename);

        let mut open = OpenOptions::new();
        open.write(true);
        if self.overwrite {
            open.create(true).truncate(true);
        } else {
            open.create_new(true);
        }

        let mut file = open.open(&path).await.map_err(|err| match err.kind() {
            ErrorKind::AlreadyExists => format!("{} already exists", path.display()),
            _ => Error::io(&path, err).to_string(),
        })?;
        file.write_all(&request.bytes)
            .await
            .map_err(|err| Error::io(&path, err).to_string())?;
        file.flush()
            .await
            .map_err(|err| Error::io(&path, err).to_string())?;

        info!(path = %path.display(), bytes = request.bytes.len(), "saved export");
        Ok(())
    }
}

/// `{prefix}-conversation-{YYYY-MM-DD_HH-MM-SS}.{extension}`.
#[must_use]
pub fn filename(platform: Platform, extension: &str, at: DateTime<Utc>) -> String {
    format!(
        "{}-conversation-{}.{extension}",
        platform.file_prefix(),
        at.format("%Y-%m-%d_%H-%M-%S")
    )
}

/// Export the conversation in `html` to `sink`, timestamped now.
pub async fn export_current<S: DownloadSink>(
    html: &str,
    request: &ExportRequest,
    options: &Options,
    sink: &S,
) -> ExportResponse {
    export_at(html, request, options, sink, Utc::now()).await
}

/// [`export_current`] with an explicit export time.
pub async fn export_at<S: DownloadSink>(
    html: &str,
    request: &ExportRequest,
    options: &Options,
    sink: &S,
    now: DateTime<Utc>,
) -> ExportResponse {
    let transcript = match extract_transcript(html, options) {
        Ok(transcript) => transcript,
        Err(err) => {
            warn!(error = %err, "extraction failed");
            return ExportResponse::failure(err.to_string());
        }
    };

    let formats = request.formats;
    if !formats.markdown && !formats.html {
        warn!("no export format selected");
    }

    let mut downloads = Vec::with_capacity(2);
    if formats.markdown {
        downloads.push(DownloadRequest {
            bytes: render_markdown(&transcript, now).into_bytes(),
            suggested_filename: filename(transcript.platform, "md", now),
            content_type: "text/markdown",
            prompt_user_for_location: true,
        });
    }
    if formats.html {
        downloads.push(DownloadRequest {
            bytes: render_html(&transcript, now).into_bytes(),
            suggested_filename: filename(transcript.platform, "html", now),
            content_type: "text/html",
            prompt_user_for_location: true,
        });
    }

    for download in downloads {
        let name = download.suggested_filename.clone();
        if let Err(message) = sink.save(download).await {
            let err = Error::Download(message);
            warn!(file = %name, error = %err, "download failed");
            return ExportResponse::failure(err.to_string());
        }
    }

    info!(
        messages = transcript.messages.len(),
        images = transcript.stats.image_count,
        "export completed"
    );

    ExportResponse {
        success: true,
        message_count: Some(transcript.messages.len()),
        image_count: Some(transcript.stats.image_count),
        error: None,
    }
}
