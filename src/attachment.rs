//! Attachment management.
//!
//! Files are validated against a MIME allow-list and a size cap, then
//! "uploaded" into memory: the transfer is simulated, nothing leaves the
//! process. Downloads go through a scoped handle backed by a temp file
//! that is removed when the handle drops.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use uuid::Uuid;

use crate::config::AttachmentsConfig;
use crate::error::{Error, Result};

/// Default per-file size cap.
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Simulated transfer latency for interactive uploads.
pub const UPLOAD_LATENCY_MS: u64 = 1000;

/// Built-in MIME allow-list.
pub const ALLOWED_TYPES: [&str; 11] = [
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "application/pdf",
    "text/plain",
    "text/csv",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
];

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// A file attached to a task, held in memory only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Attachment {
    pub id: String,
    pub name: String,
    pub mime_type: String,
    pub size: u64,
    pub uploaded_at: DateTime<Utc>,
    /// File bytes. Snapshot documents may omit them, leaving metadata only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<u8>,
}

/// Metadata view of an attachment, without the bytes. Command output
/// and list surfaces use this so file contents never land in JSON.
#[derive(Debug, Clone, Serialize)]
pub struct AttachmentMeta {
    pub id: String,
    pub name: String,
    pub mime_type: String,
    pub size: u64,
    pub size_display: String,
    pub kind: &'static str,
    pub uploaded_at: DateTime<Utc>,
}

impl From<&Attachment> for AttachmentMeta {
    fn from(attachment: &Attachment) -> Self {
        Self {
            id: attachment.id.clone(),
            name: attachment.name.clone(),
            mime_type: attachment.mime_type.clone(),
            size: attachment.size,
            size_display: format_size(attachment.size),
            kind: icon_for(&attachment.mime_type).label(),
            uploaded_at: attachment.uploaded_at,
        }
    }
}

/// One file offered for upload, before validation.
#[derive(Debug, Clone)]
pub struct UploadCandidate {
    pub name: String,
    pub mime_type: String,
    pub content: Vec<u8>,
}

impl UploadCandidate {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            content,
        }
    }

    /// Read a candidate from disk, inferring the MIME type from the file
    /// extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .ok_or_else(|| {
                Error::InvalidArgument(format!("not a file path: {}", path.display()))
            })?;
        let content = fs::read(path)?;
        let mime_type = guess_mime_type(path);
        Ok(Self {
            name,
            mime_type,
            content,
        })
    }

    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }

    fn into_attachment(self) -> Attachment {
        Attachment {
            id: Uuid::new_v4().to_string(),
            name: self.name,
            mime_type: self.mime_type,
            size: self.content.len() as u64,
            uploaded_at: Utc::now(),
            content: self.content,
        }
    }
}

/// Validation rules for one upload batch: the built-in allow-list plus
/// configured extras, and the size cap.
#[derive(Debug, Clone)]
pub struct AttachmentPolicy {
    max_size: u64,
    extra_allowed: Vec<glob::Pattern>,
}

impl Default for AttachmentPolicy {
    fn default() -> Self {
        Self {
            max_size: MAX_FILE_SIZE,
            extra_allowed: Vec::new(),
        }
    }
}

impl AttachmentPolicy {
    pub fn from_config(config: &AttachmentsConfig) -> Result<Self> {
        let mut extra_allowed = Vec::with_capacity(config.extra_allowed_types.len());
        for entry in &config.extra_allowed_types {
            let pattern = glob::Pattern::new(entry.trim()).map_err(|err| {
                Error::InvalidConfig(format!(
                    "attachments.extra_allowed_types: invalid pattern '{entry}': {err}"
                ))
            })?;
            extra_allowed.push(pattern);
        }
        Ok(Self {
            max_size: config.max_size_bytes(),
            extra_allowed,
        })
    }

    pub fn max_size(&self) -> u64 {
        self.max_size
    }

    pub fn allows_type(&self, mime_type: &str) -> bool {
        ALLOWED_TYPES.contains(&mime_type)
            || self
                .extra_allowed
                .iter()
                .any(|pattern| pattern.matches(mime_type))
    }

    /// Check one candidate. Returns the rejection reason, or None when the
    /// file passes. Type is checked before size.
    pub fn check(&self, candidate: &UploadCandidate) -> Option<String> {
        if !self.allows_type(&candidate.mime_type) {
            return Some(format!("{}: Unsupported file type", candidate.name));
        }
        if candidate.size() > self.max_size {
            return Some(format!(
                "{}: File too large (max {}MB)",
                candidate.name,
                self.max_size / (1024 * 1024)
            ));
        }
        None
    }
}

/// Result of validating an upload batch.
#[derive(Debug, Default)]
pub struct BatchValidation {
    pub accepted: Vec<UploadCandidate>,
    pub rejected: Vec<String>,
}

impl BatchValidation {
    pub fn all_rejected(&self) -> bool {
        self.accepted.is_empty() && !self.rejected.is_empty()
    }
}

/// Partition a batch into accepted candidates and per-file rejection
/// reasons. A rejected file never blocks the rest of the batch.
pub fn validate_batch(
    candidates: Vec<UploadCandidate>,
    policy: &AttachmentPolicy,
) -> BatchValidation {
    let mut outcome = BatchValidation::default();
    for candidate in candidates {
        match policy.check(&candidate) {
            Some(reason) => outcome.rejected.push(reason),
            None => outcome.accepted.push(candidate),
        }
    }
    outcome
}

/// Finish an upload by turning accepted candidates into attachment
/// records stamped with the upload time. Interactive surfaces run this
/// after the simulated latency; the one-shot CLI runs it immediately.
pub fn complete_upload(accepted: Vec<UploadCandidate>) -> Vec<Attachment> {
    accepted
        .into_iter()
        .map(UploadCandidate::into_attachment)
        .collect()
}

/// Coarse file family used to pick an icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Image,
    Pdf,
    Word,
    Spreadsheet,
    Other,
}

impl FileKind {
    pub fn label(&self) -> &'static str {
        match self {
            FileKind::Image => "image",
            FileKind::Pdf => "pdf",
            FileKind::Word => "word",
            FileKind::Spreadsheet => "spreadsheet",
            FileKind::Other => "file",
        }
    }
}

/// Map a MIME type to its icon family.
pub fn icon_for(mime_type: &str) -> FileKind {
    if mime_type.starts_with("image/") {
        FileKind::Image
    } else if mime_type == "application/pdf" {
        FileKind::Pdf
    } else if mime_type.contains("word") {
        FileKind::Word
    } else if mime_type.contains("excel") || mime_type.contains("csv") {
        FileKind::Spreadsheet
    } else {
        FileKind::Other
    }
}

pub fn is_image(mime_type: &str) -> bool {
    mime_type.starts_with("image/")
}

/// Render a byte count in binary units with up to two decimals, trailing
/// zeros trimmed.
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let exponent = ((bytes as f64).ln() / 1024_f64.ln()).floor() as usize;
    let exponent = exponent.min(SIZE_UNITS.len() - 1);
    let value = bytes as f64 / 1024_f64.powi(exponent as i32);
    let rendered = format!("{value:.2}");
    let rendered = rendered.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", rendered, SIZE_UNITS[exponent])
}

/// Infer a MIME type from a file extension. Unknown extensions fall back
/// to application/octet-stream, which the allow-list rejects.
pub fn guess_mime_type(path: &Path) -> String {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    let mime = match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "pdf" => "application/pdf",
        "txt" | "md" | "log" => "text/plain",
        "csv" => "text/csv",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        _ => "application/octet-stream",
    };
    mime.to_string()
}

/// Expand path arguments, treating each as a glob pattern. Every
/// argument must match at least one file.
pub fn expand_paths(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let entries = glob::glob(pattern).map_err(|err| {
            Error::InvalidArgument(format!("bad file pattern '{pattern}': {err}"))
        })?;
        let mut matched = false;
        for entry in entries {
            let path = entry.map_err(glob::GlobError::into_error)?;
            if path.is_file() {
                files.push(path);
                matched = true;
            }
        }
        if !matched {
            return Err(Error::InvalidArgument(format!(
                "no files match '{pattern}'"
            )));
        }
    }
    Ok(files)
}

/// Scoped access to an attachment's bytes for download or preview. The
/// backing temp file is removed when the handle drops, so the reference
/// cannot outlive the consuming operation.
#[derive(Debug)]
pub struct DownloadHandle {
    file: NamedTempFile,
    name: String,
}

impl DownloadHandle {
    pub fn new(attachment: &Attachment) -> Result<Self> {
        if attachment.content.is_empty() && attachment.size > 0 {
            return Err(Error::OperationFailed(format!(
                "attachment content unavailable: {}",
                attachment.name
            )));
        }
        let mut file = NamedTempFile::new()?;
        file.write_all(&attachment.content)?;
        file.flush()?;
        Ok(Self {
            file,
            name: attachment.name.clone(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Copy the bytes out to a destination file. The scoped temp file is
    /// still released when the handle drops.
    pub fn save_to(&self, dest: &Path) -> Result<PathBuf> {
        if let Some(parent) = dest.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::copy(self.path(), dest)?;
        Ok(dest.to_path_buf())
    }
}
