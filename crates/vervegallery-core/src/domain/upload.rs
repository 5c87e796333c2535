//! Upload tracking types
//!
//! [`UploadStatus`] is the per-upload view state; its transition methods
//! keep `progress` monotonically non-decreasing while uploading.

use serde::{Deserialize, Serialize};

/// A file to upload, fully buffered in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    /// Target file name in Drive
    pub name: String,
    /// MIME type sent in the metadata part
    pub mime_type: String,
    /// File contents
    pub data: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            data,
        }
    }

    /// Size in bytes
    pub fn len(&self) -> u64 {
        self.data.len() as u64
    }

    /// Returns true if the file has no content
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Lifecycle state of an upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadState {
    Uploading,
    Completed,
    Error,
}

impl std::fmt::Display for UploadState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UploadState::Uploading => write!(f, "uploading"),
            UploadState::Completed => write!(f, "completed"),
            UploadState::Error => write!(f, "error"),
        }
    }
}

/// Status of a single upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadStatus {
    /// Percentage in 0..=100
    pub progress: u8,
    pub state: UploadState,
    pub file_name: String,
}

impl UploadStatus {
    /// Status of an upload that has just started
    pub fn started(file_name: impl Into<String>) -> Self {
        Self {
            progress: 0,
            state: UploadState::Uploading,
            file_name: file_name.into(),
        }
    }

    /// Records a progress report
    ///
    /// Values above 100 are clamped, and reports lower than the current
    /// progress are ignored. Has no effect once the upload has finished.
    pub fn advance(&mut self, progress: u8) {
        if self.state != UploadState::Uploading {
            return;
        }
        let progress = progress.min(100);
        if progress > self.progress {
            self.progress = progress;
        }
    }

    /// Marks the upload as completed at 100%
    pub fn complete(&mut self) {
        self.progress = 100;
        self.state = UploadState::Completed;
    }

    /// Marks the upload as failed; progress is reset to 0
    pub fn fail(&mut self) {
        self.progress = 0;
        self.state = UploadState::Error;
    }

    /// Returns true once the upload has completed or failed
    pub fn is_finished(&self) -> bool {
        self.state != UploadState::Uploading
    }
}
