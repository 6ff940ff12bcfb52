//! Cloud upload for Inkpad
//!
//! Sends the visible document to a GitHub gist or an anonymous paste
//! service. Requests run on a background thread so the UI keeps painting;
//! the caller polls the returned [`UploadJob`] each frame.

mod gist;
mod http;
mod paste;
mod token;

pub use token::{clear_token, load_token, save_token};

use gist::upload_gist;
use paste::upload_paste;

use crate::error::{Error, Result};
use log::warn;
use std::sync::mpsc::{self, Receiver, TryRecvError};

/// Where an upload goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadTarget {
    Gist { token: String, public: bool },
    Paste { service_url: String },
}

impl UploadTarget {
    pub fn label(&self) -> &'static str {
        match self {
            UploadTarget::Gist { .. } => "GitHub Gist",
            UploadTarget::Paste { .. } => "Paste",
        }
    }
}

/// Everything needed to perform one upload.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub target: UploadTarget,
    pub file_name: String,
    pub content: String,
    pub is_code_mode: bool,
}

impl UploadRequest {
    /// Run the upload on the current thread.
    pub fn perform(&self) -> Result<String> {
        if self.content.trim().is_empty() {
            return Err(Error::Validation("Nothing to upload".to_string()));
        }
        match &self.target {
            UploadTarget::Gist { token, public } => upload_gist(
                token,
                &self.file_name,
                &self.content,
                "Uploaded from Inkpad",
                *public,
            ),
            UploadTarget::Paste { service_url } => {
                upload_paste(service_url, &self.content, self.is_code_mode)
            }
        }
    }
}

/// An upload running on a background thread.
pub struct UploadJob {
    target_label: &'static str,
    receiver: Receiver<Result<String>>,
}

impl UploadJob {
    /// Start `request` on a worker thread.
    pub fn spawn(request: UploadRequest) -> Result<Self> {
        let (sender, receiver) = mpsc::channel();
        let target_label = request.target.label();
        std::thread::Builder::new()
            .name("inkpad-upload".to_string())
            .spawn(move || {
                let result = request.perform();
                if let Err(e) = &result {
                    warn!("{} upload failed: {}", target_label, e);
                }
                // The receiver is gone if the dialog was closed
                let _ = sender.send(result);
            })?;
        Ok(Self {
            target_label,
            receiver,
        })
    }

    pub fn target_label(&self) -> &'static str {
        self.target_label
    }

    /// Returns the outcome once the worker has finished.
    pub fn poll(&self) -> Option<Result<String>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(Error::RemoteService(
                "Upload stopped unexpectedly".to_string(),
            ))),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
