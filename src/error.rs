// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use kube::core::ErrorResponse;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PeerSyncError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Resource not found: {}", .0.message)]
    NotFound(ErrorResponse),

    #[error("Resource version conflict: {}", .0.message)]
    Conflict(ErrorResponse),

    #[error("Kubernetes API error: {0}")]
    Transport(kube::Error),

    #[error("Failed to build request: {0}")]
    Request(#[from] http::Error),

    #[error("Failed to encode resource: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Gave up waiting after {attempts} attempts")]
    Timeout { attempts: usize },
}

impl PeerSyncError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, PeerSyncError::NotFound(_))
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, PeerSyncError::Conflict(_))
    }
}

impl From<kube::Error> for PeerSyncError {
    fn from(err: kube::Error) -> Self {
        match err {
            kube::Error::Api(resp) if resp.code == 404 => PeerSyncError::NotFound(resp),
            kube::Error::Api(resp) if resp.code == 409 => PeerSyncError::Conflict(resp),
            other => PeerSyncError::Transport(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, PeerSyncError>;
