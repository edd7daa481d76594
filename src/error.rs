// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("could not get kubernetes client: {0}")]
    ClientResolution(String),

    #[error("Tiller install failed: {0}")]
    InstallError(String),

    #[error("pre-install failed for: {}", .failed.join(", "))]
    PreInstall { failed: Vec<String> },
}

impl ProvisionError {
    /// True when the API server rejected a create because the object is already there.
    ///
    /// Other 409s such as `Conflict` do not count; the status code is only
    /// consulted when the server sent no reason.
    pub fn is_already_exists(&self) -> bool {
        self.has_reason("AlreadyExists", 409)
    }

    pub fn is_not_found(&self) -> bool {
        self.has_reason("NotFound", 404)
    }

    fn has_reason(&self, reason: &str, code: u16) -> bool {
        matches!(
            self,
            ProvisionError::KubeError(kube::Error::Api(err))
                if err.reason == reason || (err.reason.is_empty() && err.code == code)
        )
    }
}

pub type Result<T> = std::result::Result<T, ProvisionError>;
