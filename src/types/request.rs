// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::tiller;
use serde::{Deserialize, Serialize};

/// What to install, where, and how to treat an existing installation
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InstallRequest {
    /// Namespace Tiller is installed into
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// ServiceAccount the Tiller pod runs as
    #[serde(default = "default_service_account")]
    pub service_account: String,
    /// Kubeconfig context to act as; empty means the default context
    #[serde(default)]
    pub kube_context: String,
    /// Upgrade an existing installation instead of leaving it alone
    #[serde(default)]
    pub upgrade: bool,
}

fn default_namespace() -> String {
    tiller::DEFAULT_NAMESPACE.to_string()
}

fn default_service_account() -> String {
    tiller::DEFAULT_SERVICE_ACCOUNT.to_string()
}

impl Default for InstallRequest {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            service_account: default_service_account(),
            kube_context: String::new(),
            upgrade: false,
        }
    }
}
