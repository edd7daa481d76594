// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::tiller;
use crate::types::InstallRequest;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::env;

/// Host configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub request: InstallRequest,
    pub image: String,
    pub max_history: u32,
    /// Skip creating the RBAC objects, e.g. when they are managed elsewhere
    pub skip_pre_install: bool,
    pub create_namespace: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_vars(env::vars().collect())
    }

    fn from_vars(vars: HashMap<String, String>) -> Result<Self> {
        let get = |key: &str| vars.get(key).cloned();
        let flag = |key: &str| -> Result<bool> {
            get(key)
                .map(|v| v.parse::<bool>())
                .transpose()
                .with_context(|| format!("{} must be true or false", key))
                .map(|v| v.unwrap_or(false))
        };

        let defaults = InstallRequest::default();
        let request = InstallRequest {
            namespace: get("TILLER_NAMESPACE").unwrap_or(defaults.namespace),
            service_account: get("TILLER_SERVICE_ACCOUNT").unwrap_or(defaults.service_account),
            kube_context: get("KUBE_CONTEXT").unwrap_or_default(),
            upgrade: flag("TILLER_UPGRADE")?,
        };

        let max_history = get("TILLER_HISTORY_MAX")
            .map(|v| v.parse::<u32>())
            .transpose()
            .context("TILLER_HISTORY_MAX must be a non-negative integer")?
            .unwrap_or(0);

        Ok(Config {
            request,
            image: get("TILLER_IMAGE").unwrap_or_else(|| tiller::DEFAULT_IMAGE.to_string()),
            max_history,
            skip_pre_install: flag("TILLER_SKIP_PRE_INSTALL")?,
            create_namespace: flag("TILLER_CREATE_NAMESPACE")?,
        })
    }
}
