// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Client resolution for named kubeconfig contexts

use crate::error::{ProvisionError, Result};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config as KConfig};
use std::future::Future;
use tracing::debug;

/// Produces a Kubernetes client bound to a kubeconfig context.
///
/// An empty context name selects the default context. Implementations must not
/// cache clients: every call yields a fresh handle.
pub trait ClientProvider {
    fn client_for_context(&self, context: &str) -> impl Future<Output = Result<Client>> + Send;
}

/// Resolves contexts from a kubeconfig, either the one on disk or one held in memory
#[derive(Clone, Debug, Default)]
pub struct KubeconfigProvider {
    kubeconfig: Option<Kubeconfig>,
}

impl KubeconfigProvider {
    /// Use `$KUBECONFIG` / `~/.kube/config`, or the in-cluster config for the default context
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_kubeconfig(kubeconfig: Kubeconfig) -> Self {
        Self {
            kubeconfig: Some(kubeconfig),
        }
    }

    /// Parse a kubeconfig document
    pub fn from_yaml(kubeconfig: &str) -> Result<Self> {
        let parsed: Kubeconfig = serde_yaml::from_str(kubeconfig).map_err(|e| {
            ProvisionError::ClientResolution(format!("failed to parse kubeconfig: {}", e))
        })?;
        Ok(Self::from_kubeconfig(parsed))
    }

    async fn config_for_context(&self, context: &str) -> Result<KConfig> {
        let options = KubeConfigOptions {
            context: (!context.is_empty()).then(|| context.to_string()),
            ..Default::default()
        };

        let config = match (&self.kubeconfig, options.context.is_some()) {
            (Some(kubeconfig), _) => {
                KConfig::from_custom_kubeconfig(kubeconfig.clone(), &options)
                    .await
                    .map_err(|e| e.to_string())
            }
            (None, false) => KConfig::infer().await.map_err(|e| e.to_string()),
            (None, true) => KConfig::from_kubeconfig(&options)
                .await
                .map_err(|e| e.to_string()),
        };

        config.map_err(|e| {
            ProvisionError::ClientResolution(format!(
                "could not get Kubernetes config for context {:?}: {}",
                context, e
            ))
        })
    }
}

impl ClientProvider for KubeconfigProvider {
    fn client_for_context(&self, context: &str) -> impl Future<Output = Result<Client>> + Send {
        async move {
            let config = self.config_for_context(context).await?;
            debug!("Resolved cluster {} for context {:?}", config.cluster_url, context);

            Client::try_from(config).map_err(|e| {
                ProvisionError::ClientResolution(format!(
                    "could not create Kubernetes client for context {:?}: {}",
                    context, e
                ))
            })
        }
    }
}
