// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Namespace management utilities

use crate::error::{ProvisionError, Result};
use k8s_openapi::api::core::v1::Namespace;
use kube::{
    api::{ObjectMeta, PostParams},
    Api, Client,
};
use tracing::{debug, info, instrument};

/// Ensure the namespace Tiller is installed into exists, create it if it doesn't
#[instrument(skip(client))]
pub async fn ensure_namespace_exists(client: &Client, namespace: &str) -> Result<()> {
    let namespaces: Api<Namespace> = Api::all(client.clone());

    match namespaces.get(namespace).await.map_err(ProvisionError::from) {
        Ok(_) => {
            debug!("Namespace {} already exists", namespace);
            Ok(())
        }
        Err(e) if e.is_not_found() => {
            info!("Creating namespace {}", namespace);
            let ns = Namespace {
                metadata: ObjectMeta {
                    name: Some(namespace.to_string()),
                    ..Default::default()
                },
                ..Default::default()
            };
            match namespaces
                .create(&PostParams::default(), &ns)
                .await
                .map_err(ProvisionError::from)
            {
                Ok(_) => info!("Namespace {} created", namespace),
                // Lost a race with another creator
                Err(e) if e.is_already_exists() => {
                    debug!("Namespace {} appeared concurrently", namespace)
                }
                Err(e) => return Err(e),
            }
            Ok(())
        }
        Err(e) => Err(ProvisionError::InstallError(format!(
            "Failed to check/create namespace {}: {}",
            namespace, e
        ))),
    }
}
