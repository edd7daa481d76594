// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Tiller Deployment and Service installation and upgrade.

use crate::constants::tiller;
use crate::error::{ProvisionError, Result};
use crate::kubernetes::ensure_namespace_exists;
use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::api::core::v1::{
    Container, ContainerPort, EnvVar, HTTPGetAction, PodSpec, PodTemplateSpec, Probe, Service,
    ServicePort, ServiceSpec,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use kube::{api::PostParams, Api, Client};
use std::collections::BTreeMap;
use std::future::Future;
use tracing::{debug, info, instrument};

/// Parameters of a Tiller installation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOptions {
    pub namespace: String,
    /// Pod service account; empty leaves the namespace default in place
    pub service_account: String,
    pub image: String,
    /// Revisions kept per release, 0 keeps all
    pub max_history: u32,
    pub replicas: i32,
}

impl Default for InstallOptions {
    fn default() -> Self {
        Self {
            namespace: tiller::DEFAULT_NAMESPACE.to_string(),
            service_account: tiller::DEFAULT_SERVICE_ACCOUNT.to_string(),
            image: tiller::DEFAULT_IMAGE.to_string(),
            max_history: 0,
            replicas: 1,
        }
    }
}

/// Installs or upgrades the Tiller workload in a cluster.
///
/// `install` must surface an "already exists" API error untouched so callers can
/// decide between upgrading and leaving the installation alone.
pub trait ComponentInstaller {
    fn install(
        &self,
        client: &Client,
        options: &InstallOptions,
    ) -> impl Future<Output = Result<()>> + Send;

    fn upgrade(
        &self,
        client: &Client,
        options: &InstallOptions,
    ) -> impl Future<Output = Result<()>> + Send;
}

/// Installer talking straight to the Kubernetes API
#[derive(Debug, Clone, Default)]
pub struct KubeInstaller {
    /// Create the target namespace when missing
    pub create_namespace: bool,
}

impl KubeInstaller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_namespace_creation(mut self, create_namespace: bool) -> Self {
        self.create_namespace = create_namespace;
        self
    }
}

impl ComponentInstaller for KubeInstaller {
    fn install(
        &self,
        client: &Client,
        options: &InstallOptions,
    ) -> impl Future<Output = Result<()>> + Send {
        install_tiller(client.clone(), options.clone(), self.create_namespace)
    }

    fn upgrade(
        &self,
        client: &Client,
        options: &InstallOptions,
    ) -> impl Future<Output = Result<()>> + Send {
        upgrade_tiller(client.clone(), options.clone())
    }
}

#[instrument(skip(client, options), fields(namespace = %options.namespace))]
async fn install_tiller(
    client: Client,
    options: InstallOptions,
    create_namespace: bool,
) -> Result<()> {
    if create_namespace {
        ensure_namespace_exists(&client, &options.namespace).await?;
    }

    let deployments: Api<Deployment> = Api::namespaced(client.clone(), &options.namespace);
    deployments
        .create(&PostParams::default(), &tiller_deployment(&options))
        .await?;
    debug!("Created deployment {}/{}", options.namespace, tiller::DEPLOYMENT_NAME);

    create_service(&client, &options).await
}

#[instrument(skip(client, options), fields(namespace = %options.namespace))]
async fn upgrade_tiller(client: Client, options: InstallOptions) -> Result<()> {
    let deployments: Api<Deployment> = Api::namespaced(client.clone(), &options.namespace);
    let mut deployment = deployments.get(tiller::DEPLOYMENT_NAME).await?;

    let pod_spec = deployment
        .spec
        .as_mut()
        .and_then(|spec| spec.template.spec.as_mut())
        .ok_or_else(|| {
            ProvisionError::InstallError(format!(
                "deployment {}/{} has no pod spec",
                options.namespace,
                tiller::DEPLOYMENT_NAME
            ))
        })?;

    let Some(container) = pod_spec.containers.first_mut() else {
        return Err(ProvisionError::InstallError(format!(
            "deployment {}/{} has no containers",
            options.namespace,
            tiller::DEPLOYMENT_NAME
        )));
    };

    debug!("Replacing image {:?} with {}", container.image, options.image);
    container.image = Some(options.image.clone());
    container.image_pull_policy = Some(pull_policy(&options.image).to_string());
    pod_spec.service_account_name = service_account_name(&options);

    deployments
        .replace(tiller::DEPLOYMENT_NAME, &PostParams::default(), &deployment)
        .await?;

    // Older installs may predate the Service
    let services: Api<Service> = Api::namespaced(client.clone(), &options.namespace);
    match services.get(tiller::SERVICE_NAME).await.map_err(ProvisionError::from) {
        Ok(_) => Ok(()),
        Err(e) if e.is_not_found() => {
            info!(
                "Service {}/{} missing, creating it",
                options.namespace,
                tiller::SERVICE_NAME
            );
            create_service(&client, &options).await
        }
        Err(e) => Err(e),
    }
}

async fn create_service(client: &Client, options: &InstallOptions) -> Result<()> {
    let services: Api<Service> = Api::namespaced(client.clone(), &options.namespace);
    services
        .create(&PostParams::default(), &tiller_service(options))
        .await?;
    debug!("Created service {}/{}", options.namespace, tiller::SERVICE_NAME);
    Ok(())
}

fn labels() -> BTreeMap<String, String> {
    tiller::LABELS
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn service_account_name(options: &InstallOptions) -> Option<String> {
    (!options.service_account.is_empty()).then(|| options.service_account.clone())
}

/// Floating `canary` images are always pulled, pinned ones only when absent
fn pull_policy(image: &str) -> &'static str {
    if image.ends_with(":canary") {
        "Always"
    } else {
        "IfNotPresent"
    }
}

fn http_probe(path: &str) -> Probe {
    Probe {
        http_get: Some(HTTPGetAction {
            path: Some(path.to_string()),
            port: IntOrString::Int(tiller::HTTP_PORT),
            ..Default::default()
        }),
        initial_delay_seconds: Some(tiller::PROBE_INITIAL_DELAY_SECS),
        timeout_seconds: Some(tiller::PROBE_TIMEOUT_SECS),
        ..Default::default()
    }
}

/// Deployment running the Tiller container
pub fn tiller_deployment(options: &InstallOptions) -> Deployment {
    Deployment {
        metadata: ObjectMeta {
            name: Some(tiller::DEPLOYMENT_NAME.to_string()),
            namespace: Some(options.namespace.clone()),
            labels: Some(labels()),
            ..Default::default()
        },
        spec: Some(DeploymentSpec {
            replicas: Some(options.replicas),
            selector: LabelSelector {
                match_labels: Some(labels()),
                ..Default::default()
            },
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta {
                    labels: Some(labels()),
                    ..Default::default()
                }),
                spec: Some(PodSpec {
                    service_account_name: service_account_name(options),
                    containers: vec![Container {
                        name: tiller::CONTAINER_NAME.to_string(),
                        image: Some(options.image.clone()),
                        image_pull_policy: Some(pull_policy(&options.image).to_string()),
                        ports: Some(vec![
                            ContainerPort {
                                name: Some(tiller::GRPC_PORT_NAME.to_string()),
                                container_port: tiller::GRPC_PORT,
                                ..Default::default()
                            },
                            ContainerPort {
                                name: Some(tiller::HTTP_PORT_NAME.to_string()),
                                container_port: tiller::HTTP_PORT,
                                ..Default::default()
                            },
                        ]),
                        env: Some(vec![
                            EnvVar {
                                name: tiller::NAMESPACE_ENV.to_string(),
                                value: Some(options.namespace.clone()),
                                ..Default::default()
                            },
                            EnvVar {
                                name: tiller::HISTORY_MAX_ENV.to_string(),
                                value: Some(options.max_history.to_string()),
                                ..Default::default()
                            },
                        ]),
                        liveness_probe: Some(http_probe(tiller::LIVENESS_PATH)),
                        readiness_probe: Some(http_probe(tiller::READINESS_PATH)),
                        ..Default::default()
                    }],
                    ..Default::default()
                }),
            },
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// ClusterIP Service exposing Tiller's gRPC port
pub fn tiller_service(options: &InstallOptions) -> Service {
    Service {
        metadata: ObjectMeta {
            name: Some(tiller::SERVICE_NAME.to_string()),
            namespace: Some(options.namespace.clone()),
            labels: Some(labels()),
            ..Default::default()
        },
        spec: Some(ServiceSpec {
            type_: Some("ClusterIP".to_string()),
            ports: Some(vec![ServicePort {
                name: Some(tiller::GRPC_PORT_NAME.to_string()),
                port: tiller::GRPC_PORT,
                target_port: Some(IntOrString::String(tiller::GRPC_PORT_NAME.to_string())),
                ..Default::default()
            }]),
            selector: Some(labels()),
            ..Default::default()
        }),
        ..Default::default()
    }
}
