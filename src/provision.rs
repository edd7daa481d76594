// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Pre-install and install flow for Tiller.

use crate::constants::tiller;
use crate::error::{ProvisionError, Result};
use crate::installer::{ComponentInstaller, InstallOptions};
use crate::kubernetes::ClientProvider;
use crate::rbac::RbacConfig;
use crate::types::{CreationOutcome, InstallRequest, PreInstallReport, Response};
use k8s_openapi::api::core::v1::ServiceAccount;
use k8s_openapi::api::rbac::v1::{ClusterRole, ClusterRoleBinding};
use kube::{api::PostParams, Api};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Debug;
use tracing::{error, info, instrument, warn};

/// Runs the two provisioning steps against a cluster context
pub struct Provisioner<P, I> {
    clients: P,
    installer: I,
    rbac: RbacConfig,
    image: String,
    max_history: u32,
}

impl<P: ClientProvider, I: ComponentInstaller> Provisioner<P, I> {
    pub fn new(clients: P, installer: I) -> Self {
        Self {
            clients,
            installer,
            rbac: RbacConfig::default(),
            image: tiller::DEFAULT_IMAGE.to_string(),
            max_history: 0,
        }
    }

    pub fn with_rbac(mut self, rbac: RbacConfig) -> Self {
        self.rbac = rbac;
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    pub fn with_max_history(mut self, max_history: u32) -> Self {
        self.max_history = max_history;
        self
    }

    pub fn rbac(&self) -> &RbacConfig {
        &self.rbac
    }

    fn install_options(&self, request: &InstallRequest) -> InstallOptions {
        InstallOptions {
            namespace: request.namespace.clone(),
            service_account: request.service_account.clone(),
            image: self.image.clone(),
            max_history: self.max_history,
            ..Default::default()
        }
    }

    /// Create the Tiller ServiceAccount, ClusterRoleBinding and ClusterRole.
    ///
    /// All three creates are attempted. Objects that already exist count as
    /// provisioned; any other failure is reported once all three ran. Nothing is
    /// rolled back.
    #[instrument(skip(self, request), fields(context = %request.kube_context))]
    pub async fn pre_install(&self, request: &InstallRequest) -> Result<PreInstallReport> {
        let client = self
            .clients
            .client_for_context(&request.kube_context)
            .await
            .inspect_err(|e| error!("{}", e))?;

        let rbac = &self.rbac;
        let mut report = PreInstallReport::default();

        let service_accounts: Api<ServiceAccount> =
            Api::namespaced(client.clone(), &rbac.namespace);
        let outcome = create_object(&service_accounts, &rbac.service_account()).await;
        report.record(
            format!("ServiceAccount {}/{}", rbac.namespace, rbac.name),
            outcome,
        );

        let bindings: Api<ClusterRoleBinding> = Api::all(client.clone());
        let outcome = create_object(&bindings, &rbac.cluster_role_binding()).await;
        report.record(format!("ClusterRoleBinding {}", rbac.name), outcome);

        let roles: Api<ClusterRole> = Api::all(client);
        let outcome = create_object(&roles, &rbac.cluster_role()).await;
        report.record(format!("ClusterRole {}", rbac.name), outcome);

        let failed = report.failed();
        if !failed.is_empty() {
            return Err(ProvisionError::PreInstall { failed });
        }

        info!("Tiller RBAC objects are in place");
        Ok(report)
    }

    /// Install Tiller, or upgrade it when it already exists and an upgrade was asked for
    #[instrument(
        skip(self, request),
        fields(context = %request.kube_context, namespace = %request.namespace)
    )]
    pub async fn install(&self, request: &InstallRequest) -> Response {
        let options = self.install_options(request);

        let client = match self.clients.client_for_context(&request.kube_context).await {
            Ok(client) => client,
            Err(e) => {
                error!("{}", e);
                return Response::bad_request(e.to_string());
            }
        };

        let message = match self.installer.install(&client, &options).await {
            Ok(()) => {
                info!("Tiller (the Helm server-side component) has been installed into your Kubernetes Cluster.");
                "Tiller installed"
            }
            Err(e) if !e.is_already_exists() => {
                error!("error installing: {}", e);
                return Response::internal_error(format!("error installing: {}", e));
            }
            Err(_) if request.upgrade => {
                if let Err(e) = self.installer.upgrade(&client, &options).await {
                    error!("error when upgrading: {}", e);
                    return Response::internal_error(format!("error when upgrading: {}", e));
                }
                info!("Tiller (the Helm server-side component) has been upgraded to the current version.");
                "Tiller upgraded"
            }
            Err(_) => {
                warn!("Warning: Tiller is already installed in the cluster.");
                "Tiller is already installed"
            }
        };

        info!("Helm install finished");
        Response::ok(message)
    }
}

/// Issue one create call and classify its result
async fn create_object<K>(api: &Api<K>, object: &K) -> CreationOutcome
where
    K: kube::Resource + Clone + Debug + Serialize + DeserializeOwned,
    K::DynamicType: Default,
{
    let name = object.meta().name.clone().unwrap_or_default();
    let kind = K::kind(&Default::default()).to_string();

    match api.create(&PostParams::default(), object).await {
        Ok(_) => {
            info!("Created {} {}", kind, name);
            CreationOutcome::Created
        }
        Err(e) => {
            let err = ProvisionError::from(e);
            if err.is_already_exists() {
                info!("{} {} already exists", kind, name);
                CreationOutcome::AlreadyExists
            } else {
                warn!("Failed to create {} {}: {}", kind, name, err);
                CreationOutcome::Failed(err.to_string())
            }
        }
    }
}
