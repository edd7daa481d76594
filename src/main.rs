// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::Result;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use tiller_bootstrap::config::Config;
use tiller_bootstrap::installer::KubeInstaller;
use tiller_bootstrap::kubernetes::KubeconfigProvider;
use tiller_bootstrap::provision::Provisioner;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    info!(
        "Configuration loaded: context={:?} namespace={} service_account={} upgrade={}",
        config.request.kube_context,
        config.request.namespace,
        config.request.service_account,
        config.request.upgrade
    );

    let installer = KubeInstaller::new().with_namespace_creation(config.create_namespace);
    let provisioner = Provisioner::new(KubeconfigProvider::new(), installer)
        .with_image(config.image.clone())
        .with_max_history(config.max_history);

    if config.skip_pre_install {
        info!("Skipping creation of RBAC objects");
    } else {
        info!(
            "Creating RBAC objects for {}/{}",
            provisioner.rbac().namespace,
            provisioner.rbac().name
        );
        let report = provisioner.pre_install(&config.request).await?;
        info!("Pre-install report: {}", serde_json::to_string(&report)?);
    }

    let response = provisioner.install(&config.request).await;
    println!("{}", serde_json::to_string(&response)?);

    if !response.is_success() {
        error!("Tiller install failed with status {}", response.status_code);
        std::process::exit(1);
    }
    Ok(())
}
