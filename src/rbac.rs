// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! RBAC objects Tiller needs before it is installed.

use crate::constants::rbac;
use k8s_openapi::api::core::v1::ServiceAccount;
use k8s_openapi::api::rbac::v1::{ClusterRole, ClusterRoleBinding, PolicyRule, RoleRef, Subject};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::Resource as _;

/// Identity and permission scope granted to Tiller.
///
/// The default grants every verb on every resource of the core, `extensions`
/// and `apps` API groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RbacConfig {
    /// Name of the ServiceAccount, ClusterRole and ClusterRoleBinding
    pub name: String,
    /// Namespace of the ServiceAccount
    pub namespace: String,
    pub api_groups: Vec<String>,
    pub resources: Vec<String>,
    pub verbs: Vec<String>,
}

impl Default for RbacConfig {
    fn default() -> Self {
        Self {
            name: rbac::NAME.to_string(),
            namespace: rbac::NAMESPACE.to_string(),
            api_groups: to_strings(&rbac::API_GROUPS),
            resources: to_strings(&rbac::RESOURCES),
            verbs: to_strings(&rbac::VERBS),
        }
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

impl RbacConfig {
    pub fn service_account(&self) -> ServiceAccount {
        ServiceAccount {
            metadata: ObjectMeta {
                name: Some(self.name.clone()),
                namespace: Some(self.namespace.clone()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn cluster_role(&self) -> ClusterRole {
        ClusterRole {
            metadata: ObjectMeta {
                name: Some(self.name.clone()),
                ..Default::default()
            },
            rules: Some(vec![PolicyRule {
                api_groups: Some(self.api_groups.clone()),
                resources: Some(self.resources.clone()),
                verbs: self.verbs.clone(),
                ..Default::default()
            }]),
            ..Default::default()
        }
    }

    pub fn cluster_role_binding(&self) -> ClusterRoleBinding {
        ClusterRoleBinding {
            metadata: ObjectMeta {
                name: Some(self.name.clone()),
                ..Default::default()
            },
            role_ref: RoleRef {
                api_group: rbac::API_GROUP.to_string(),
                kind: ClusterRole::KIND.to_string(),
                name: self.name.clone(),
            },
            subjects: Some(vec![Subject {
                kind: ServiceAccount::KIND.to_string(),
                name: self.name.clone(),
                namespace: Some(self.namespace.clone()),
                ..Default::default()
            }]),
        }
    }
}
