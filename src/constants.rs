// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Defaults for the RBAC objects created before Tiller is installed
pub mod rbac {
    /// Name shared by the ServiceAccount, ClusterRole and ClusterRoleBinding
    pub const NAME: &str = "tiller";
    /// Namespace the ServiceAccount is created in
    pub const NAMESPACE: &str = "kube-system";
    /// API group of ClusterRole references
    pub const API_GROUP: &str = "rbac.authorization.k8s.io";
    pub const API_GROUPS: [&str; 3] = ["", "extensions", "apps"];
    pub const RESOURCES: [&str; 1] = ["*"];
    pub const VERBS: [&str; 1] = ["*"];
}

/// Tiller workload layout
pub mod tiller {
    pub const DEPLOYMENT_NAME: &str = "tiller-deploy";
    pub const SERVICE_NAME: &str = "tiller-deploy";
    pub const CONTAINER_NAME: &str = "tiller";
    pub const DEFAULT_NAMESPACE: &str = "kube-system";
    pub const DEFAULT_SERVICE_ACCOUNT: &str = "tiller";
    pub const DEFAULT_IMAGE: &str = "gcr.io/kubernetes-helm/tiller:v2.9.1";

    pub const GRPC_PORT_NAME: &str = "tiller";
    pub const GRPC_PORT: i32 = 44134;
    pub const HTTP_PORT_NAME: &str = "http";
    pub const HTTP_PORT: i32 = 44135;

    pub const LIVENESS_PATH: &str = "/liveness";
    pub const READINESS_PATH: &str = "/readiness";
    pub const PROBE_INITIAL_DELAY_SECS: i32 = 1;
    pub const PROBE_TIMEOUT_SECS: i32 = 1;

    /// Env var telling Tiller which namespace it stores releases in
    pub const NAMESPACE_ENV: &str = "TILLER_NAMESPACE";
    /// Env var capping the number of stored release revisions (0 = unlimited)
    pub const HISTORY_MAX_ENV: &str = "TILLER_HISTORY_MAX";

    /// Labels on the Deployment, its pods, and the Service selector
    pub const LABELS: [(&str, &str); 2] = [("app", "helm"), ("name", "tiller")];
}
