//! Deployment topologies.

use std::{fmt, str::FromStr};

use crate::{
    application::{ConfigMap, NO, OptionValue},
    error::UnknownValueError,
};

/// Well-known deployment option names.
pub mod options {
    pub const APPS_FOLDERS: &str = "appsFolders";
    pub const CLUSTERED_DB_APPS: &str = "clusteredDbApps";
    pub const DEPLOYMENT_TYPE: &str = "deploymentType";
    pub const DIRECTORY_PATH: &str = "directoryPath";
    pub const DOCKER_PUSH_COMMAND: &str = "dockerPushCommand";
    pub const DOCKER_REPOSITORY_NAME: &str = "dockerRepositoryName";
    pub const GATEWAY_TYPE: &str = "gatewayType";
    pub const INGRESS_DOMAIN: &str = "ingressDomain";
    pub const INGRESS_TYPE: &str = "ingressType";
    pub const ISTIO: &str = "istio";
    pub const KUBERNETES_NAMESPACE: &str = "kubernetesNamespace";
    pub const KUBERNETES_SERVICE_TYPE: &str = "kubernetesServiceType";
    pub const KUBERNETES_STORAGE_CLASS_NAME: &str = "kubernetesStorageClassName";
    pub const KUBERNETES_USE_DYNAMIC_STORAGE: &str = "kubernetesUseDynamicStorage";
    pub const MONITORING: &str = "monitoring";
    pub const OPENSHIFT_NAMESPACE: &str = "openshiftNamespace";
    pub const REGISTRY_REPLICAS: &str = "registryReplicas";
    pub const SERVICE_DISCOVERY_TYPE: &str = "serviceDiscoveryType";
    pub const STORAGE_TYPE: &str = "storageType";
}

/// Target platform of a deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeploymentKind {
    DockerCompose,
    Kubernetes,
    Openshift,
}

impl DeploymentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DockerCompose => "docker-compose",
            Self::Kubernetes => "kubernetes",
            Self::Openshift => "openshift",
        }
    }
}

impl FromStr for DeploymentKind {
    type Err = UnknownValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "docker-compose" => Ok(Self::DockerCompose),
            "kubernetes" => Ok(Self::Kubernetes),
            "openshift" => Ok(Self::Openshift),
            _ => Err(UnknownValueError::new("deployment type", s)),
        }
    }
}

impl fmt::Display for DeploymentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `deployment { ... }` declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct JdlDeployment {
    kind: DeploymentKind,
    config: ConfigMap,
}

impl JdlDeployment {
    pub fn new(kind: DeploymentKind, config: ConfigMap) -> Self {
        Self { kind, config }
    }

    pub fn kind(&self) -> DeploymentKind {
        self.kind
    }

    pub fn config(&self) -> &ConfigMap {
        &self.config
    }

    fn text(&self, option: &str) -> Option<&str> {
        self.config.get(option).and_then(OptionValue::as_text)
    }

    pub fn apps_folders(&self) -> &[String] {
        self.config
            .get(options::APPS_FOLDERS)
            .and_then(OptionValue::as_list)
            .unwrap_or_default()
    }

    pub fn gateway_type(&self) -> Option<&str> {
        self.text(options::GATEWAY_TYPE)
    }

    pub fn monitoring(&self) -> Option<&str> {
        self.text(options::MONITORING)
    }

    pub fn kubernetes_service_type(&self) -> Option<&str> {
        self.text(options::KUBERNETES_SERVICE_TYPE)
    }

    pub fn ingress_type(&self) -> Option<&str> {
        self.text(options::INGRESS_TYPE)
    }

    pub fn istio(&self) -> bool {
        self.config
            .get(options::ISTIO)
            .and_then(OptionValue::as_bool)
            .unwrap_or(false)
    }

    pub fn storage_type(&self) -> Option<&str> {
        self.text(options::STORAGE_TYPE)
    }
}

/// Defaults filled into a deployment of the given kind.
///
/// The gateway type, the Kubernetes service type and the storage type are
/// never defaulted: they must be chosen explicitly.
pub fn default_config(kind: DeploymentKind) -> ConfigMap {
    let mut config = ConfigMap::new();
    config.insert(options::APPS_FOLDERS.to_string(), OptionValue::List(Vec::new()));
    config.insert(options::DIRECTORY_PATH.to_string(), OptionValue::text("../"));
    config.insert(options::CLUSTERED_DB_APPS.to_string(), OptionValue::List(Vec::new()));
    config.insert(options::MONITORING.to_string(), OptionValue::text(NO));
    config.insert(
        options::SERVICE_DISCOVERY_TYPE.to_string(),
        OptionValue::text("consul"),
    );

    match kind {
        DeploymentKind::DockerCompose => {}
        DeploymentKind::Kubernetes => {
            config.insert(options::DOCKER_REPOSITORY_NAME.to_string(), OptionValue::text(""));
            config.insert(
                options::DOCKER_PUSH_COMMAND.to_string(),
                OptionValue::text("docker push"),
            );
            config.insert(
                options::KUBERNETES_NAMESPACE.to_string(),
                OptionValue::text("default"),
            );
            config.insert(
                options::KUBERNETES_USE_DYNAMIC_STORAGE.to_string(),
                OptionValue::Boolean(false),
            );
            config.insert(
                options::KUBERNETES_STORAGE_CLASS_NAME.to_string(),
                OptionValue::text(""),
            );
            config.insert(options::ISTIO.to_string(), OptionValue::Boolean(false));
        }
        DeploymentKind::Openshift => {
            config.insert(options::DOCKER_REPOSITORY_NAME.to_string(), OptionValue::text(""));
            config.insert(
                options::DOCKER_PUSH_COMMAND.to_string(),
                OptionValue::text("docker push"),
            );
            config.insert(
                options::OPENSHIFT_NAMESPACE.to_string(),
                OptionValue::text("default"),
            );
            config.insert(options::REGISTRY_REPLICAS.to_string(), OptionValue::Integer(2));
        }
    }
    config
}
