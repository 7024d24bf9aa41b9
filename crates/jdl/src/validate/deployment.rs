//! Deployment rules, checked in the context of the deployed application.

use jdl_core::{
    application::{ApplicationType, DatabaseType},
    deployment::{DeploymentKind, JdlDeployment},
};

use super::{Result, ValidationError};

/// What the deployment rules need to know about the deployed application.
#[derive(Debug, Clone, Copy)]
pub(super) struct DeploymentContext<'a> {
    pub application_type: ApplicationType,
    pub database_type: DatabaseType,
    pub search_engine: Option<&'a str>,
}

pub(super) fn validate_deployment(
    deployment: &JdlDeployment,
    ctx: &DeploymentContext<'_>,
) -> Result<()> {
    match deployment.kind() {
        DeploymentKind::DockerCompose => {
            if ctx.application_type == ApplicationType::Microservice
                && deployment.gateway_type().is_none()
            {
                return Err(ValidationError::MissingGatewayType);
            }
        }
        DeploymentKind::Kubernetes => {
            let Some(service_type) = deployment.kubernetes_service_type() else {
                return Err(ValidationError::MissingServiceType(
                    deployment.kind().to_string(),
                ));
            };
            if service_type == "Ingress"
                && deployment.istio()
                && deployment.ingress_type().is_none()
            {
                return Err(ValidationError::MissingIngressType);
            }
        }
        DeploymentKind::Openshift => {}
    }

    if deployment.storage_type().is_some() {
        let incompatible = if ctx.database_type == DatabaseType::No {
            Some("no database")
        } else if ctx.search_engine == Some("elasticsearch") {
            Some("Elasticsearch")
        } else if deployment.monitoring() == Some("prometheus") {
            Some("Prometheus monitoring")
        } else {
            None
        };
        if let Some(reason) = incompatible {
            return Err(ValidationError::IncompatibleStorageType {
                kind: deployment.kind().to_string(),
                reason: reason.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use jdl_core::{
        application::{ConfigMap, OptionValue},
        deployment::{default_config, options},
    };

    use super::*;

    const MONOLITH_SQL: DeploymentContext<'static> = DeploymentContext {
        application_type: ApplicationType::Monolith,
        database_type: DatabaseType::Sql,
        search_engine: None,
    };

    fn deployment(kind: DeploymentKind, entries: &[(&str, OptionValue)]) -> JdlDeployment {
        let mut config: ConfigMap = entries
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect();
        for (name, value) in default_config(kind) {
            config.entry(name).or_insert(value);
        }
        JdlDeployment::new(kind, config)
    }

    #[test]
    fn test_docker_compose_gateway_for_microservices() {
        let compose = deployment(DeploymentKind::DockerCompose, &[]);
        assert_eq!(validate_deployment(&compose, &MONOLITH_SQL), Ok(()));

        let microservice = DeploymentContext {
            application_type: ApplicationType::Microservice,
            ..MONOLITH_SQL
        };
        assert_eq!(
            validate_deployment(&compose, &microservice),
            Err(ValidationError::MissingGatewayType)
        );
    }

    #[test]
    fn test_kubernetes_service_and_ingress() {
        let bare = deployment(DeploymentKind::Kubernetes, &[]);
        assert_eq!(
            validate_deployment(&bare, &MONOLITH_SQL),
            Err(ValidationError::MissingServiceType("kubernetes".to_string()))
        );

        let ingress = deployment(
            DeploymentKind::Kubernetes,
            &[
                (options::KUBERNETES_SERVICE_TYPE, OptionValue::text("Ingress")),
                (options::ISTIO, OptionValue::Boolean(true)),
            ],
        );
        assert_eq!(
            validate_deployment(&ingress, &MONOLITH_SQL),
            Err(ValidationError::MissingIngressType)
        );
    }

    #[test]
    fn test_storage_type_conflicts() {
        let persistent = deployment(
            DeploymentKind::Openshift,
            &[(options::STORAGE_TYPE, OptionValue::text("persistent"))],
        );
        assert_eq!(validate_deployment(&persistent, &MONOLITH_SQL), Ok(()));

        let search = DeploymentContext {
            search_engine: Some("elasticsearch"),
            ..MONOLITH_SQL
        };
        assert_eq!(
            validate_deployment(&persistent, &search).unwrap_err().to_string(),
            "The storage type of a openshift deployment can not be used with Elasticsearch."
        );

        let no_database = DeploymentContext {
            database_type: DatabaseType::No,
            ..MONOLITH_SQL
        };
        assert!(validate_deployment(&persistent, &no_database).is_err());
    }
}
