//! aws-sdk-ecs implementation of [`EcsApi`]

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_ecs::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_ecs::types::{Cluster, ContainerInstance, Service};
use aws_sdk_ecs::Client;
use dockyard_core::{classify_fault, BackendError, BackendResult, Scheduler};

use crate::api::{DescribeFailure, Described, EcsApi};

/// [`EcsApi`] backed by the AWS SDK.
///
/// Construct one per request from the resolved session; the client is not
/// meant to outlive it.
pub struct SdkEcsApi {
    client: Client,
}

impl SdkEcsApi {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: Client::new(config),
        }
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

fn sdk_fault<E, R>(err: SdkError<E, R>) -> BackendError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let code = err.code().map(str::to_string);
    let message = DisplayErrorContext(&err).to_string();
    classify_fault(Scheduler::Ecs, code.as_deref(), message)
}

fn failures(raw: Option<Vec<aws_sdk_ecs::types::Failure>>) -> Vec<DescribeFailure> {
    raw.unwrap_or_default()
        .iter()
        .map(DescribeFailure::from)
        .collect()
}

#[async_trait]
impl EcsApi for SdkEcsApi {
    async fn list_cluster_arns(&self) -> BackendResult<Vec<String>> {
        self.client
            .list_clusters()
            .into_paginator()
            .items()
            .send()
            .collect::<Result<Vec<_>, _>>()
            .await
            .map_err(sdk_fault)
    }

    async fn describe_clusters(&self, ids: &[String]) -> BackendResult<Described<Cluster>> {
        let output = self
            .client
            .describe_clusters()
            .set_clusters(Some(ids.to_vec()))
            .send()
            .await
            .map_err(sdk_fault)?;

        Ok(Described {
            found: output.clusters.unwrap_or_default(),
            failures: failures(output.failures),
        })
    }

    async fn list_container_instance_arns(&self, cluster: &str) -> BackendResult<Vec<String>> {
        self.client
            .list_container_instances()
            .cluster(cluster)
            .into_paginator()
            .items()
            .send()
            .collect::<Result<Vec<_>, _>>()
            .await
            .map_err(sdk_fault)
    }

    async fn describe_container_instances(
        &self,
        cluster: &str,
        ids: &[String],
    ) -> BackendResult<Described<ContainerInstance>> {
        let output = self
            .client
            .describe_container_instances()
            .cluster(cluster)
            .set_container_instances(Some(ids.to_vec()))
            .send()
            .await
            .map_err(sdk_fault)?;

        Ok(Described {
            found: output.container_instances.unwrap_or_default(),
            failures: failures(output.failures),
        })
    }

    async fn list_service_arns(&self, cluster: &str) -> BackendResult<Vec<String>> {
        self.client
            .list_services()
            .cluster(cluster)
            .into_paginator()
            .items()
            .send()
            .collect::<Result<Vec<_>, _>>()
            .await
            .map_err(sdk_fault)
    }

    async fn describe_services(
        &self,
        cluster: &str,
        ids: &[String],
    ) -> BackendResult<Described<Service>> {
        let output = self
            .client
            .describe_services()
            .cluster(cluster)
            .set_services(Some(ids.to_vec()))
            .send()
            .await
            .map_err(sdk_fault)?;

        Ok(Described {
            found: output.services.unwrap_or_default(),
            failures: failures(output.failures),
        })
    }
}
