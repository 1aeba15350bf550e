//! aws-sdk-eks implementation of [`EksApi`]

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_eks::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_eks::types::Cluster;
use aws_sdk_eks::Client;
use dockyard_core::{classify_fault, BackendError, BackendResult, Scheduler};

use crate::api::EksApi;

/// [`EksApi`] backed by the AWS SDK
pub struct SdkEksApi {
    client: Client,
}

impl SdkEksApi {
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
    classify_fault(Scheduler::Eks, code.as_deref(), message)
}

#[async_trait]
impl EksApi for SdkEksApi {
    async fn list_cluster_names(&self) -> BackendResult<Vec<String>> {
        self.client
            .list_clusters()
            .into_paginator()
            .items()
            .send()
            .collect::<Result<Vec<_>, _>>()
            .await
            .map_err(sdk_fault)
    }

    async fn describe_cluster(&self, name: &str) -> BackendResult<Cluster> {
        let output = self
            .client
            .describe_cluster()
            .name(name)
            .send()
            .await
            .map_err(sdk_fault)?;

        output
            .cluster
            .ok_or_else(|| BackendError::ResourceNotFound(format!("eks cluster '{}'", name)))
    }
}
