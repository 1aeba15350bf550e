//! AWS session resolution
//!
//! The shared `SdkConfig` (credential chain and region) is loaded once at
//! startup. Backend clients are not: every request gets freshly built SDK
//! clients through [`AwsBackendProvider::backends`].

use std::sync::Arc;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use dockyard_core::{BackendProvider, BackendResult, Scheduler, SchedulerBackend};
use dockyard_ecs::EcsBackend;
use dockyard_eks::EksBackend;
use tracing::debug;

use crate::config::{AwsConfig, BackendsConfig};

/// Load the shared AWS session from config, falling back to the default
/// provider chain for anything unset
pub async fn load_sdk_config(aws: &AwsConfig) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = &aws.region {
        loader = loader.region(Region::new(region.clone()));
    }
    if let Some(profile) = &aws.profile {
        loader = loader.profile_name(profile);
    }
    loader.load().await
}

/// [`BackendProvider`] that builds authenticated backends from the session
pub struct AwsBackendProvider {
    sdk_config: SdkConfig,
    enabled: Vec<Scheduler>,
}

impl AwsBackendProvider {
    pub fn new(sdk_config: SdkConfig, backends: BackendsConfig) -> Self {
        Self {
            sdk_config,
            enabled: backends.enabled(),
        }
    }

    pub fn enabled(&self) -> &[Scheduler] {
        &self.enabled
    }
}

#[async_trait]
impl BackendProvider for AwsBackendProvider {
    async fn backends(&self) -> BackendResult<Vec<Arc<dyn SchedulerBackend>>> {
        let backends = self
            .enabled
            .iter()
            .map(|scheduler| -> Arc<dyn SchedulerBackend> {
                match scheduler {
                    Scheduler::Ecs => Arc::new(EcsBackend::from_sdk_config(&self.sdk_config)),
                    Scheduler::Eks => Arc::new(EksBackend::from_sdk_config(&self.sdk_config)),
                }
            })
            .collect::<Vec<_>>();
        debug!(count = backends.len(), "Built request backends");
        Ok(backends)
    }
}
