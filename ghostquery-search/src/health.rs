//! Concurrent liveness probing of configured providers.

use crate::provider::Provider;
use crate::types::ProviderKind;
use serde::Serialize;

/// One provider's probe verdict.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    /// Which upstream was probed.
    pub provider: ProviderKind,
    /// Whether the upstream is considered available.
    pub healthy: bool,
}

/// Probe every provider concurrently and collect the verdicts in provider
/// order. A slow probe never delays the others beyond the join barrier.
pub async fn probe_all(providers: &[Provider]) -> Vec<HealthReport> {
    let probes = providers.iter().map(|provider| async {
        let healthy = provider.probe().await;
        HealthReport {
            provider: provider.kind(),
            healthy,
        }
    });
    futures::future::join_all(probes).await
}
