use std::time::Duration;

use crate::config::GatewaySettings;
use crate::domain::ProviderKind;

const NETWORK_OVERHEAD: Duration = Duration::from_secs(30);

/// Request timeout scaled to the number of output tokens the model is asked
/// to generate. Online throughput is assumed lower and less predictable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutPolicy {
    pub base: Duration,
    pub tokens_per_second: u64,
    pub margin: u32,
}

impl TimeoutPolicy {
    pub fn for_kind(kind: ProviderKind, settings: &GatewaySettings) -> Self {
        match kind {
            ProviderKind::Local => Self {
                base: Duration::from_secs(settings.local_base_timeout_secs),
                tokens_per_second: 10,
                margin: 3,
            },
            ProviderKind::Online => Self {
                base: Duration::from_secs(settings.online_base_timeout_secs),
                tokens_per_second: 15,
                margin: 4,
            },
        }
    }

    pub fn dynamic_timeout(&self, expected_tokens: usize) -> Duration {
        let generation = Duration::from_secs(expected_tokens as u64 / self.tokens_per_second);
        generation * self.margin + NETWORK_OVERHEAD
    }

    pub fn timeout_for(&self, expected_tokens: usize) -> Duration {
        self.base.max(self.dynamic_timeout(expected_tokens))
    }
}
