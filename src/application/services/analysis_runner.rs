use std::sync::Arc;
use std::time::Instant;

use tokio_util::sync::CancellationToken;

use crate::application::ports::ModelGateway;
use crate::config::{AnalysisSettings, ModelSettings};
use crate::domain::{AnalysisOutcome, ModelConfig, ProviderKind};

use super::analysis_service::{AnalysisError, AnalysisRequest, AnalysisService};
use super::local_model_gate::LocalModelGate;

/// Caller-facing entry point. Validates raw model settings, holds the local
/// model gate for local runs and cancels a run once its deadline passes.
pub struct AnalysisRunner {
    service: Arc<AnalysisService>,
    gateway: Arc<dyn ModelGateway>,
    gate: LocalModelGate,
    settings: AnalysisSettings,
}

impl AnalysisRunner {
    pub fn new(
        service: Arc<AnalysisService>,
        gateway: Arc<dyn ModelGateway>,
        gate: LocalModelGate,
        settings: AnalysisSettings,
    ) -> Self {
        Self {
            service,
            gateway,
            gate,
            settings,
        }
    }

    /// Runs an analysis and reports the result as an [`AnalysisOutcome`],
    /// folding any error into its message.
    pub async fn run(&self, request: &AnalysisRequest, model: ModelSettings) -> AnalysisOutcome {
        let started = Instant::now();
        match self.try_run(request, model).await {
            Ok(outcome) => outcome,
            Err(e) => AnalysisOutcome::failed(e, started.elapsed()),
        }
    }

    pub async fn try_run(
        &self,
        request: &AnalysisRequest,
        model: ModelSettings,
    ) -> Result<AnalysisOutcome, AnalysisError> {
        let config = ModelConfig::try_from(model)?;

        let _permit = match config.kind() {
            ProviderKind::Local => {
                if self.gate.is_busy() {
                    tracing::info!("Local model busy, waiting for the running analysis");
                }
                Some(self.gate.acquire().await)
            }
            ProviderKind::Online => None,
        };

        let deadline = self.settings.deadline_for(config.kind());
        let cancel = CancellationToken::new();
        let analysis = self.service.analyze(request, &config, &cancel);
        tokio::pin!(analysis);

        tokio::select! {
            result = &mut analysis => return result,
            _ = tokio::time::sleep(deadline) => {}
        }

        tracing::warn!(
            deadline_secs = deadline.as_secs(),
            filename = %request.filename,
            "Analysis deadline exceeded, cancelling"
        );
        cancel.cancel();
        // The service still owns the record and marks it failed.
        match analysis.await {
            Ok(outcome) => Ok(outcome),
            Err(_) => Err(AnalysisError::DeadlineExceeded(deadline)),
        }
    }

    pub async fn test_connection(&self, model: ModelSettings) -> Result<(), AnalysisError> {
        let config = ModelConfig::try_from(model)?;
        self.gateway
            .test_connection(&config, &CancellationToken::new())
            .await
            .map_err(AnalysisError::Connection)?;
        tracing::info!(provider = %config.kind(), "Model connection test succeeded");
        Ok(())
    }
}
