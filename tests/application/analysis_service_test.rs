use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use pactum::application::ports::{
    AnalysisRecordRepository, ModelGatewayError, TextExtractorError,
};
use pactum::application::services::{
    AnalysisError, AnalysisPrompts, AnalysisRequest, AnalysisService,
};
use pactum::config::AnalysisSettings;
use pactum::domain::{AnalysisRecord, ModelConfig, RecordStatus};
use pactum::infrastructure::persistence::InMemoryRecordRepository;
use pactum::infrastructure::text_processing::NaturalBoundarySplitter;
use tokio_util::sync::CancellationToken;

use crate::mocks::{FailingRepository, MockExtractor, MockGateway, three_paragraph_contract};

const HASH: &str = "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08";

fn local_config() -> ModelConfig {
    ModelConfig::local("http://localhost:1234/v1/chat/completions", "qwen3-4b", 800).unwrap()
}

fn online_config() -> ModelConfig {
    ModelConfig::online(
        "https://api.openai.com/v1/chat/completions",
        "sk-test",
        "gpt-4o",
        2_000,
    )
    .unwrap()
}

fn request() -> AnalysisRequest {
    AnalysisRequest {
        path: PathBuf::from("/contracts/lease.pdf"),
        filename: "lease.pdf".to_string(),
        file_hash: HASH.to_string(),
        file_size: 8_998,
    }
}

fn service(
    extractor: &Arc<MockExtractor>,
    gateway: &Arc<MockGateway>,
    repository: Arc<dyn AnalysisRecordRepository>,
) -> AnalysisService {
    AnalysisService::new(
        extractor.clone(),
        gateway.clone(),
        repository,
        Arc::new(NaturalBoundarySplitter),
    )
}

async fn stored_record(repository: &InMemoryRecordRepository) -> AnalysisRecord {
    repository
        .get_by_hash(HASH)
        .await
        .unwrap()
        .expect("record should exist")
}

#[tokio::test]
async fn given_local_model_when_analyzing_then_maps_fragments_and_consolidates() {
    let extractor = Arc::new(MockExtractor::returning(three_paragraph_contract()));
    let gateway = Arc::new(MockGateway::contract_analyst(
        "## Penalty of 500 EUR ⚠️",
        "Final report: penalty of 500 EUR, courts of Madrid.",
    ));
    let repository = Arc::new(InMemoryRecordRepository::new());
    let service = service(&extractor, &gateway, repository.clone());

    let outcome = service
        .analyze(&request(), &local_config(), &CancellationToken::new())
        .await
        .unwrap();

    assert!(outcome.success);
    assert_eq!(
        outcome.content.as_deref(),
        Some("Final report: penalty of 500 EUR, courts of Madrid.")
    );
    assert_eq!(outcome.fragment_count, 3);
    assert_eq!(gateway.connection_tests(), 1);

    let calls = gateway.calls();
    assert_eq!(calls.len(), 4);
    for (i, call) in calls[..3].iter().enumerate() {
        let prefix = format!("Part {}/3 of the contract:\n", i + 1);
        assert!(call.user_content().starts_with(&prefix));
        assert_eq!(call.max_tokens, 1_200);
    }

    let consolidation = &calls[3];
    assert_eq!(consolidation.max_tokens, 2_000);
    assert!(
        consolidation
            .user_content()
            .starts_with(&AnalysisPrompts::default().consolidation)
    );
    assert!(consolidation.user_content().contains("PART 1/3:\nPenalty of 500 EUR"));
    assert!(consolidation.user_content().contains("PART 3/3:"));

    let record = stored_record(&repository).await;
    assert_eq!(record.status, RecordStatus::Completed);
    assert_eq!(record.fragment_count, 3);
    assert_eq!(record.character_count, 8_998);
    assert_eq!(record.estimated_tokens, 2_999);
    assert_eq!(
        record.analysis_result.as_deref(),
        Some("Final report: penalty of 500 EUR, courts of Madrid.")
    );
    assert!(record.analyzed_at.is_some());
}

#[tokio::test]
async fn given_online_model_and_short_document_when_analyzing_then_sends_single_request() {
    let extractor = Arc::new(MockExtractor::returning(
        "The tenant may terminate the lease with thirty days notice.",
    ));
    let gateway = Arc::new(MockGateway::contract_analyst("unused", "Unilateral termination allowed."));
    let repository = Arc::new(InMemoryRecordRepository::new());
    let service = service(&extractor, &gateway, repository.clone());

    let outcome = service
        .analyze(&request(), &online_config(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(outcome.content.as_deref(), Some("Unilateral termination allowed."));
    assert_eq!(outcome.fragment_count, 1);

    let calls = gateway.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].max_tokens, 2_000);
    assert_eq!(calls[0].messages.len(), 2);
    assert!(
        calls[0]
            .user_content()
            .starts_with(&AnalysisPrompts::default().single_query)
    );
    assert!(calls[0].user_content().ends_with("thirty days notice."));

    let record = stored_record(&repository).await;
    assert_eq!(record.status, RecordStatus::Completed);
    assert_eq!(record.fragment_count, 1);
}

#[tokio::test]
async fn given_unreachable_model_when_analyzing_then_fails_before_extraction() {
    let extractor = Arc::new(MockExtractor::returning(three_paragraph_contract()));
    let gateway =
        Arc::new(MockGateway::contract_analyst("unused", "unused").with_failing_connection());
    let repository = Arc::new(InMemoryRecordRepository::new());
    let service = service(&extractor, &gateway, repository.clone());

    let result = service
        .analyze(&request(), &local_config(), &CancellationToken::new())
        .await;

    assert!(matches!(
        result,
        Err(AnalysisError::Connection(ModelGatewayError::Unavailable(503)))
    ));
    assert_eq!(extractor.calls(), 0);
    assert!(gateway.calls().is_empty());

    let record = stored_record(&repository).await;
    assert_eq!(record.status, RecordStatus::Failed);
    assert!(
        record
            .error_message
            .as_deref()
            .unwrap()
            .contains("connection test failed")
    );
}

#[tokio::test]
async fn given_document_without_text_when_analyzing_then_reports_no_text() {
    let extractor = Arc::new(MockExtractor::returning(" \n\n "));
    let gateway = Arc::new(MockGateway::contract_analyst("unused", "unused"));
    let repository = Arc::new(InMemoryRecordRepository::new());
    let service = service(&extractor, &gateway, repository.clone());

    let result = service
        .analyze(&request(), &local_config(), &CancellationToken::new())
        .await;

    match result {
        Err(AnalysisError::Extraction(TextExtractorError::NoTextFound(name))) => {
            assert_eq!(name, "lease.pdf")
        }
        other => panic!("expected NoTextFound, got {other:?}"),
    }
    assert!(gateway.calls().is_empty());
    assert_eq!(stored_record(&repository).await.status, RecordStatus::Failed);
}

#[tokio::test]
async fn given_failing_extractor_when_analyzing_then_record_is_failed() {
    let extractor = Arc::new(MockExtractor::failing("encrypted document"));
    let gateway = Arc::new(MockGateway::contract_analyst("unused", "unused"));
    let repository = Arc::new(InMemoryRecordRepository::new());
    let service = service(&extractor, &gateway, repository.clone());

    let error = service
        .analyze(&request(), &local_config(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(error.to_string().contains("encrypted document"));
    let record = stored_record(&repository).await;
    assert_eq!(record.status, RecordStatus::Failed);
    assert!(record.analysis_result.is_none());
}

#[tokio::test]
async fn given_second_fragment_fails_when_analyzing_then_aborts_with_its_position() {
    let extractor = Arc::new(MockExtractor::returning(three_paragraph_contract()));
    let gateway = Arc::new(MockGateway::new(|messages| {
        let user = &messages[messages.len() - 1].content;
        if user.starts_with("Part 2/3") {
            Err(ModelGatewayError::Server {
                status: 500,
                body: "model overloaded".to_string(),
            })
        } else {
            Ok("Penalty of 500 EUR.".to_string())
        }
    }));
    let repository = Arc::new(InMemoryRecordRepository::new());
    let service = service(&extractor, &gateway, repository.clone());

    let error = service
        .analyze(&request(), &local_config(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        AnalysisError::Fragment {
            position: 2,
            total: 3,
            ..
        }
    ));
    assert!(error.to_string().contains("error processing part 2/3"));
    assert_eq!(gateway.calls().len(), 2);

    let record = stored_record(&repository).await;
    assert_eq!(record.status, RecordStatus::Failed);
    assert!(
        record
            .error_message
            .as_deref()
            .unwrap()
            .contains("part 2/3")
    );
}

#[tokio::test]
async fn given_consolidation_is_only_formatting_when_analyzing_then_returns_fallback() {
    let extractor = Arc::new(MockExtractor::returning(three_paragraph_contract()));
    let gateway = Arc::new(MockGateway::contract_analyst("Penalty.", "  ### --- 📊 "));
    let repository = Arc::new(InMemoryRecordRepository::new());
    let service = service(&extractor, &gateway, repository.clone());

    let outcome = service
        .analyze(&request(), &local_config(), &CancellationToken::new())
        .await
        .unwrap();

    let fallback = AnalysisPrompts::default().empty_result_fallback;
    assert_eq!(outcome.content.as_deref(), Some(fallback.as_str()));
    assert_eq!(
        stored_record(&repository).await.analysis_result.as_deref(),
        Some(fallback.as_str())
    );
}

#[tokio::test]
async fn given_record_store_offline_when_analyzing_then_analysis_still_succeeds() {
    let extractor = Arc::new(MockExtractor::returning(three_paragraph_contract()));
    let gateway = Arc::new(MockGateway::contract_analyst("Penalty.", "Report."));
    let service = service(&extractor, &gateway, Arc::new(FailingRepository));

    let outcome = service
        .analyze(&request(), &local_config(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(outcome.content.as_deref(), Some("Report."));
    assert_eq!(outcome.fragment_count, 3);
}

async fn seed_completed_record(repository: &InMemoryRecordRepository) -> AnalysisRecord {
    let mut record = AnalysisRecord::new(
        "lease.pdf".to_string(),
        HASH.to_string(),
        8_998,
        &local_config(),
    );
    record.mark_completed("Stored report.".to_string(), 8_998, 2_999, 3, 12.5);
    repository.create(&record).await.unwrap();
    record
}

#[tokio::test]
async fn given_reuse_enabled_and_completed_record_when_analyzing_then_returns_stored_result() {
    let extractor = Arc::new(MockExtractor::returning(three_paragraph_contract()));
    let gateway = Arc::new(MockGateway::contract_analyst("Penalty.", "Fresh report."));
    let repository = Arc::new(InMemoryRecordRepository::new());
    seed_completed_record(&repository).await;
    let settings = AnalysisSettings {
        reuse_completed_analyses: true,
        ..AnalysisSettings::default()
    };
    let service = service(&extractor, &gateway, repository.clone()).with_settings(&settings);

    let outcome = service
        .analyze(&request(), &local_config(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(outcome.content.as_deref(), Some("Stored report."));
    assert_eq!(outcome.fragment_count, 3);
    assert_eq!(gateway.connection_tests(), 0);
    assert!(gateway.calls().is_empty());
    assert_eq!(extractor.calls(), 0);
}

#[tokio::test]
async fn given_reuse_disabled_and_completed_record_when_analyzing_then_reanalyzes_same_record() {
    let extractor = Arc::new(MockExtractor::returning(three_paragraph_contract()));
    let gateway = Arc::new(MockGateway::contract_analyst("Penalty.", "Fresh report."));
    let repository = Arc::new(InMemoryRecordRepository::new());
    let seeded = seed_completed_record(&repository).await;
    let service = service(&extractor, &gateway, repository.clone());

    let outcome = service
        .analyze(&request(), &local_config(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(outcome.content.as_deref(), Some("Fresh report."));
    let record = repository.get_by_id(seeded.id).await.unwrap().unwrap();
    assert_eq!(record.analysis_result.as_deref(), Some("Fresh report."));
    assert_eq!(repository.list_recent(10).await.unwrap().len(), 1);
}

#[tokio::test]
async fn given_file_on_disk_when_building_request_then_hashes_content() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contract.txt");
    tokio::fs::write(&path, "hello").await.unwrap();

    let request = AnalysisRequest::for_file(&path).await.unwrap();

    assert_eq!(request.filename, "contract.txt");
    assert_eq!(request.file_size, 5);
    assert_eq!(
        request.file_hash,
        "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
    );
    assert_eq!(request.path, path);
}

#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn given_completed_analysis_when_logging_then_elapsed_is_whole_seconds() {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .json()
        .with_writer(move || writer.clone())
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);
    let extractor = Arc::new(MockExtractor::returning(three_paragraph_contract()));
    let gateway = Arc::new(MockGateway::contract_analyst("Penalty.", "Report."));
    let service = service(&extractor, &gateway, Arc::new(InMemoryRecordRepository::new()));

    service
        .analyze(&request(), &local_config(), &CancellationToken::new())
        .await
        .unwrap();

    let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
    let completed = output
        .lines()
        .filter_map(|line| serde_json::from_str::<serde_json::Value>(line).ok())
        .find(|event| event["fields"]["message"] == "Analysis completed")
        .expect("completion event should be logged");
    assert!(completed["fields"]["elapsed_secs"].is_u64());
    assert_eq!(completed["fields"]["fragments"], 3);
}
