use pactum::domain::{AnalysisRecord, ModelConfig, ProviderKind, RecordStatus};

fn config() -> ModelConfig {
    ModelConfig::local("http://localhost:11434/api/chat", "qwen3:4b", 1_200).unwrap()
}

fn record() -> AnalysisRecord {
    AnalysisRecord::new("lease.pdf".to_string(), "abc".to_string(), 1_024, &config())
}

#[test]
fn given_new_record_when_created_then_is_pending_with_model_details() {
    let record = record();

    assert_eq!(record.status, RecordStatus::Pending);
    assert_eq!(record.provider, ProviderKind::Local);
    assert_eq!(record.model_name, "qwen3:4b");
    assert_eq!(record.max_tokens, 1_200);
    assert_eq!(record.file_size, 1_024);
    assert!(record.analysis_result.is_none());
    assert!(record.analyzed_at.is_none());
    assert_eq!(record.created_at, record.updated_at);
}

#[test]
fn given_two_records_when_created_then_ids_differ() {
    assert_ne!(record().id, record().id);
}

#[test]
fn given_analyzing_record_when_completed_then_stores_result_and_metrics() {
    let mut record = record();
    record.mark_analyzing();
    assert_eq!(record.status, RecordStatus::Analyzing);

    record.mark_completed("Report.".to_string(), 9_000, 3_000, 3, 42.5);

    assert_eq!(record.status, RecordStatus::Completed);
    assert_eq!(record.analysis_result.as_deref(), Some("Report."));
    assert_eq!(record.character_count, 9_000);
    assert_eq!(record.estimated_tokens, 3_000);
    assert_eq!(record.fragment_count, 3);
    assert_eq!(record.processing_seconds, 42.5);
    assert!(record.analyzed_at.is_some());
    assert_eq!(record.completed_result(), Some("Report."));
}

#[test]
fn given_failed_record_when_reanalyzing_then_clears_error_message() {
    let mut record = record();
    record.mark_failed("timeout: no response");
    assert_eq!(record.status, RecordStatus::Failed);
    assert_eq!(record.error_message.as_deref(), Some("timeout: no response"));
    assert_eq!(record.completed_result(), None);

    record.mark_analyzing();

    assert_eq!(record.status, RecordStatus::Analyzing);
    assert!(record.error_message.is_none());
}

#[test]
fn given_completed_record_with_blank_result_when_reading_then_has_no_completed_result() {
    let mut record = record();
    record.mark_completed("   ".to_string(), 10, 3, 1, 1.0);

    assert_eq!(record.completed_result(), None);
}
