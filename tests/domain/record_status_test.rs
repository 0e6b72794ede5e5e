use pactum::domain::RecordStatus;

#[test]
fn given_every_status_when_round_tripping_through_text_then_is_preserved() {
    for status in [
        RecordStatus::Pending,
        RecordStatus::Analyzing,
        RecordStatus::Completed,
        RecordStatus::Failed,
    ] {
        assert_eq!(status.to_string().parse::<RecordStatus>().unwrap(), status);
    }
}

#[test]
fn given_unknown_status_when_parsing_then_fails() {
    assert!("processing".parse::<RecordStatus>().is_err());
}
