use pactum::domain::{ConfigurationError, ModelConfig, ModelProvider, ProviderKind};

#[test]
fn given_local_endpoint_when_creating_config_then_is_local_without_authorization() {
    let config = ModelConfig::local("http://localhost:1234/v1/chat/completions", "", 800).unwrap();

    assert_eq!(config.kind(), ProviderKind::Local);
    assert!(!config.is_online());
    assert_eq!(config.model_name(), "");
    assert_eq!(config.authorization_header(), None);
    assert_eq!(config.requested_max_output_tokens(), 800);
}

#[test]
fn given_online_endpoint_when_creating_config_then_builds_bearer_header() {
    let config = ModelConfig::online(
        "https://api.openai.com/v1/chat/completions",
        "sk-test",
        " gpt-4o ",
        2_000,
    )
    .unwrap();

    assert!(config.is_online());
    assert_eq!(config.model_name(), "gpt-4o");
    assert_eq!(config.authorization_header().as_deref(), Some("Bearer sk-test"));
    assert_eq!(config.endpoint_url(), "https://api.openai.com/v1/chat/completions");
}

#[test]
fn given_missing_fields_when_creating_config_then_rejects() {
    assert_eq!(
        ModelConfig::local("  ", "qwen", 800),
        Err(ConfigurationError::MissingEndpoint(ProviderKind::Local))
    );
    assert_eq!(
        ModelConfig::online("https://api", "", "gpt-4o", 800),
        Err(ConfigurationError::MissingApiKey)
    );
    assert_eq!(
        ModelConfig::online("https://api", "sk", "", 800),
        Err(ConfigurationError::MissingModelName)
    );
    assert_eq!(
        ModelConfig::local("http://localhost", "qwen", 0),
        Err(ConfigurationError::NonPositiveMaxTokens)
    );
}

#[test]
fn given_online_provider_when_debug_printing_then_redacts_api_key() {
    let provider = ModelProvider::Online {
        endpoint_url: "https://api".to_string(),
        api_key: "sk-secret".to_string(),
    };

    let printed = format!("{provider:?}");

    assert!(!printed.contains("sk-secret"));
    assert!(printed.contains("[REDACTED]"));
}
