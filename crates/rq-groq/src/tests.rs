//! Snapshot tests for the Groq client

#[cfg(test)]
mod snapshot_tests {
    use crate::{GroqClient, GroqConfig, LLMProvider};
    use insta::assert_yaml_snapshot;

    #[test]
    fn test_redacted_config_snapshot() {
        let config = GroqConfig::new("gsk_live_0123456789abcd")
            .with_api_url("https://api.groq.com/openai/v1/");

        assert_yaml_snapshot!(config.redacted(), @r###"
        ---
        api_key: "****abcd"
        api_url: "https://api.groq.com/openai/v1"
        model: llama-3.1-8b-instant
        "###);
    }

    #[test]
    fn test_model_override() {
        let client = GroqClient::new(GroqConfig::new("gsk_test"))
            .unwrap()
            .with_model(GroqClient::LLAMA_3_3_70B_VERSATILE);

        assert_eq!(client.model_id(), "llama-3.3-70b-versatile");
    }

    #[test]
    fn test_model_constants() {
        assert_yaml_snapshot!(GroqClient::LLAMA_3_1_8B_INSTANT, @"llama-3.1-8b-instant");
    }
}
