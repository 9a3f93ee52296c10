use glimpse_sdk::{
    google::{GoogleModel, GoogleModelOptions},
    LanguageModel, LanguageModelError, LanguageModelInput, ModelUsage,
};
use serde_json::json;
use wiremock::{
    matchers::{body_json, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

fn google_model(server: &MockServer, model_id: &str) -> GoogleModel {
    GoogleModel::new(
        model_id,
        GoogleModelOptions {
            api_key: "g-test".to_string(),
            base_url: Some(server.uri()),
            ..Default::default()
        },
    )
}

#[tokio::test]
async fn generate_sends_generation_config_and_joins_text_parts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-1.5-pro:generateContent"))
        .and(query_param("key", "g-test"))
        .and(body_json(json!({
            "contents": [{ "role": "user", "parts": [{ "text": "Draw a tree" }] }],
            "generationConfig": {
                "temperature": 0.7,
                "topP": 0.95,
                "topK": 40,
                "maxOutputTokens": 8192
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{ "text": "'''\ntree();" }, { "text": "\n'''" }]
                },
                "finishReason": "STOP"
            }],
            "usageMetadata": { "promptTokenCount": 5, "candidatesTokenCount": 9 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let input = LanguageModelInput {
        temperature: Some(0.7),
        top_k: Some(40),
        top_p: Some(0.95),
        max_tokens: Some(8192),
        ..LanguageModelInput::from_prompt("Draw a tree")
    };

    let response = google_model(&server, "gemini-1.5-pro")
        .generate(input)
        .await
        .expect("generate succeeds");

    assert_eq!(response.text(), "'''\ntree();\n'''");
    assert_eq!(
        response.usage,
        Some(ModelUsage {
            input_tokens: 5,
            output_tokens: 9,
        })
    );
}

#[tokio::test]
async fn server_error_is_a_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-1.5-pro:generateContent"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let error = google_model(&server, "gemini-1.5-pro")
        .generate(LanguageModelInput::from_prompt("Hi"))
        .await
        .expect_err("generate fails");

    assert!(matches!(
        error,
        LanguageModelError::StatusCode { status, .. } if status.as_u16() == 503
    ));
}

#[tokio::test]
async fn missing_candidates_is_an_invariant_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-pro:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let error = google_model(&server, "gemini-pro")
        .generate(LanguageModelInput::from_prompt("Hi"))
        .await
        .expect_err("generate fails");

    assert!(matches!(error, LanguageModelError::Invariant("google", _)));
}

#[tokio::test]
async fn unreachable_host_error_omits_api_key() {
    let model = GoogleModel::new(
        "gemini-1.5-pro",
        GoogleModelOptions {
            api_key: "SUPER-SECRET-KEY".to_string(),
            base_url: Some("http://127.0.0.1:1/v1beta".to_string()),
            ..Default::default()
        },
    );

    let error = model
        .generate(LanguageModelInput::from_prompt("Hi"))
        .await
        .expect_err("generate fails");

    assert!(matches!(error, LanguageModelError::Transport(_)));
    assert!(!error.to_string().contains("SUPER-SECRET-KEY"));
    assert!(!format!("{error:?}").contains("SUPER-SECRET-KEY"));
}

#[tokio::test]
async fn undecodable_reply_error_omits_api_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-1.5-pro:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let error = google_model(&server, "gemini-1.5-pro")
        .generate(LanguageModelInput::from_prompt("Hi"))
        .await
        .expect_err("generate fails");

    assert!(matches!(error, LanguageModelError::Transport(_)));
    assert!(!error.to_string().contains("g-test"));
}
