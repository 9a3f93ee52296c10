use glimpse_sdk::{
    sdk_test::{MockGenerateResult, MockLanguageModel},
    LanguageModel, LanguageModelError, LanguageModelInput, ModelResponse, Part,
};

#[tokio::test]
async fn mock_language_model_tracks_generate_inputs_and_returns_results() {
    let model = MockLanguageModel::new();

    let response = ModelResponse {
        content: vec![Part::text("Hello, world!")],
        ..ModelResponse::default()
    };

    model
        .enqueue_generate(response.clone())
        .enqueue_generate(MockGenerateResult::error(LanguageModelError::InvalidInput(
            "generate error".to_string(),
        )));

    let first = model
        .generate(LanguageModelInput::from_prompt("Hi"))
        .await
        .expect("first generate should succeed");
    assert_eq!(first, response);

    let err = model
        .generate(LanguageModelInput::from_prompt("Error"))
        .await
        .expect_err("second generate should error");
    assert!(matches!(err, LanguageModelError::InvalidInput(ref msg) if msg == "generate error"));

    let tracked = model.tracked_generate_inputs();
    assert_eq!(tracked.len(), 2);
    assert_eq!(tracked[1], LanguageModelInput::from_prompt("Error"));

    let exhausted = model
        .generate(LanguageModelInput::from_prompt("Again"))
        .await
        .expect_err("queue is empty");
    assert!(matches!(exhausted, LanguageModelError::Invariant("mock", _)));

    model.restore();
    assert!(model.tracked_generate_inputs().is_empty());
}

#[tokio::test]
async fn mock_language_model_reports_overridden_identity() {
    let mut model = MockLanguageModel::new();
    model.set_provider("google");
    model.set_model_id("gemini-pro");

    assert_eq!(model.provider(), "google");
    assert_eq!(model.model_id(), "gemini-pro");

    let err = model
        .generate(LanguageModelInput::from_prompt("Hi"))
        .await
        .expect_err("nothing enqueued");
    assert!(matches!(err, LanguageModelError::Invariant("google", _)));
}
