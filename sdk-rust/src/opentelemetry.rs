use crate::{LanguageModelInput, LanguageModelResult, ModelResponse};
use opentelemetry::trace::Status;
use std::{future::Future, time::Instant};
use tracing::{info_span, Span};
use tracing_futures::Instrument;
use tracing_opentelemetry::OpenTelemetrySpanExt;

/// Run a provider call inside a `glimpse_sdk.generate` span carrying the
/// `gen_ai.*` request attributes, then record usage or the error on it.
pub async fn trace_generate<F, Fut>(
    provider: &'static str,
    model_id: &str,
    input: LanguageModelInput,
    call: F,
) -> LanguageModelResult<ModelResponse>
where
    F: FnOnce(LanguageModelInput) -> Fut,
    Fut: Future<Output = LanguageModelResult<ModelResponse>>,
{
    let span = info_span!("glimpse_sdk.generate", provider, model_id);
    record_request(&span, provider, model_id, &input);

    let started = Instant::now();
    let result = call(input).instrument(span.clone()).await;
    span.set_attribute("glimpse_sdk.duration_seconds", started.elapsed().as_secs_f64());

    match &result {
        Ok(response) => {
            if let Some(usage) = &response.usage {
                span.set_attribute("gen_ai.usage.input_tokens", i64::from(usage.input_tokens));
                span.set_attribute("gen_ai.usage.output_tokens", i64::from(usage.output_tokens));
            }
        }
        Err(error) => {
            span.set_attribute("exception.message", error.to_string());
            span.set_status(Status::error(error.to_string()));
        }
    }

    result
}

fn record_request(span: &Span, provider: &'static str, model_id: &str, input: &LanguageModelInput) {
    span.set_attribute("gen_ai.operation.name", "generate_content");
    span.set_attribute("gen_ai.provider.name", provider);
    span.set_attribute("gen_ai.request.model", model_id.to_string());

    if let Some(max_tokens) = input.max_tokens {
        span.set_attribute("gen_ai.request.max_tokens", i64::from(max_tokens));
    }
    if let Some(temperature) = input.temperature {
        span.set_attribute("gen_ai.request.temperature", temperature);
    }
    if let Some(top_p) = input.top_p {
        span.set_attribute("gen_ai.request.top_p", top_p);
    }
    if let Some(top_k) = input.top_k {
        span.set_attribute("gen_ai.request.top_k", i64::from(top_k));
    }
}
