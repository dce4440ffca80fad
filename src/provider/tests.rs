use super::client::ChatStream;
use super::kind::ProviderKind;
use super::pricing::{ModelPrice, PriceTable};
use super::*;
use crate::config::Credentials;
use crate::message::Message;
use futures::StreamExt;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sse_body(lines: &[&str]) -> String {
    lines.iter().map(|l| format!("data: {l}\n\n")).collect()
}

fn delta(text: &str) -> String {
    json!({"choices": [{"delta": {"content": text}}]}).to_string()
}

fn credentials(server: &MockServer) -> Credentials {
    Credentials {
        openai_api_key: Some("sk-openai".to_string()),
        openrouter_api_key: Some("sk-router".to_string()),
        gemini_api_key: Some("g-key".to_string()),
        openai_base_url: Some(format!("{}/openai", server.uri())),
        openrouter_base_url: Some(format!("{}/openrouter", server.uri())),
        gemini_base_url: Some(format!("{}/v1beta/models", server.uri())),
    }
}

async fn collect(stream: ChatStream) -> Vec<String> {
    stream.map(|r| r.unwrap()).collect().await
}

#[test]
fn test_factory_skips_providers_without_credentials() {
    let creds = Credentials {
        openrouter_api_key: Some("sk-router".to_string()),
        gemini_api_key: Some(String::new()),
        ..Credentials::default()
    };
    let factory = ProviderFactory::from_credentials(&creds).unwrap();
    assert_eq!(factory.provider_names(), vec!["openrouter"]);

    let (provider, model) = factory.resolve("openrouter/deepseek/chat:free").unwrap();
    assert_eq!(provider.name(), ProviderKind::OpenRouter.name());
    assert_eq!(model, "deepseek/chat:free");
    assert!(factory.resolve("OpenRouter/deepseek/chat:free").is_some());
    assert!(factory.resolve("gemini/gemini-pro").is_none());
    assert!(factory.resolve("openai/gpt-4o").is_none());
    assert!(factory.resolve("openrouter").is_none());
}

#[tokio::test]
async fn test_openrouter_listing_captures_prices() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/openrouter/models"))
        .and(header("authorization", "Bearer sk-router"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"id": "z/model", "pricing": {"prompt": "0.001", "completion": "0.002"}},
                {"id": "a/model", "pricing": {"prompt": "0", "completion": "0"}}
            ]
        })))
        .mount(&server)
        .await;

    let creds = Credentials {
        gemini_api_key: None,
        openai_api_key: None,
        ..credentials(&server)
    };
    let mut factory = ProviderFactory::from_credentials(&creds).unwrap();
    let catalog = factory.fetch_models().await;
    assert_eq!(catalog.models("openrouter"), ["a/model", "z/model"]);

    let (provider, _) = factory.resolve("openrouter/z/model").unwrap();
    let cost = provider.calculate_cost(10, 2, "z/model").unwrap();
    assert!((cost - 0.014).abs() < 1e-12);
    assert_eq!(provider.calculate_cost(10, 2, "a/model"), Some(0.0));
    assert_eq!(provider.calculate_cost(10, 2, "unlisted"), None);
}

#[tokio::test]
async fn test_openai_listing_has_no_prices() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/openai/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": "gpt-x", "pricing": {"prompt": "1", "completion": "1"}}]
        })))
        .mount(&server)
        .await;

    let mut factory = ProviderFactory::from_credentials(&credentials(&server)).unwrap();
    let provider = factory.get_mut("openai").unwrap();
    let (name, models) = provider.get_models().await;
    assert_eq!(name, "openai");
    assert_eq!(models, vec!["gpt-x"]);
    assert_eq!(provider.calculate_cost(1, 1, "gpt-x"), None);
}

#[tokio::test]
async fn test_listing_failure_is_isolated() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/openrouter/models"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/openai/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": "gpt-b"}, {"id": "gpt-a"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1beta/models"))
        .and(query_param("key", "g-key"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let mut factory = ProviderFactory::from_credentials(&credentials(&server)).unwrap();
    let provider = factory.get_mut("openrouter").unwrap();
    assert_eq!(provider.get_models().await, ("openrouter".to_string(), Vec::new()));

    let catalog = factory.fetch_models().await;
    assert!(catalog.models("openrouter").is_empty());
    assert!(catalog.models("gemini").is_empty());
    assert_eq!(catalog.models("openai"), ["gpt-a", "gpt-b"]);
}

#[tokio::test]
async fn test_gemini_listing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1beta/models"))
        .and(query_param("key", "g-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "models": [
                {"name": "models/gemini-pro", "supportedGenerationMethods": ["generateContent"]},
                {"name": "models/embedding-001", "supportedGenerationMethods": ["embedContent"]}
            ]
        })))
        .mount(&server)
        .await;

    let mut factory = ProviderFactory::from_credentials(&credentials(&server)).unwrap();
    let (name, models) = factory.get_mut("gemini").unwrap().get_models().await;
    assert_eq!(name, "gemini");
    assert_eq!(models, vec!["gemini-pro"]);
}

#[tokio::test]
async fn test_openai_stream_chat() {
    let server = MockServer::start().await;
    let messages = vec![Message::system("sys"), Message::user("hi")];
    Mock::given(method("POST"))
        .and(path("/openai/chat/completions"))
        .and(header("authorization", "Bearer sk-openai"))
        .and(body_json(json!({
            "model": "gpt-x",
            "messages": [
                {"role": "system", "content": "sys"},
                {"role": "user", "content": "hi"}
            ],
            "stream": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            sse_body(&[&delta("Hel"), &delta("lo"), "[DONE]", &delta("ignored")]),
            "text/event-stream",
        ))
        .mount(&server)
        .await;

    let factory = ProviderFactory::from_credentials(&credentials(&server)).unwrap();
    let (provider, model) = factory.resolve("openai/gpt-x").unwrap();
    let fragments = collect(provider.stream_chat(&messages, model).await.unwrap()).await;
    assert_eq!(fragments, vec!["Hel", "lo"]);
}

#[tokio::test]
async fn test_stream_chat_propagates_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/openrouter/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .mount(&server)
        .await;

    let factory = ProviderFactory::from_credentials(&credentials(&server)).unwrap();
    let (provider, model) = factory.resolve("openrouter/x/y").unwrap();
    let err = provider
        .stream_chat(&[Message::user("hi")], model)
        .await
        .err()
        .unwrap();
    assert_eq!(err.status(), Some(429));
    assert_eq!(err.to_string(), "API Error 429: slow down");
}

#[tokio::test]
async fn test_gemini_stream_chat() {
    let server = MockServer::start().await;
    let messages = vec![Message::system("Be terse."), Message::user("Hi")];
    let chunk = |t: &str| {
        json!({"candidates": [{"content": {"parts": [{"text": t}], "role": "model"}}]}).to_string()
    };
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-pro:streamGenerateContent"))
        .and(query_param("key", "g-key"))
        .and(query_param("alt", "sse"))
        .and(body_json(json!({
            "contents": [{"role": "user", "parts": [{"text": "Be terse.\n\nHi"}]}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            sse_body(&[&chunk("Hel"), "{\"candidates\": []}", &chunk("lo")]),
            "text/event-stream",
        ))
        .mount(&server)
        .await;

    let factory = ProviderFactory::from_credentials(&credentials(&server)).unwrap();
    let (provider, model) = factory.resolve("gemini/gemini-pro").unwrap();
    let fragments = collect(provider.stream_chat(&messages, model).await.unwrap()).await;
    assert_eq!(fragments, vec!["Hel", "lo"]);
    assert_eq!(provider.calculate_cost(10, 10, "gemini-pro"), None);
}

#[test]
fn test_set_prices_only_affects_openai_compatible() {
    let creds = Credentials {
        openai_api_key: Some("k".to_string()),
        gemini_api_key: Some("k".to_string()),
        ..Credentials::default()
    };
    let mut factory = ProviderFactory::from_credentials(&creds).unwrap();
    let mut table = PriceTable::new();
    table.insert(
        "gpt-x".to_string(),
        ModelPrice {
            input: 0.5,
            output: 1.0,
        },
    );
    factory.get_mut("openai").unwrap().set_prices(table.clone());
    factory.get_mut("gemini").unwrap().set_prices(table);

    let (openai, _) = factory.resolve("openai/gpt-x").unwrap();
    assert_eq!(openai.calculate_cost(2, 3, "gpt-x"), Some(4.0));
    let (gemini, _) = factory.resolve("gemini/gpt-x").unwrap();
    assert_eq!(gemini.calculate_cost(2, 3, "gpt-x"), None);
}
