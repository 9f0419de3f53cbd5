use krishi_genai::{
    google::{GoogleBackend, GoogleBackendOptions},
    Content, GenerateRequest, GenerativeBackend, Part,
};
use serde_json::{json, Value};
use std::{env, sync::OnceLock};

fn google_api_key() -> &'static String {
    static KEY: OnceLock<String> = OnceLock::new();

    KEY.get_or_init(|| {
        dotenvy::dotenv().ok();
        env::var("GOOGLE_API_KEY").expect("GOOGLE_API_KEY must be set")
    })
}

fn google_backend() -> GoogleBackend {
    GoogleBackend::new(GoogleBackendOptions {
        api_key: google_api_key().clone(),
        ..Default::default()
    })
}

#[tokio::test]
#[ignore = "calls the live Gemini API; requires GOOGLE_API_KEY"]
async fn generate_text() {
    let response = google_backend()
        .generate(GenerateRequest {
            model: "gemini-2.5-flash".to_string(),
            contents: vec![Content::user(vec![Part::text(
                "Reply with the single word: ready",
            )])],
            temperature: Some(0.7),
            top_p: Some(0.95),
            ..Default::default()
        })
        .await
        .expect("generate succeeds");

    assert!(response.text.to_lowercase().contains("ready"));
}

#[tokio::test]
#[ignore = "calls the live Gemini API; requires GOOGLE_API_KEY"]
async fn generate_with_response_schema() {
    let response = google_backend()
        .generate(GenerateRequest {
            model: "gemini-2.5-flash".to_string(),
            contents: vec![Content::user(vec![Part::text(
                "Name one crop commonly grown in Karnataka.",
            )])],
            response_schema: Some(json!({
                "type": "object",
                "properties": { "crop": { "type": "string" } },
                "required": ["crop"]
            })),
            ..Default::default()
        })
        .await
        .expect("generate succeeds");

    let value: Value = serde_json::from_str(&response.text).expect("response is JSON");
    assert!(value["crop"].is_string());
}
