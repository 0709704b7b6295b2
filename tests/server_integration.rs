//! End-to-end tests for the HTTP API: content endpoints, search validation,
//! and the delegate-with-fallback behavior of `POST /search`.

mod common;

use anyhow::Result;
use async_trait::async_trait;
use portfolio_api::config::Config;
use portfolio_api::models::SearchOutcome;
use portfolio_api::provider::SearchProvider;
use portfolio_api::server::{run_server, run_server_with_provider};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::task::JoinHandle;

use common::{find_free_port, setup, wait_for_server};

async fn start(cfg: &Config) -> JoinHandle<()> {
    let cfg_clone = cfg.clone();
    let handle = tokio::spawn(async move {
        run_server(&cfg_clone).await.ok();
    });
    wait_for_server(port_of(cfg)).await;
    handle
}

fn port_of(cfg: &Config) -> u16 {
    cfg.server
        .bind
        .rsplit(':')
        .next()
        .and_then(|p| p.parse().ok())
        .unwrap()
}

async fn post_search(port: u16, body: Value) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("http://127.0.0.1:{}/search", port))
        .json(&body)
        .send()
        .await
        .unwrap()
}

// ─── Content endpoints ──────────────────────────────────────────────

#[tokio::test]
async fn test_content_collections_served() {
    let port = find_free_port();
    let (_tmp, cfg) = setup(port, None);
    let server = start(&cfg).await;
    let client = reqwest::Client::new();

    let experiences: Value = client
        .get(format!("http://127.0.0.1:{}/content/experiences", port))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let experiences = experiences.as_array().unwrap();
    assert_eq!(experiences.len(), 2);
    assert_eq!(experiences[0]["id"], "ai-search-tool");
    assert_eq!(
        experiences[0]["impact"]["metrics"][0],
        "85% improvement in search accuracy"
    );
    assert!(experiences[0].get("type").is_none());

    let blogs: Value = client
        .get(format!("http://127.0.0.1:{}/content/blogs", port))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(blogs[0]["slug"], "building-ai-agents");
    assert_eq!(blogs[1]["slug"], "rag-architecture-guide");
    assert_eq!(blogs[1]["readTime"], "10 min");
    assert!(blogs[1]["content"]
        .as_str()
        .unwrap()
        .starts_with("# Complete Guide"));

    let studies: Value = client
        .get(format!("http://127.0.0.1:{}/content/case-studies", port))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(studies[0]["id"], "shopify-ai-assistant");
    assert_eq!(studies[1]["id"], "fintech-fraud-detection");

    let resp = client
        .get(format!("http://127.0.0.1:{}/content/podcasts", port))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "not_found");

    server.abort();
}

#[tokio::test]
async fn test_content_is_byte_identical_across_requests() {
    let port = find_free_port();
    let (_tmp, cfg) = setup(port, None);
    let server = start(&cfg).await;
    let client = reqwest::Client::new();

    for collection in ["experiences", "projects", "blogs", "education", "case-studies"] {
        let url = format!("http://127.0.0.1:{}/content/{}", port, collection);
        let first = client.get(&url).send().await.unwrap().bytes().await.unwrap();
        let second = client.get(&url).send().await.unwrap().bytes().await.unwrap();
        assert_eq!(first, second, "{} changed between requests", collection);
    }

    server.abort();
}

#[tokio::test]
async fn test_missing_collection_directory_serves_empty_array() {
    let port = find_free_port();
    let (tmp, cfg) = setup(port, None);
    std::fs::remove_dir_all(tmp.path().join("content/projects")).unwrap();
    let server = start(&cfg).await;

    let resp = reqwest::get(format!("http://127.0.0.1:{}/content/projects", port))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!([]));

    server.abort();
}

#[tokio::test]
async fn test_case_study_by_id() {
    let port = find_free_port();
    let (_tmp, cfg) = setup(port, None);
    let server = start(&cfg).await;

    let resp = reqwest::get(format!(
        "http://127.0.0.1:{}/content/case-studies/fintech-fraud-detection",
        port
    ))
    .await
    .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["title"], "Real-time Fraud Detection System");

    let resp = reqwest::get(format!(
        "http://127.0.0.1:{}/content/case-studies/unknown",
        port
    ))
    .await
    .unwrap();
    assert_eq!(resp.status(), 404);

    server.abort();
}

// ─── Search ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_search_ranks_title_match_first() {
    let port = find_free_port();
    let (_tmp, cfg) = setup(port, None);
    let server = start(&cfg).await;

    let resp = post_search(port, json!({ "query": "ai-powered" })).await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["citation"], "Experience: AI-Powered Search Platform");
    assert_eq!(results[0]["type"], "experience");
    assert_eq!(
        body["response"],
        "Based on my experience with AI-Powered Search Platform, Led the development of an enterprise AI search tool that increased search accuracy by 85%"
    );

    server.abort();
}

#[tokio::test]
async fn test_search_results_bounded_and_sorted() {
    let port = find_free_port();
    let (_tmp, cfg) = setup(port, None);
    let server = start(&cfg).await;

    // "a" occurs in every record.
    let body: Value = post_search(port, json!({ "query": "a" }))
        .await
        .json()
        .await
        .unwrap();
    let relevances: Vec<f64> = body["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["relevance"].as_f64().unwrap())
        .collect();
    assert_eq!(relevances.len(), 5);
    assert!(relevances.windows(2).all(|w| w[0] >= w[1]));
    assert!(body["response"]
        .as_str()
        .unwrap()
        .ends_with("I also have related experience in other areas that might interest you."));

    server.abort();
}

#[tokio::test]
async fn test_search_no_match_returns_guidance() {
    let port = find_free_port();
    let (_tmp, cfg) = setup(port, None);
    let server = start(&cfg).await;

    let body: Value = post_search(port, json!({ "query": "kubernetes" }))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["results"], json!([]));
    assert!(body["response"]
        .as_str()
        .unwrap()
        .starts_with("I couldn't find specific information"));

    server.abort();
}

#[tokio::test]
async fn test_search_rejects_invalid_queries() {
    let port = find_free_port();
    let (_tmp, cfg) = setup(port, None);
    let server = start(&cfg).await;

    for body in [
        json!({}),
        json!({ "query": "" }),
        json!({ "query": "   " }),
        json!({ "query": 7 }),
        json!({ "query": null }),
    ] {
        let resp = post_search(port, body.clone()).await;
        assert_eq!(resp.status(), 400, "body {} should be rejected", body);
        let err: Value = resp.json().await.unwrap();
        assert_eq!(err["error"]["code"], "bad_request");
    }

    let resp = reqwest::Client::new()
        .post(format!("http://127.0.0.1:{}/search", port))
        .header("content-type", "application/json")
        .body("{ not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    server.abort();
}

// ─── Delegate fallback ──────────────────────────────────────────────

#[tokio::test]
async fn test_failing_delegate_matches_local_response() {
    let local_port = find_free_port();
    let (_local_tmp, local_cfg) = setup(local_port, None);
    let local_server = start(&local_cfg).await;

    let port = find_free_port();
    let (_tmp, cfg) = setup(
        port,
        Some(
            r#"
[delegate]
command = "/nonexistent/portfolio-search-delegate"
enable_env = "PATH"
timeout_secs = 5
"#,
        ),
    );
    let server = start(&cfg).await;

    for query in ["rag", "ai-powered", "kubernetes"] {
        let local: Value = post_search(local_port, json!({ "query": query }))
            .await
            .json()
            .await
            .unwrap();
        let resp = post_search(port, json!({ "query": query })).await;
        assert_eq!(resp.status(), 200);
        let fallback: Value = resp.json().await.unwrap();
        assert_eq!(local, fallback, "fallback differs for query {}", query);
    }

    local_server.abort();
    server.abort();
}

#[cfg(unix)]
#[tokio::test]
async fn test_delegate_success_returned_verbatim() {
    let port = find_free_port();
    let (_tmp, cfg) = setup(
        port,
        Some(
            r#"
[delegate]
command = "sh"
args = ["-c", "cat >/dev/null; echo '{\"results\":[{\"id\":\"rag-agent\",\"type\":\"project\",\"title\":\"RAG\",\"summary\":\"Semantic hit\",\"relevance\":0.91,\"citation\":\"Project: RAG\"}],\"response\":\"From the delegate.\"}'"]
enable_env = "PATH"
timeout_secs = 10
"#,
        ),
    );
    let server = start(&cfg).await;

    let body: Value = post_search(port, json!({ "query": "anything" }))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["response"], "From the delegate.");
    assert_eq!(body["results"][0]["relevance"], 0.91);
    assert_eq!(body["results"][0]["citation"], "Project: RAG");

    server.abort();
}

#[cfg(unix)]
#[tokio::test]
async fn test_disabled_delegate_is_not_run() {
    let port = find_free_port();
    let (_tmp, cfg) = setup(
        port,
        Some(
            r#"
[delegate]
command = "sh"
args = ["-c", "cat >/dev/null; echo '{\"results\":[],\"response\":\"delegate\"}'"]
enable_env = "PORTFOLIO_TEST_SURELY_UNSET_VARIABLE"
"#,
        ),
    );
    let server = start(&cfg).await;

    let body: Value = post_search(port, json!({ "query": "ai-powered" }))
        .await
        .json()
        .await
        .unwrap();
    assert_ne!(body["response"], "delegate");
    assert_eq!(
        body["results"][0]["citation"],
        "Experience: AI-Powered Search Platform"
    );

    server.abort();
}

// ─── Internal errors ────────────────────────────────────────────────

struct BrokenProvider;

#[async_trait]
impl SearchProvider for BrokenProvider {
    fn name(&self) -> &str {
        "broken"
    }

    async fn search(&self, _query: &str) -> Result<SearchOutcome> {
        anyhow::bail!("index on fire")
    }
}

#[tokio::test]
async fn test_provider_error_is_generic_500() {
    let port = find_free_port();
    let (_tmp, cfg) = setup(port, None);

    let cfg_clone = cfg.clone();
    let server = tokio::spawn(async move {
        run_server_with_provider(&cfg_clone, Arc::new(BrokenProvider))
            .await
            .ok();
    });
    wait_for_server(port).await;

    let resp = post_search(port, json!({ "query": "rag" })).await;
    assert_eq!(resp.status(), 500);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "internal");
    assert_eq!(body["error"]["message"], "Internal server error");

    server.abort();
}
