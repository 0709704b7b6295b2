//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use portfolio_api::config::Config;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Writes a small content tree covering every collection.
pub fn write_content(root: &Path) {
    for dir in ["experiences", "projects", "blogs", "education", "case-studies"] {
        fs::create_dir_all(root.join(dir)).unwrap();
    }

    fs::write(
        root.join("experiences/ai-search-tool.json"),
        r#"{
  "id": "ai-search-tool",
  "title": "AI-Powered Search Platform",
  "company": "TechCorp",
  "role": "Senior Product Manager",
  "summary": "Led the development of an enterprise AI search tool that increased search accuracy by 85%",
  "impact": { "metrics": ["85% improvement in search accuracy"] },
  "tags": ["AI", "Search"]
}"#,
    )
    .unwrap();
    fs::write(
        root.join("experiences/product-analytics-platform.json"),
        r#"{
  "id": "product-analytics-platform",
  "title": "Product Analytics Platform",
  "company": "DataCorp",
  "summary": "Built a comprehensive analytics platform that helped product teams make data-driven decisions",
  "tags": ["Analytics"]
}"#,
    )
    .unwrap();
    fs::write(
        root.join("projects/rag-agent.json"),
        r#"{
  "id": "rag-agent",
  "title": "Open Source RAG Agent Framework",
  "description": "Built a flexible RAG agent framework with support for multiple LLMs and vector databases",
  "techStack": ["Python", "LangChain"],
  "status": "active",
  "tags": ["AI", "RAG"]
}"#,
    )
    .unwrap();
    fs::write(
        root.join("blogs/rag-architecture-guide.md"),
        "---\ntitle: Complete Guide to RAG Architecture\ndate: 2024-01-05\nsummary: Deep dive into Retrieval-Augmented Generation systems.\ntags: [AI, RAG]\nreadTime: 10 min\n---\n# Complete Guide to RAG Architecture\n\nVector databases store embeddings for semantic search.\n",
    )
    .unwrap();
    fs::write(
        root.join("blogs/building-ai-agents.md"),
        "---\ntitle: Building Production-Ready AI Agents\ndate: 2024-01-15\nsummary: A guide to building and scaling AI agents.\ntags: [AI, Engineering]\n---\nAgents need guardrails.\n",
    )
    .unwrap();
    fs::write(
        root.join("education/stanford-cs.json"),
        r#"{
  "id": "stanford-cs",
  "institution": "Stanford University",
  "degree": "Master of Science in Computer Science",
  "description": "Focused on AI/ML with coursework in deep learning and natural language processing",
  "coursework": ["CS229 - Machine Learning"]
}"#,
    )
    .unwrap();
    fs::write(
        root.join("case-studies/fintech-fraud-detection.json"),
        r#"{ "id": "fintech-fraud-detection", "title": "Real-time Fraud Detection System", "summary": "Reduced false positives by 60%", "priority": 2, "featured": true }"#,
    )
    .unwrap();
    fs::write(
        root.join("case-studies/shopify-ai-assistant.json"),
        r#"{ "id": "shopify-ai-assistant", "title": "AI-Powered Product Discovery Assistant", "summary": "Increased product discovery by 40%", "priority": 1, "featured": true }"#,
    )
    .unwrap();
}

/// A temporary content tree plus a config pointing at it.
pub fn setup(port: u16, delegate: Option<&str>) -> (TempDir, Config) {
    let tmp = TempDir::new().unwrap();
    let content_root = tmp.path().join("content");
    write_content(&content_root);

    let mut config_content = format!(
        r#"
[content]
root = "{}"

[server]
bind = "127.0.0.1:{}"
"#,
        content_root.display(),
        port
    );
    if let Some(delegate) = delegate {
        config_content.push_str(delegate);
    }

    let config: Config = toml::from_str(&config_content).unwrap();
    portfolio_api::config::validate(&config).unwrap();
    (tmp, config)
}

pub fn find_free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

pub async fn wait_for_server(port: u16) {
    let client = reqwest::Client::new();
    let url = format!("http://127.0.0.1:{}/health", port);
    for _ in 0..50 {
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        if let Ok(resp) = client.get(&url).send().await {
            if resp.status().is_success() {
                return;
            }
        }
    }
    panic!("Server did not become ready within 5 seconds");
}
