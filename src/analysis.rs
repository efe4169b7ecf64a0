// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Amoy Wallet Contributors

//! Gemini integration for transaction history analysis.
//!
//! Wraps the `generateContent` REST endpoint. The wallet service hands a
//! simplified transaction list to [`AnalysisProvider::analyze_history`];
//! the client assembles the prompt, performs one call, and returns the
//! model's text verbatim.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::models::TransactionRecord;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("Analysis configuration missing: {0}")]
    MissingConfig(String),

    #[error("Analysis request failed: {0}")]
    Request(String),

    #[error("Analysis response was invalid: {0}")]
    InvalidResponse(String),
}

/// Narrow analysis interface consumed by the wallet service.
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    /// Summarize a non-empty transaction list. Returns the model's text.
    async fn analyze_history(
        &self,
        records: &[TransactionRecord],
    ) -> Result<String, AnalysisError>;
}

/// Gemini `generateContent` client.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    api_url: String,
    api_key: Option<String>,
    model: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    #[serde(default)]
    text: String,
}

impl GeminiClient {
    /// Create a new analysis client.
    pub fn new(
        api_url: impl Into<String>,
        api_key: Option<String>,
        model: impl Into<String>,
    ) -> Result<Self, AnalysisError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AnalysisError::Request(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_url: api_url.into(),
            api_key,
            model: model.into(),
            http,
        })
    }
}

#[async_trait]
impl AnalysisProvider for GeminiClient {
    async fn analyze_history(
        &self,
        records: &[TransactionRecord],
    ) -> Result<String, AnalysisError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            AnalysisError::MissingConfig("GEMINI_API_KEY is not set".to_string())
        })?;

        let prompt = build_prompt(records)?;
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.api_url, self.model, api_key
        );

        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AnalysisError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnalysisError::Request(format!(
                "analysis service returned HTTP {status}"
            )));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AnalysisError::InvalidResponse(e.to_string()))?;

        extract_text(parsed)
    }
}

/// Assemble the analysis prompt from the simplified history.
fn build_prompt(records: &[TransactionRecord]) -> Result<String, AnalysisError> {
    let history_json = serde_json::to_string_pretty(records)
        .map_err(|e| AnalysisError::InvalidResponse(e.to_string()))?;

    Ok(format!(
        "You are a crypto wallet assistant. Below is the recent transaction \
         history of a wallet on the Polygon Amoy testnet, most recent first. \
         Amounts are in MATIC. Summarize the wallet's activity in a short, \
         plain-language paragraph: notable inflows and outflows, frequent \
         counterparties, and overall direction of funds.\n\n{history_json}"
    ))
}

fn extract_text(response: GenerateContentResponse) -> Result<String, AnalysisError> {
    let text = response
        .candidates
        .into_iter()
        .next()
        .map(|candidate| {
            candidate
                .content
                .parts
                .into_iter()
                .map(|part| part.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(AnalysisError::InvalidResponse(
            "response contained no candidate text".to_string(),
        ));
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> TransactionRecord {
        TransactionRecord {
            kind: "Sent".to_string(),
            to: "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb".to_string(),
            from: "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa".to_string(),
            value: "1.5".to_string(),
            timestamp: "2024-01-01T00:00:00.000Z".to_string(),
        }
    }

    #[test]
    fn prompt_embeds_history_records() {
        let prompt = build_prompt(&[sample_record()]).unwrap();
        assert!(prompt.contains("\"type\": \"Sent\""));
        assert!(prompt.contains("1.5"));
        assert!(prompt.contains("MATIC"));
    }

    #[test]
    fn extract_text_joins_candidate_parts() {
        let parsed: GenerateContentResponse = serde_json::from_str(
            r#"{
                "candidates": [{
                    "content": {
                        "parts": [
                            { "text": "Mostly outgoing transfers" },
                            { "text": " to a single counterparty." }
                        ]
                    }
                }]
            }"#,
        )
        .unwrap();

        assert_eq!(
            extract_text(parsed).unwrap(),
            "Mostly outgoing transfers to a single counterparty."
        );
    }

    #[test]
    fn extract_text_rejects_empty_candidates() {
        let parsed: GenerateContentResponse =
            serde_json::from_str(r#"{ "candidates": [] }"#).unwrap();
        assert!(matches!(
            extract_text(parsed),
            Err(AnalysisError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn analyze_without_key_fails_with_missing_config() {
        let client = GeminiClient::new(
            "https://generativelanguage.googleapis.com",
            None,
            "gemini-2.0-flash",
        )
        .unwrap();

        let err = client.analyze_history(&[sample_record()]).await.unwrap_err();
        assert!(matches!(err, AnalysisError::MissingConfig(_)));
    }
}
