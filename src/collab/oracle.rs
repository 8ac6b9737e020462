//! Answer extraction oracle - HTTP client for a chat-completion endpoint
//!
//! Sends one extraction prompt per question and parses the reply
//! defensively: fenced code blocks are stripped, the first JSON object is
//! pulled out of whatever prose surrounds it, and anything that still
//! fails to parse is treated as "no answer found". Transport errors are
//! returned to the caller, which logs and skips that question.

use std::time::Duration;

use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::catalog::Question;

use super::{AnswerCandidate, AnswerOracle};

/// Confidence assigned when the oracle finds an answer but omits a score
const DEFAULT_ORACLE_CONFIDENCE: f64 = 0.8;

pub struct HttpOracle {
    endpoint: String,
    model: String,
    api_key: Option<String>,
    temperature: f32,
    max_tokens: u32,
    timeout: Duration,
}

/// Shape the oracle is asked to reply with
#[derive(Debug, Deserialize)]
struct OracleReply {
    answer: Option<String>,
    confidence: Option<f64>,
    source_document: Option<String>,
}

impl HttpOracle {
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: None,
            temperature: 0.2,
            max_tokens: 500,
            timeout: Duration::from_secs(60),
        }
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_sampling(mut self, temperature: f32, max_tokens: u32) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }

    fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.endpoint.trim_end_matches('/'))
    }

    fn build_prompt(question: &Question, context: &str) -> String {
        let examples = if question.examples.is_empty() {
            String::new()
        } else {
            format!("\nEXAMPLES: {}", question.examples.join("; "))
        };

        format!(
            "Extract the answer to this specific question from the provided content.\n\n\
             QUESTION: {question_text}\n\
             CONTEXT: {help}{examples}\n\n\
             RELEVANT CONTENT:\n{context}\n\n\
             TASK: If you find a clear answer, return JSON with:\n\
             {{\n  \"answer\": \"the specific answer text\",\n  \"confidence\": 0.0-1.0,\n  \"source_document\": \"document name where answer was found\"\n}}\n\n\
             If no clear answer found, return: {{\"answer\": null}}",
            question_text = question.prompt,
            help = question.help.as_deref().unwrap_or("N/A"),
            examples = examples,
        )
    }
}

/// Strip markdown fences and pull the first JSON object out of a reply.
pub fn clean_json_reply(reply: &str) -> String {
    let mut cleaned = reply.replace("```json", "");
    cleaned = cleaned.replace("```", "");

    if let Ok(re) = Regex::new(r"(?s)\{.*\}") {
        if let Some(m) = re.find(&cleaned) {
            return m.as_str().to_string();
        }
    }
    cleaned.trim().to_string()
}

impl AnswerOracle for HttpOracle {
    fn extract_answer(
        &self,
        question: &Question,
        context: &str,
    ) -> Result<Option<AnswerCandidate>> {
        let payload = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "user", "content": Self::build_prompt(question, context)}
            ],
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        });

        let mut request = ureq::post(&self.chat_url())
            .timeout(self.timeout)
            .set("Content-Type", "application/json");
        if let Some(key) = &self.api_key {
            request = request.set("Authorization", &format!("Bearer {key}"));
        }

        let response = request
            .send_json(&payload)
            .with_context(|| format!("Oracle request failed for {}", question.id))?;

        let json: serde_json::Value = response
            .into_json()
            .context("Failed to parse oracle response body")?;

        let content = match json["choices"][0]["message"]["content"].as_str() {
            Some(content) => content,
            None => {
                warn!("Oracle reply for {} has no message content", question.id);
                return Ok(None);
            }
        };

        let reply: OracleReply = match serde_json::from_str(&clean_json_reply(content)) {
            Ok(reply) => reply,
            Err(e) => {
                // Untrusted upstream: malformed output means "no answer"
                warn!("Unparseable oracle reply for {}: {e}", question.id);
                return Ok(None);
            }
        };

        match reply.answer {
            Some(answer) if !answer.trim().is_empty() => {
                let confidence = reply
                    .confidence
                    .unwrap_or(DEFAULT_ORACLE_CONFIDENCE)
                    .clamp(0.0, 1.0);
                debug!(
                    "Oracle answered {} (confidence {confidence:.2})",
                    question.id
                );
                Ok(Some(AnswerCandidate {
                    answer,
                    confidence,
                    source_ref: reply.source_document,
                }))
            }
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_json_reply_strips_fences() {
        let reply = "```json\n{\"answer\": \"10.0.0.0/16\", \"confidence\": 0.9}\n```";
        let cleaned = clean_json_reply(reply);
        let parsed: OracleReply = serde_json::from_str(&cleaned).unwrap();
        assert_eq!(parsed.answer.as_deref(), Some("10.0.0.0/16"));
    }

    #[test]
    fn test_clean_json_reply_extracts_embedded_object() {
        let reply = "Sure! Here is what I found:\n{\"answer\": \"ExpressRoute\"}\nHope that helps.";
        let cleaned = clean_json_reply(reply);
        let parsed: OracleReply = serde_json::from_str(&cleaned).unwrap();
        assert_eq!(parsed.answer.as_deref(), Some("ExpressRoute"));
        assert!(parsed.confidence.is_none());
    }

    #[test]
    fn test_clean_json_reply_passes_garbage_through() {
        // Unparseable replies surface as a parse failure, handled as no-answer
        let cleaned = clean_json_reply("I could not find anything relevant.");
        assert!(serde_json::from_str::<OracleReply>(&cleaned).is_err());
    }

    #[test]
    fn test_null_answer_parses_as_none() {
        let parsed: OracleReply = serde_json::from_str("{\"answer\": null}").unwrap();
        assert!(parsed.answer.is_none());
    }

    #[test]
    fn test_chat_url_normalizes_trailing_slash() {
        let oracle = HttpOracle::new("http://localhost:1234/v1/", "test-model");
        assert_eq!(oracle.chat_url(), "http://localhost:1234/v1/chat/completions");
    }
}
