//! LLM advisory enrichment for gated candidates.
//!
//! The model is asked for a strict JSON verdict; anything it returns that
//! does not parse is an `Advisory` error and the candidate keeps its
//! rule-based defaults.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::ScanError;
use crate::models::{Advisory, Candidate};

const SYSTEM_PROMPT: &str = "You are a swing-trading analyst reviewing \
pre-screened stock candidates. Respond with strict JSON only, no prose, \
matching: {\"action\": \"buy\"|\"hold\"|\"sell\", \"rationale\": string, \
\"price_target\": number|null}.";

#[async_trait]
pub trait AdvisoryProvider: Send + Sync {
    /// Second opinion on one scored candidate.
    async fn advise(&self, candidate: &Candidate) -> Result<Advisory, ScanError>;
}

pub struct OpenAiAdvisory {
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl OpenAiAdvisory {
    pub fn new(base_url: String, api_key: String, model: String) -> Self {
        Self::with_client(base_url, api_key, model, reqwest::Client::new())
    }

    pub fn with_client(
        base_url: String,
        api_key: String,
        model: String,
        client: reqwest::Client,
    ) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
            client,
        }
    }

    fn user_prompt(candidate: &Candidate) -> String {
        format!(
            "Symbol: {}\nPrice: {:.2}\nComposite score: {:.2}\nSignals: {}",
            candidate.symbol,
            candidate.price,
            candidate.score.total_score,
            candidate.score.reasons.join("; "),
        )
    }
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}

#[derive(Serialize, Deserialize)]
struct Verdict {
    action: String,
    rationale: String,
    price_target: Option<f64>,
}

#[async_trait]
impl AdvisoryProvider for OpenAiAdvisory {
    async fn advise(&self, candidate: &Candidate) -> Result<Advisory, ScanError> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": Self::user_prompt(candidate)},
            ],
            "temperature": 0.2,
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ScanError::Advisory(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ScanError::Advisory(format!(
                "advisory service returned {}",
                response.status()
            )));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| ScanError::Advisory(e.to_string()))?;
        let content = chat
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .ok_or_else(|| ScanError::Advisory("empty choices".into()))?;

        let verdict: Verdict = serde_json::from_str(content.trim())
            .map_err(|e| ScanError::Advisory(format!("unparseable verdict: {e}")))?;
        let action = verdict
            .action
            .parse()
            .map_err(|_| ScanError::Advisory(format!("unknown action '{}'", verdict.action)))?;

        Ok(Advisory {
            action,
            rationale: verdict.rationale,
            price_target: verdict.price_target,
        })
    }
}
