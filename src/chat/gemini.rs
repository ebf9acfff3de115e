use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};
use eyre::{Result, eyre};
use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::utils::config::LLMConfig;

/// Thin client over the Gemini `generateContent` endpoint in JSON mode.
#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
    max_retries: u32,
}

impl GeminiClient {
    pub fn new(api_key: String, config: &LLMConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model: config.model.clone(),
            endpoint: config.endpoint.clone(),
            max_retries: config.max_retries,
        }
    }

    /// Sends `prompt` and parses the first JSON object of the answer as `T`.
    pub async fn generate_json<T: DeserializeOwned>(
        &self,
        system: Option<&str>,
        prompt: &str,
        schema: Value,
        temperature: f32,
    ) -> Result<T> {
        info!(
            "calling Gemini API (model: {}, max retries: {})",
            self.model, self.max_retries
        );
        debug!("prompt length: {} characters", prompt.len());

        let mut request_body = json!({
            "contents": [{"parts": [{"text": prompt}]}],
            "generationConfig": {
                "temperature": temperature,
                "topP": 0.95,
                "topK": 40,
                "maxOutputTokens": 8192,
                "responseMimeType": "application/json",
                "responseJsonSchema": schema
            }
        });

        if let Some(system) = system {
            request_body["systemInstruction"] = json!({ "parts": [{ "text": system }] });
        }

        let url = format!(
            "{}/{}:generateContent?key={}",
            self.endpoint.trim_end_matches('/'),
            self.model,
            self.api_key
        );

        let response = (|| async {
            let response = self.client.post(&url).json(&request_body).send().await?;

            let status = response.status();
            if !status.is_success() {
                let error_body = response.text().await?;
                return Err(eyre!("Gemini API error ({}): {}", status, error_body));
            }

            Ok(response)
        })
        .retry(
            ExponentialBuilder::default()
                .with_min_delay(Duration::from_millis(500))
                .with_max_times(self.max_retries as usize),
        )
        .notify(|err, dur| warn!("Gemini request failed, retrying in {:?}: {}", dur, err))
        .await?;

        let body: Value = response.json().await?;
        let content = response_text(&body)?;

        let json_str = extract_json(content)?;
        debug!(
            "extracted JSON (length: {} chars): {}",
            json_str.len(),
            json_str.chars().take(200).collect::<String>()
        );

        serde_json::from_str(json_str).map_err(|e| {
            debug!("JSON parsing failed: {}", e);
            eyre!("failed to parse LLM response as JSON: {}", e)
        })
    }
}

fn response_text(body: &Value) -> Result<&str> {
    body.get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.get(0))
        .and_then(|p| p.get("text"))
        .and_then(|t| t.as_str())
        .ok_or_else(|| eyre!("invalid Gemini API response structure"))
}

/// Slice from the first `{` to the last `}` of `text`.
pub fn extract_json(text: &str) -> Result<&str> {
    let trimmed = text.trim();
    let json_start = trimmed
        .find('{')
        .ok_or_else(|| eyre!("no JSON object found in response"))?;
    let json_end = trimmed
        .rfind('}')
        .filter(|end| *end > json_start)
        .ok_or_else(|| eyre!("malformed JSON in response"))?;

    Ok(&trimmed[json_start..=json_end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_json_wrapped_in_prose() {
        let text = "Sure! ```json\n{\"action\": \"done\", \"params\": {}}\n``` hope this helps";
        assert_eq!(extract_json(text).unwrap(), "{\"action\": \"done\", \"params\": {}}");
    }

    #[test]
    fn rejects_text_without_an_object() {
        assert!(extract_json("no json here").is_err());
        assert!(extract_json("} backwards {").is_err());
    }

    #[test]
    fn reads_the_first_candidate_text() {
        let body = json!({
            "candidates": [{ "content": { "parts": [{ "text": "{\"ok\": true}" }] } }]
        });
        assert_eq!(response_text(&body).unwrap(), "{\"ok\": true}");
        assert!(response_text(&json!({ "candidates": [] })).is_err());
    }
}
