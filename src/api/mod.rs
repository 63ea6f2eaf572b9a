//! Wire payloads for the Edris backend.
//!
//! The backend accepts a single JSON `POST /query` per turn and answers with
//! a batched `{ "response": ... }` body. Field names follow the server's
//! contract, which mixes snake_case and camelCase.

use serde::{Deserialize, Serialize};

/// Sampling parameters forwarded with every query.
///
/// Setters clamp to the ranges the backend accepts; out-of-range values are
/// never sent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModelSettings {
    pub temperature: f64,
    pub top_p: f64,
    pub max_tokens: u32,
}

impl Default for ModelSettings {
    fn default() -> Self {
        ModelSettings {
            temperature: 0.7,
            top_p: 0.9,
            max_tokens: 150,
        }
    }
}

impl ModelSettings {
    pub fn set_temperature(&mut self, value: f64) {
        self.temperature = value.clamp(0.0, 2.0);
    }

    pub fn set_top_p(&mut self, value: f64) {
        self.top_p = value.clamp(0.0, 1.0);
    }

    pub fn set_max_tokens(&mut self, value: u32) {
        self.max_tokens = value.max(1);
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WireMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryRequest {
    pub prompt: String,
    /// Always `"text"`; the backend routes image/audio queries elsewhere.
    #[serde(rename = "type")]
    pub kind: String,
    pub history: Vec<WireMessage>,
    pub modes: Vec<String>,
    #[serde(rename = "modelSettings")]
    pub model_settings: ModelSettings,
    #[serde(rename = "knowledgeStacks")]
    pub knowledge_stacks: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct QueryResponse {
    pub response: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_request() -> QueryRequest {
        QueryRequest {
            prompt: "hello".to_string(),
            kind: "text".to_string(),
            history: vec![WireMessage {
                role: "user".to_string(),
                content: "hello".to_string(),
            }],
            modes: vec!["think".to_string()],
            model_settings: ModelSettings::default(),
            knowledge_stacks: vec!["default".to_string()],
        }
    }

    #[test]
    fn request_uses_server_field_names() {
        let value = serde_json::to_value(sample_request()).expect("serialize");
        assert_eq!(value["type"], "text");
        assert_eq!(value["modelSettings"]["top_p"], 0.9);
        assert_eq!(value["knowledgeStacks"][0], "default");
        assert_eq!(value["history"][0]["role"], "user");
        assert_eq!(value["modes"][0], "think");
    }

    #[test]
    fn response_parses_response_field() {
        let parsed: QueryResponse =
            serde_json::from_str(r#"{"response":"Hi there!"}"#).expect("parse");
        assert_eq!(parsed.response, "Hi there!");
    }

    #[test]
    fn settings_clamp_to_accepted_ranges() {
        let mut settings = ModelSettings::default();
        settings.set_temperature(5.0);
        assert_eq!(settings.temperature, 2.0);
        settings.set_temperature(-1.0);
        assert_eq!(settings.temperature, 0.0);
        settings.set_top_p(1.5);
        assert_eq!(settings.top_p, 1.0);
        settings.set_max_tokens(0);
        assert_eq!(settings.max_tokens, 1);
    }
}
