use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Response-style modifier attached to a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Simplify,
    Summarize,
    #[serde(alias = "quiz-generate", alias = "quiz_generate")]
    Quiz,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Simplify => "simplify",
            Mode::Summarize => "summarize",
            Mode::Quiz => "quiz",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A submitted question. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub mode: Option<Mode>,
}

impl Question {
    pub fn new(text: impl Into<String>, mode: Option<Mode>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            created_at: Utc::now(),
            mode,
        }
    }
}

/// A generated answer, created only after a successful service call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseRecord {
    pub id: Uuid,
    pub question_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_time_ms: Option<u64>,
}

impl ResponseRecord {
    pub fn new(
        question_id: Uuid,
        content: String,
        mode: Option<Mode>,
        processing_time_ms: Option<u64>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            question_id,
            content,
            created_at: Utc::now(),
            mode,
            processing_time_ms,
        }
    }
}

// Generation endpoint request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl GenerateRequest {
    pub fn new(prompt: String) -> Self {
        Self {
            prompt,
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}

// Generation endpoint response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_serde_names() {
        assert_eq!(
            serde_json::to_string(&Mode::Simplify).unwrap(),
            "\"simplify\""
        );
        assert_eq!(serde_json::to_string(&Mode::Quiz).unwrap(), "\"quiz\"");
        let m: Mode = serde_json::from_str("\"quiz-generate\"").unwrap();
        assert_eq!(m, Mode::Quiz);
        let m: Mode = serde_json::from_str("\"summarize\"").unwrap();
        assert_eq!(m, Mode::Summarize);
    }

    #[test]
    fn test_generate_request_wire_shape() {
        let req = GenerateRequest::new("What is photosynthesis?".to_string());
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["prompt"], "What is photosynthesis?");
        assert!(value["timestamp"].as_i64().unwrap() > 0);
    }

    #[test]
    fn test_response_record_omits_empty_optionals() {
        let record = ResponseRecord::new(Uuid::new_v4(), "answer".to_string(), None, None);
        let value = serde_json::to_value(&record).unwrap();
        assert!(value.get("mode").is_none());
        assert!(value.get("processing_time_ms").is_none());
    }
}
