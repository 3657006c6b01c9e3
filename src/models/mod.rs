use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One food item with its estimated nutrition, as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionItem {
    pub name: String,
    pub weight_g: i64,
    pub kcal: i64,
    pub protein_g: i64,
    pub carbs_g: i64,
    pub fat_g: i64,
    pub confidence: f64, // percentage, 0-100, one decimal
}

/// A meal idea from the model. Passed through exactly as parsed; the
/// expected keys are name, description, estimated_kcal, protein_g,
/// carbs_g and fat_g but none of them is enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MealSuggestion(pub Map<String, Value>);

impl MealSuggestion {
    pub fn name(&self) -> Option<&str> {
        self.0.get("name").and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    Moderate,
    High,
}

impl std::fmt::Display for Urgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Urgency::Low => "low",
            Urgency::Moderate => "moderate",
            Urgency::High => "high",
        };
        write!(f, "{}", s)
    }
}

const HIGH_URGENCY_KEYWORDS: [&str; 5] = [
    "emergency",
    "severe pain",
    "difficulty breathing",
    "chest pain",
    "allergic reaction",
];

const MODERATE_URGENCY_KEYWORDS: [&str; 5] =
    ["concerned", "worried", "persistent", "recurring", "unusual"];

impl Urgency {
    /// Classify the user's own message. The model reply is never inspected.
    pub fn classify(message: &str) -> Self {
        let lower = message.to_lowercase();

        if HIGH_URGENCY_KEYWORDS.iter().any(|k| lower.contains(k)) {
            Urgency::High
        } else if MODERATE_URGENCY_KEYWORDS.iter().any(|k| lower.contains(k)) {
            Urgency::Moderate
        } else {
            Urgency::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
    pub confidence: f64,
    pub urgency: Urgency,
}

impl ChatReply {
    /// Soft reply used whenever the chat cannot produce a real answer.
    pub fn fallback(response: &str) -> Self {
        Self {
            response: response.to_string(),
            confidence: 0.5,
            urgency: Urgency::Low,
        }
    }
}

/// Body of `/analyze-text` and `/quick-log`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextMealRequest {
    pub description: String,
    #[serde(default)]
    pub weight_g: Option<i64>,
}

impl TextMealRequest {
    /// Weight hint in grams; zero or negative counts as no hint.
    pub fn weight_hint(&self) -> Option<i64> {
        self.weight_g.filter(|w| *w > 0)
    }
}

/// Body of `/nutrition-chat` and `/suggest-meals`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub context: Option<String>,
}

impl ChatRequest {
    /// Reshape the loose `/medical-chat` payload. Missing or non-string
    /// `message` becomes empty, missing `context` stays absent.
    pub fn from_legacy(payload: &Value) -> Self {
        let message = payload
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let context = payload
            .get("context")
            .and_then(Value::as_str)
            .map(str::to_string);

        Self { message, context }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DishesResponse {
    pub dishes: Vec<NutritionItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<MealSuggestion>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub service: String,
    pub version: String,
    pub gemini_available: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urgency_high_keywords() {
        assert_eq!(Urgency::classify("I have CHEST PAIN after eating"), Urgency::High);
        assert_eq!(Urgency::classify("possible allergic reaction to nuts"), Urgency::High);
    }

    #[test]
    fn test_urgency_high_wins_over_moderate() {
        assert_eq!(
            Urgency::classify("worried, this could be an emergency"),
            Urgency::High
        );
    }

    #[test]
    fn test_urgency_moderate_and_low() {
        assert_eq!(Urgency::classify("I'm worried about my sugar intake"), Urgency::Moderate);
        assert_eq!(Urgency::classify("Is rice healthy?"), Urgency::Low);
    }

    #[test]
    fn test_weight_hint_ignores_zero() {
        let req: TextMealRequest =
            serde_json::from_str(r#"{"description": "toast", "weight_g": 0}"#).unwrap();
        assert_eq!(req.weight_hint(), None);

        let req: TextMealRequest =
            serde_json::from_str(r#"{"description": "toast", "weight_g": 80}"#).unwrap();
        assert_eq!(req.weight_hint(), Some(80));
    }

    #[test]
    fn test_chat_request_from_legacy() {
        let payload = serde_json::json!({"message": "hi", "context": "1500 kcal today"});
        let req = ChatRequest::from_legacy(&payload);
        assert_eq!(req.message, "hi");
        assert_eq!(req.context.as_deref(), Some("1500 kcal today"));

        let req = ChatRequest::from_legacy(&serde_json::json!({}));
        assert_eq!(req.message, "");
        assert!(req.context.is_none());
    }

    #[test]
    fn test_urgency_serializes_lowercase() {
        let reply = ChatReply::fallback("sorry");
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json["urgency"], "low");
        assert_eq!(json["confidence"], 0.5);
    }
}
