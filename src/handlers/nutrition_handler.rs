use std::sync::Arc;

use crate::error::ApiError;
use crate::handlers::prompts;
use crate::models::{
    ChatReply, ChatRequest, DishesResponse, MealSuggestion, NutritionItem, SuggestionsResponse,
    TextMealRequest, Urgency,
};
use crate::nutrition::{
    extract_array, extract_records, fallback_dish, normalize_record, normalize_records,
    FieldDefaults,
};
use crate::services::AIService;

const CHAT_EMPTY_REPLY: &str = "I'm having trouble processing your question right now. Please try again.";
const CHAT_FAILURE_REPLY: &str = "I'm experiencing technical difficulties. Please try again or consult a healthcare professional for urgent concerns.";

/// Runs every capability against the configured models.
///
/// Data capabilities (image, text, quick log) fail hard when the model's
/// output can't be trusted. Advice capabilities (chat, suggestions) always
/// answer, falling back to a canned reply or an empty list.
pub struct NutritionHandler {
    text_model: Option<Arc<dyn AIService>>,
    vision_model: Option<Arc<dyn AIService>>,
}

impl NutritionHandler {
    pub fn new(
        text_model: Option<Arc<dyn AIService>>,
        vision_model: Option<Arc<dyn AIService>>,
    ) -> Self {
        Self {
            text_model,
            vision_model,
        }
    }

    pub fn ai_available(&self) -> bool {
        self.text_model.is_some()
    }

    fn text_model(&self) -> Result<&Arc<dyn AIService>, ApiError> {
        self.text_model.as_ref().ok_or_else(ApiError::not_configured)
    }

    pub async fn analyze_image(
        &self,
        image: &[u8],
        content_type: Option<&str>,
    ) -> Result<DishesResponse, ApiError> {
        let mime_type = match content_type {
            Some(ct) if ct.starts_with("image/") => ct,
            _ => return Err(ApiError::BadInput("Please upload a valid image file".to_string())),
        };

        let model = self.vision_model.as_ref().ok_or_else(ApiError::not_configured)?;

        if image.is_empty() {
            return Err(ApiError::BadInput("Uploaded image is empty".to_string()));
        }

        let decoded = image::load_from_memory(image)
            .map_err(|e| ApiError::InternalFailure(format!("Food analysis failed: {}", e)))?;

        log::info!(
            "📸 Analyzing food image: {}x{}, {} bytes ({})",
            decoded.width(),
            decoded.height(),
            image.len(),
            mime_type
        );

        let reply = model
            .generate_with_image(&prompts::image_analysis(), image, mime_type)
            .await
            .map_err(|e| ApiError::InternalFailure(format!("Food analysis failed: {}", e)))?;

        if reply.is_empty() {
            return Err(ApiError::UnprocessableContent(
                "Could not analyze the food image".to_string(),
            ));
        }

        let records = extract_records(&reply);
        let dishes = if records.is_empty() {
            log::warn!("⚠️ No nutrition JSON in image reply, using fallback dish");
            vec![fallback_dish()]
        } else {
            normalize_records(&records, &FieldDefaults::dish())
                .map_err(|e| ApiError::InternalFailure(format!("Food analysis failed: {}", e)))?
        };

        log::info!("✅ Image analysis found {} dish(es)", dishes.len());
        Ok(DishesResponse { dishes })
    }

    pub async fn analyze_text(&self, request: &TextMealRequest) -> Result<DishesResponse, ApiError> {
        let model = self.text_model()?;

        log::info!("🍽️ Analyzing meal description: '{}'", request.description);

        let prompt = prompts::text_analysis(&request.description, request.weight_hint());
        let reply = model
            .generate_text(&prompt)
            .await
            .map_err(|e| ApiError::InternalFailure(format!("Meal analysis failed: {}", e)))?;

        if reply.is_empty() {
            return Err(ApiError::UnprocessableContent(
                "Could not analyze the meal description".to_string(),
            ));
        }

        let records = extract_records(&reply);
        if records.is_empty() {
            return Err(ApiError::UnprocessableContent(
                "Could not parse nutrition information from the description".to_string(),
            ));
        }

        let dishes = normalize_records(&records, &FieldDefaults::dish())
            .map_err(|e| ApiError::InternalFailure(format!("Meal analysis failed: {}", e)))?;

        log::info!("✅ Text analysis found {} dish(es)", dishes.len());
        Ok(DishesResponse { dishes })
    }

    /// Never fails once a model is configured.
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, ApiError> {
        let model = self.text_model()?;

        let prompt = prompts::nutrition_chat(&request.message, request.context.as_deref());
        let reply = match model.generate_text(&prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                log::error!("❌ Chat error: {}", e);
                return Ok(ChatReply::fallback(CHAT_FAILURE_REPLY));
            }
        };

        if reply.is_empty() {
            log::warn!("⚠️ Empty chat reply from model");
            return Ok(ChatReply::fallback(CHAT_EMPTY_REPLY));
        }

        let urgency = Urgency::classify(&request.message);
        log::info!("💬 Chat answered (urgency={})", urgency);

        Ok(ChatReply {
            response: reply,
            confidence: 0.9,
            urgency,
        })
    }

    pub async fn quick_log(&self, request: &TextMealRequest) -> Result<NutritionItem, ApiError> {
        let model = self.text_model()?;

        log::info!("⚡ Quick log: '{}'", request.description);

        let weight_hint = request.weight_hint();
        let reply = model
            .generate_text(&prompts::quick_log(&request.description, weight_hint))
            .await
            .map_err(|e| ApiError::InternalFailure(format!("Quick log failed: {}", e)))?;

        if reply.is_empty() {
            return Err(ApiError::UnprocessableContent("Could not analyze the food".to_string()));
        }

        let records = extract_records(&reply);
        let Some(record) = records.first() else {
            return Err(ApiError::UnprocessableContent(
                "Could not parse nutrition information".to_string(),
            ));
        };

        normalize_record(record, &FieldDefaults::quick_log(&request.description, weight_hint))
            .map_err(|e| ApiError::InternalFailure(format!("Quick log failed: {}", e)))
    }

    /// Never fails once a model is configured; an unusable reply gives no suggestions.
    pub async fn suggest_meals(&self, request: &ChatRequest) -> Result<SuggestionsResponse, ApiError> {
        let model = self.text_model()?;

        let prompt = prompts::meal_suggestions(&request.message, request.context.as_deref());
        let suggestions = match model.generate_text(&prompt).await {
            Ok(reply) => extract_array(&reply)
                .into_iter()
                .map(MealSuggestion)
                .collect::<Vec<_>>(),
            Err(e) => {
                log::error!("❌ Suggestion error: {}", e);
                Vec::new()
            }
        };

        if suggestions.is_empty() {
            log::warn!("⚠️ No meal suggestions parsed from model reply");
        } else {
            let names: Vec<&str> = suggestions.iter().filter_map(MealSuggestion::name).collect();
            log::info!("🥗 Suggested {} meal(s): {:?}", suggestions.len(), names);
        }

        Ok(SuggestionsResponse { suggestions })
    }
}
