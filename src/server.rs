use axum::{
    extract::{
        multipart::MultipartRejection, rejection::JsonRejection, DefaultBodyLimit, Multipart, State,
    },
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::error::ApiError;
use crate::handlers::NutritionHandler;
use crate::models::{
    ChatReply, ChatRequest, DishesResponse, HealthStatus, NutritionItem, SuggestionsResponse,
    TextMealRequest,
};

pub struct AppState {
    pub handler: Arc<NutritionHandler>,
}

pub fn create_router(handler: Arc<NutritionHandler>, max_upload_bytes: usize) -> Router {
    let state = Arc::new(AppState { handler });

    Router::new()
        .route("/", get(root_handler))
        .route("/infer", post(infer_handler))
        .route("/analyze-text", post(analyze_text_handler))
        .route("/nutrition-chat", post(nutrition_chat_handler))
        .route("/quick-log", post(quick_log_handler))
        .route("/suggest-meals", post(suggest_meals_handler))
        // deprecated alias of /nutrition-chat
        .route("/medical-chat", post(medical_chat_handler))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn bad_json(rejection: JsonRejection) -> ApiError {
    ApiError::BadInput(rejection.body_text())
}

async fn root_handler(State(state): State<Arc<AppState>>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy".to_string(),
        service: "Intake Tracker API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        gemini_available: state.handler.ai_available(),
    })
}

/// Expects the image in a multipart field named `file`.
async fn infer_handler(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<DishesResponse>, ApiError> {
    let mut multipart = multipart.map_err(|e| ApiError::BadInput(e.body_text()))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadInput(e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let content_type = field.content_type().map(str::to_string);
        let image = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadInput(e.body_text()))?;

        let result = state
            .handler
            .analyze_image(&image, content_type.as_deref())
            .await?;
        return Ok(Json(result));
    }

    Err(ApiError::BadInput("No file uploaded".to_string()))
}

async fn analyze_text_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TextMealRequest>, JsonRejection>,
) -> Result<Json<DishesResponse>, ApiError> {
    let Json(request) = payload.map_err(bad_json)?;
    Ok(Json(state.handler.analyze_text(&request).await?))
}

async fn nutrition_chat_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatReply>, ApiError> {
    let Json(request) = payload.map_err(bad_json)?;
    Ok(Json(state.handler.chat(&request).await?))
}

async fn quick_log_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TextMealRequest>, JsonRejection>,
) -> Result<Json<NutritionItem>, ApiError> {
    let Json(request) = payload.map_err(bad_json)?;
    Ok(Json(state.handler.quick_log(&request).await?))
}

async fn suggest_meals_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<SuggestionsResponse>, ApiError> {
    let Json(request) = payload.map_err(bad_json)?;
    Ok(Json(state.handler.suggest_meals(&request).await?))
}

async fn medical_chat_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ChatReply>, ApiError> {
    let Json(raw) = payload.map_err(bad_json)?;
    log::debug!("Legacy /medical-chat request, forwarding to nutrition chat");

    let request = ChatRequest::from_legacy(&raw);
    Ok(Json(state.handler.chat(&request).await?))
}
