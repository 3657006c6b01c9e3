mod config;
mod error;
mod handlers;
mod models;
mod nutrition;
mod server;
mod services;

use anyhow::Result;
use dotenv::dotenv;
use std::sync::Arc;

use config::Config;
use handlers::NutritionHandler;
use server::create_router;
use services::{AIService, GeminiService};

/// Build the text and vision model handles. Any failure leaves both unset
/// so the AI endpoints answer 503 instead of the process exiting.
fn initialize_gemini(config: &Config) -> Option<(Arc<dyn AIService>, Arc<dyn AIService>)> {
    let Some(api_key) = config.gemini_api_key.clone() else {
        log::warn!("⚠️ GEMINI_API_KEY environment variable not set, AI endpoints disabled");
        return None;
    };

    let build = |model: &str| {
        GeminiService::new(
            api_key.clone(),
            model.to_string(),
            config.gemini_api_base.clone(),
            config.request_timeout,
        )
    };

    match (build(&config.gemini_model), build(&config.gemini_vision_model)) {
        (Ok(text), Ok(vision)) => {
            log::info!(
                "✅ Gemini initialized (text: {}, vision: {})",
                text.model(),
                vision.model()
            );
            let text: Arc<dyn AIService> = Arc::new(text);
            let vision: Arc<dyn AIService> = Arc::new(vision);
            Some((text, vision))
        }
        (Err(e), _) | (_, Err(e)) => {
            log::warn!("⚠️ Failed to initialize Gemini: {:#}", e);
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables before the logger reads RUST_LOG
    dotenv().ok();

    env_logger::init();

    log::info!("🚀 Starting Intake Tracker API...");

    let config = Config::from_env()?;

    let (text_model, vision_model) = match initialize_gemini(&config) {
        Some((text, vision)) => (Some(text), Some(vision)),
        None => (None, None),
    };

    let handler = Arc::new(NutritionHandler::new(text_model, vision_model));
    let app = create_router(handler, config.max_upload_bytes);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    log::info!("🌐 Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::error!("❌ Failed to listen for shutdown signal: {}", e);
            }
        })
        .await?;

    log::info!("🛑 Shutting down...");
    Ok(())
}
