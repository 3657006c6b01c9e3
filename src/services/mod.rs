pub mod ai_service;
pub mod gemini; // Google Gemini REST client

pub use ai_service::AIService;
pub use gemini::GeminiService;
