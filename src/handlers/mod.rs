pub mod nutrition_handler;
pub mod prompts;

pub use nutrition_handler::NutritionHandler;
