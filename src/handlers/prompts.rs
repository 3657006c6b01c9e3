//! Instruction texts sent to the model. Each one fixes the JSON shape the
//! reply must take.

const NUTRITION_FIELDS: &str = "- name: The name of the food item
- weight_g: Estimated weight in grams (be realistic based on typical serving sizes)
- kcal: Estimated calories
- protein_g: Protein in grams
- carbs_g: Carbohydrates in grams
- fat_g: Fat in grams
- confidence: Your confidence level (0.0 to 1.0)";

pub fn image_analysis() -> String {
    format!(
        r#"Analyze this food image and provide detailed nutrition information.

IMPORTANT: You must respond ONLY with a valid JSON array, no other text.

For each food item visible in the image, provide:
{NUTRITION_FIELDS}

Example response format:
[
  {{"name": "Grilled Chicken Breast", "weight_g": 150, "kcal": 248, "protein_g": 46, "carbs_g": 0, "fat_g": 5, "confidence": 0.95}}
]

If you cannot identify the food clearly, still provide your best estimate with a lower confidence score.
Respond ONLY with the JSON array, nothing else."#
    )
}

pub fn text_analysis(description: &str, weight_hint: Option<i64>) -> String {
    let weight = weight_hint
        .map(|w| format!("\nThe user mentioned the total weight is approximately {}g.", w))
        .unwrap_or_default();

    format!(
        r#"Analyze this meal description and provide detailed nutrition information.

Meal description: "{description}"{weight}

IMPORTANT: You must respond ONLY with a valid JSON array, no other text.

For each food item mentioned, provide:
{NUTRITION_FIELDS}

Example response format:
[
  {{"name": "White Rice", "weight_g": 200, "kcal": 260, "protein_g": 5, "carbs_g": 56, "fat_g": 1, "confidence": 0.9}},
  {{"name": "Grilled Chicken", "weight_g": 100, "kcal": 165, "protein_g": 31, "carbs_g": 0, "fat_g": 4, "confidence": 0.9}}
]

Be specific with portion sizes based on common serving sizes.
Respond ONLY with the JSON array, nothing else."#
    )
}

pub fn nutrition_chat(message: &str, context: Option<&str>) -> String {
    let context = context
        .filter(|c| !c.is_empty())
        .map(|c| format!("\n\nUser's current nutrition context:\n{}", c))
        .unwrap_or_default();

    format!(
        r#"You are a helpful and knowledgeable nutrition and health assistant.
Provide accurate, science-based information about nutrition, diet, and wellness.

Guidelines:
1. Be helpful and conversational
2. Provide specific, actionable advice when possible
3. Include relevant nutritional information when discussing foods
4. Always recommend consulting healthcare professionals for medical concerns
5. Be encouraging and supportive about healthy eating habits
6. If asked about specific foods, include calorie and macro information when relevant
{context}

User question: {message}

Provide a helpful, informative response:"#
    )
}

pub fn quick_log(description: &str, weight_hint: Option<i64>) -> String {
    let weight = weight_hint
        .map(|w| format!(" (approximately {}g)", w))
        .unwrap_or_default();

    format!(
        r#"Quickly estimate the nutrition for: "{description}"{weight}

Respond with ONLY a single JSON object (not an array):
{{"name": "Food Name", "weight_g": 150, "kcal": 200, "protein_g": 10, "carbs_g": 20, "fat_g": 8, "confidence": 0.9}}

Use realistic serving sizes and accurate nutrition data."#
    )
}

pub fn meal_suggestions(message: &str, context: Option<&str>) -> String {
    let context = context
        .filter(|c| !c.is_empty())
        .map(|c| format!("Additional context: {}", c))
        .unwrap_or_default();

    format!(
        r#"Based on the user's nutritional needs and preferences, suggest 3-5 meal ideas.

User request: {message}

{context}

Provide meal suggestions in this JSON format:
[
  {{"name": "Meal Name", "description": "Brief description", "estimated_kcal": 400, "protein_g": 30, "carbs_g": 40, "fat_g": 15}}
]

Focus on balanced, healthy options that match the user's needs.
Respond ONLY with the JSON array."#
    )
}
