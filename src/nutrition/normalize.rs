use serde_json::Value;
use thiserror::Error;

use super::extract::RawRecord;
use crate::models::NutritionItem;

#[derive(Debug, Error, PartialEq)]
pub enum NormalizeError {
    #[error("field '{field}' is not an integer: {value}")]
    InvalidInteger { field: &'static str, value: String },
    #[error("field '{field}' is not a number: {value}")]
    InvalidNumber { field: &'static str, value: String },
}

/// Fallback values for fields the model left out.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefaults {
    pub name: String,
    pub weight_g: i64,
    pub kcal: i64,
    pub protein_g: i64,
    pub carbs_g: i64,
    pub fat_g: i64,
    pub confidence: f64, // 0.0 - 1.0, before scaling
}

impl FieldDefaults {
    /// Defaults for per-dish results of image and text analysis.
    pub fn dish() -> Self {
        Self {
            name: "Unknown Food".to_string(),
            weight_g: 150,
            kcal: 200,
            protein_g: 10,
            carbs_g: 20,
            fat_g: 8,
            confidence: 0.8,
        }
    }

    /// Defaults for a quick log entry: the name falls back to the user's
    /// own description and the weight to their hint.
    pub fn quick_log(description: &str, weight_hint: Option<i64>) -> Self {
        Self {
            name: title_case(description),
            weight_g: weight_hint.unwrap_or(150),
            confidence: 0.85,
            ..Self::dish()
        }
    }
}

/// Record substituted when image analysis yields nothing parseable.
pub fn fallback_dish() -> NutritionItem {
    NutritionItem {
        name: "Unknown Food".to_string(),
        weight_g: 150,
        kcal: 200,
        protein_g: 10,
        carbs_g: 20,
        fat_g: 8,
        confidence: scale_confidence(0.5),
    }
}

pub fn normalize_record(
    record: &RawRecord,
    defaults: &FieldDefaults,
) -> Result<NutritionItem, NormalizeError> {
    let name = match record.get("name") {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => defaults.name.clone(),
    };

    Ok(NutritionItem {
        name,
        weight_g: int_field(record, "weight_g", defaults.weight_g)?,
        kcal: int_field(record, "kcal", defaults.kcal)?,
        protein_g: int_field(record, "protein_g", defaults.protein_g)?,
        carbs_g: int_field(record, "carbs_g", defaults.carbs_g)?,
        fat_g: int_field(record, "fat_g", defaults.fat_g)?,
        confidence: scale_confidence(float_field(record, "confidence", defaults.confidence)?),
    })
}

/// Normalize every record; the first coercion failure aborts the batch.
pub fn normalize_records(
    records: &[RawRecord],
    defaults: &FieldDefaults,
) -> Result<Vec<NutritionItem>, NormalizeError> {
    records
        .iter()
        .map(|record| normalize_record(record, defaults))
        .collect()
}

/// 0-1 fraction to a 0-100 percentage with one decimal.
pub fn scale_confidence(fraction: f64) -> f64 {
    let percent = ((fraction * 100.0) * 10.0).round() / 10.0;
    percent.clamp(0.0, 100.0)
}

/// Uppercase the first letter of every alphabetic run, lowercase the rest.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_is_letter = false;

    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }

    out
}

fn int_field(record: &RawRecord, field: &'static str, default: i64) -> Result<i64, NormalizeError> {
    let Some(value) = record.get(field) else {
        return Ok(default);
    };

    let invalid = || NormalizeError::InvalidInteger {
        field,
        value: value.to_string(),
    };

    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(i)
            } else if let Some(f) = n.as_f64().filter(|f| f.abs() < i64::MAX as f64) {
                // truncate toward zero, never round
                Ok(f.trunc() as i64)
            } else {
                Err(invalid())
            }
        }
        Value::Bool(b) => Ok(i64::from(*b)),
        Value::String(s) => s.trim().parse::<i64>().map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}

fn float_field(record: &RawRecord, field: &'static str, default: f64) -> Result<f64, NormalizeError> {
    let Some(value) = record.get(field) else {
        return Ok(default);
    };

    let invalid = || NormalizeError::InvalidNumber {
        field,
        value: value.to_string(),
    };

    match value {
        Value::Number(n) => n.as_f64().ok_or_else(invalid),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .ok_or_else(invalid),
        _ => Err(invalid()),
    }
}
