//! REST API request/response data transfer objects

use serde::{Deserialize, Serialize};

use crate::engine::DiseaseClass;
use crate::service::PredictionRecord;

/// Gradio-style JSON predict request: `{"data": ["data:image/png;base64,..."]}`
#[derive(Debug, Deserialize)]
pub struct GradioPredictRequest {
    pub data: Vec<serde_json::Value>,
}

/// Gradio-style JSON predict response
#[derive(Debug, Serialize, Deserialize)]
pub struct GradioPredictResponse {
    pub data: Vec<PredictionRecord>,
}

/// Health response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
    pub version: String,
    pub timestamp: String,
    pub uptime_seconds: u64,
}

/// Class table entry joined with its condition info
#[derive(Debug, Serialize, Deserialize)]
pub struct ClassDto {
    pub index: usize,
    pub code: String,
    pub name: String,
    pub full_name: String,
    pub severity: String,
    pub description: String,
    pub recommendations: Vec<String>,
}

impl From<DiseaseClass> for ClassDto {
    fn from(class: DiseaseClass) -> Self {
        let info = class.info();
        Self {
            index: class.index(),
            code: class.code().to_string(),
            name: class.name().to_string(),
            full_name: info.full_name.to_string(),
            severity: info.severity.as_str().to_string(),
            description: info.description.to_string(),
            recommendations: info.recommendations.iter().map(|r| r.to_string()).collect(),
        }
    }
}

/// Class list response
#[derive(Debug, Serialize, Deserialize)]
pub struct ClassesResponse {
    pub classes: Vec<ClassDto>,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl ErrorResponse {
    pub fn new(error: &str, code: &str) -> Self {
        Self {
            error: error.to_string(),
            code: code.to_string(),
        }
    }
}
