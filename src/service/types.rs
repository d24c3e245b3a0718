//! Service layer types

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::engine::DiseaseClass;

/// Successful model prediction
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub class: DiseaseClass,
    pub confidence: f32,
    /// One probability per class, in class table order
    pub probabilities: Vec<(DiseaseClass, f32)>,
}

/// Result of a single predict call
#[derive(Debug, Clone, PartialEq)]
pub enum PredictOutcome {
    /// The model ran and produced a prediction
    Predicted(Prediction),
    /// No model was loaded at startup
    ModelUnavailable,
    /// Decoding, preprocessing or inference failed
    Failed(String),
}

/// Fixed distribution served when no model is loaded
pub const FALLBACK_PROBABILITIES: [(DiseaseClass, f32); 7] = [
    (DiseaseClass::MelanocyticNevi, 0.85),
    (DiseaseClass::Melanoma, 0.05),
    (DiseaseClass::BenignKeratosis, 0.04),
    (DiseaseClass::BasalCellCarcinoma, 0.03),
    (DiseaseClass::ActinicKeratoses, 0.02),
    (DiseaseClass::VascularLesions, 0.01),
    (DiseaseClass::Dermatofibroma, 0.01),
];

pub const FALLBACK_CONFIDENCE: f32 = 0.85;
pub const MODEL_NOT_LOADED: &str = "Model not loaded";
pub const ERROR_DISEASE_NAME: &str = "Error occurred";

impl PredictOutcome {
    pub fn is_predicted(&self) -> bool {
        matches!(self, PredictOutcome::Predicted(_))
    }

    /// Flatten into the record returned to clients
    pub fn into_record(self) -> PredictionRecord {
        match self {
            PredictOutcome::Predicted(prediction) => PredictionRecord {
                disease_code: prediction.class.code().to_string(),
                disease_name: prediction.class.name().to_string(),
                confidence: prediction.confidence,
                all_probabilities: prediction
                    .probabilities
                    .iter()
                    .map(|(class, p)| (class.code().to_string(), *p))
                    .collect(),
                error: None,
            },
            PredictOutcome::ModelUnavailable => {
                let fallback = DiseaseClass::MelanocyticNevi;
                PredictionRecord {
                    disease_code: fallback.code().to_string(),
                    disease_name: fallback.name().to_string(),
                    confidence: FALLBACK_CONFIDENCE,
                    all_probabilities: FALLBACK_PROBABILITIES
                        .iter()
                        .map(|(class, p)| (class.code().to_string(), *p))
                        .collect(),
                    error: Some(MODEL_NOT_LOADED.to_string()),
                }
            }
            PredictOutcome::Failed(message) => PredictionRecord {
                disease_code: DiseaseClass::MelanocyticNevi.code().to_string(),
                disease_name: ERROR_DISEASE_NAME.to_string(),
                confidence: 0.0,
                all_probabilities: BTreeMap::new(),
                error: Some(message),
            },
        }
    }
}

/// Prediction record as seen by the UI and the HTTP endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub disease_code: String,
    pub disease_name: String,
    pub confidence: f32,
    pub all_probabilities: BTreeMap<String, f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Health check result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResult {
    pub model_loaded: bool,
    pub version: String,
}
