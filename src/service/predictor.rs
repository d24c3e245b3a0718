//! Predictor - turns an uploaded image into a labeled prediction
//!
//! Never returns an error to its caller: a missing model yields the fixed
//! fallback result, and any decoding or inference failure is reported as a
//! zero-confidence error result.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use image::DynamicImage;
use ndarray::Array4;
use tracing::{info, warn};

use crate::engine::preprocess::{preprocess_bytes, preprocess_for_classifier};
use crate::engine::{Classifier, DiseaseClass, ALL_CLASSES, NUM_CLASSES};
use crate::utils::math::argmax;

use super::types::*;

/// Skin lesion predictor
pub struct Predictor {
    model: Option<Arc<dyn Classifier>>,
}

impl Predictor {
    /// Create a predictor; `None` runs in degraded (fallback) mode
    pub fn new(model: Option<Arc<dyn Classifier>>) -> Self {
        Self { model }
    }

    pub fn is_model_loaded(&self) -> bool {
        self.model.is_some()
    }

    /// Predict from encoded image bytes
    pub fn predict_bytes(&self, image_data: &[u8]) -> PredictOutcome {
        let Some(model) = &self.model else {
            return PredictOutcome::ModelUnavailable;
        };

        let start = Instant::now();
        let result =
            preprocess_bytes(image_data).and_then(|input| Self::run(model.as_ref(), &input));
        Self::finish(result, start)
    }

    /// Predict from an already decoded image
    pub fn predict_image(&self, image: &DynamicImage) -> PredictOutcome {
        let Some(model) = &self.model else {
            return PredictOutcome::ModelUnavailable;
        };

        let start = Instant::now();
        let input = preprocess_for_classifier(image);
        Self::finish(Self::run(model.as_ref(), &input), start)
    }

    /// Predict on the blocking thread pool
    pub async fn predict(self: &Arc<Self>, image_data: Vec<u8>) -> PredictOutcome {
        let predictor = self.clone();
        tokio::task::spawn_blocking(move || predictor.predict_bytes(&image_data))
            .await
            .unwrap_or_else(|e| {
                warn!("Prediction task failed: {}", e);
                PredictOutcome::Failed(e.to_string())
            })
    }

    /// Get health status
    pub fn health(&self) -> HealthResult {
        HealthResult {
            model_loaded: self.is_model_loaded(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    fn run(model: &dyn Classifier, input: &Array4<f32>) -> Result<Prediction> {
        let scores = model.classify(input).context("Inference failed")?;

        if scores.len() != NUM_CLASSES {
            anyhow::bail!("Model returned {} scores, expected {}", scores.len(), NUM_CLASSES);
        }
        // A NaN would serialize as null and make argmax meaningless
        if let Some(i) = scores.iter().position(|v| v.is_nan()) {
            anyhow::bail!("Model returned NaN score for {}", ALL_CLASSES[i].code());
        }

        let best = argmax(&scores).context("Model returned no usable scores")?;
        let class = DiseaseClass::from_index(best).context("Predicted index out of range")?;

        Ok(Prediction {
            class,
            confidence: scores[best],
            probabilities: ALL_CLASSES.iter().copied().zip(scores).collect(),
        })
    }

    fn finish(result: Result<Prediction>, start: Instant) -> PredictOutcome {
        let elapsed_ms = start.elapsed().as_millis();
        match result {
            Ok(prediction) => {
                info!(
                    "Predicted {} ({:.3}) in {}ms",
                    prediction.class.code(),
                    prediction.confidence,
                    elapsed_ms
                );
                PredictOutcome::Predicted(prediction)
            }
            Err(e) => {
                warn!("Prediction error: {:#}", e);
                PredictOutcome::Failed(format!("{:#}", e))
            }
        }
    }
}
