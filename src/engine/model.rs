//! Classifier model handle
//!
//! The model is loaded once at startup and shared read-only by every request.
//! When loading fails the service keeps running without a model and the
//! predictor answers with its fallback result.

use std::ops::Deref;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use ndarray::Array4;
use openvino::{CompiledModel, Core, ElementType, Shape, Tensor};
use parking_lot::Mutex;
use tracing::{debug, error, info};

use crate::config::ModelConfig;

/// A trained image classifier
///
/// Takes a `(1, 224, 224, 3)` batch and returns one probability per class,
/// in class table order.
pub trait Classifier: Send + Sync {
    fn classify(&self, input: &Array4<f32>) -> Result<Vec<f32>>;
}

/// Wrapper for OpenVINO Core that implements Send + Sync
struct SafeCore(Core);
unsafe impl Send for SafeCore {}
unsafe impl Sync for SafeCore {}

/// Wrapper for OpenVINO CompiledModel that implements Send
///
/// Only ever accessed through the `Mutex` in `OpenVinoClassifier`.
struct SafeCompiledModel(CompiledModel);
unsafe impl Send for SafeCompiledModel {}

impl Deref for SafeCompiledModel {
    type Target = CompiledModel;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::ops::DerefMut for SafeCompiledModel {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

/// Classifier backed by an OpenVINO compiled model
pub struct OpenVinoClassifier {
    // Keeps the runtime alive for as long as the compiled model
    _core: SafeCore,
    compiled: Mutex<SafeCompiledModel>,
    path: String,
}

impl OpenVinoClassifier {
    /// Read and compile a model for the given device
    pub fn load(path: &Path, device: &str) -> Result<Self> {
        let path_str = path
            .to_str()
            .with_context(|| format!("Model path is not valid UTF-8: {:?}", path))?;
        if !path.exists() {
            anyhow::bail!("Model file not found: {}", path_str);
        }

        info!("Loading model from {} on {}", path_str, device);
        let start = Instant::now();

        let mut core = Core::new().context("Failed to initialize OpenVINO runtime")?;
        let model = core
            .read_model_from_file(path_str, "")
            .with_context(|| format!("Failed to read model {}", path_str))?;
        let compiled = core
            .compile_model(&model, device.into())
            .with_context(|| format!("Failed to compile model for {}", device))?;

        info!("Model loaded in {:?}", start.elapsed());

        Ok(Self {
            _core: SafeCore(core),
            compiled: Mutex::new(SafeCompiledModel(compiled)),
            path: path_str.to_string(),
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl Classifier for OpenVinoClassifier {
    fn classify(&self, input: &Array4<f32>) -> Result<Vec<f32>> {
        let mut request = self.compiled.lock().create_infer_request()?;

        let dims: Vec<i64> = input.shape().iter().map(|&d| d as i64).collect();
        let input_shape = Shape::new(&dims)?;
        let mut tensor = Tensor::new(ElementType::F32, &input_shape)?;

        let raw = tensor.get_raw_data_mut()?;
        for (dst, value) in raw.chunks_exact_mut(4).zip(input.iter()) {
            dst.copy_from_slice(&value.to_ne_bytes());
        }

        request.set_input_tensor(&tensor)?;
        request.infer()?;

        let output = request.get_output_tensor()?;
        let output_data: Vec<f32> = output
            .get_raw_data()?
            .chunks_exact(4)
            .map(|chunk| f32::from_ne_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect();

        debug!("Classifier raw output: {:?}", output_data);
        Ok(output_data)
    }
}

/// Load the configured model, or `None` to run in degraded mode
pub fn load_classifier(config: &ModelConfig) -> Option<Arc<dyn Classifier>> {
    match OpenVinoClassifier::load(&config.path, &config.device) {
        Ok(classifier) => {
            info!("Model loaded successfully from {}", classifier.path());
            Some(Arc::new(classifier))
        }
        Err(e) => {
            error!("Error loading model: {:#}", e);
            None
        }
    }
}
