//! Inference engine module
//!
//! Provides the skin condition class table, image preprocessing and the
//! OpenVINO-backed classifier.

pub mod classes;
pub mod model;
pub mod preprocess;

pub use classes::{DiseaseClass, Severity, ALL_CLASSES, NUM_CLASSES};
pub use model::{load_classifier, Classifier, OpenVinoClassifier};
