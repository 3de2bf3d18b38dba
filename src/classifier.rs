//! Classifier abstraction the pipeline runs inference through.
//!
//! The pipeline never loads a model itself; callers hand it anything
//! implementing [`Classifier`]. [`MockClassifier`] ships as a deterministic
//! stand-in for tests and harnesses without a model.

use crate::error::Result;
use crate::types::{InferenceTensor, Label, Prediction};
use ndarray::Array2;

/// Inference backend contract for the classification pipeline.
///
/// `Send + Sync` so one backend instance can serve concurrent requests.
pub trait Classifier: Send + Sync {
    /// Run inference on a preprocessed `(H, W, 3)` tensor.
    fn predict(&self, tensor: &InferenceTensor) -> Result<Prediction>;

    /// Activation map for the given class index, when the backend can
    /// produce one. `Ok(None)` means explanations proceed without a heatmap.
    fn activation_map(
        &self,
        tensor: &InferenceTensor,
        class_index: usize,
    ) -> Result<Option<Array2<f32>>>;

    /// Backend name for logs and diagnostics.
    fn name(&self) -> &str {
        "classifier"
    }
}

/// Deterministic stand-in classifier for tests and model-less deployments.
///
/// Always answers with the configured label and confidence, and serves a
/// fixed center-peaked activation map so the overlay path stays exercised.
#[derive(Debug, Clone)]
pub struct MockClassifier {
    label: Label,
    confidence: f32,
    activation_map_size: usize,
}

impl MockClassifier {
    /// Mock answering `Original` at 85.5% confidence, mirroring a healthy
    /// authentic-product prediction.
    #[must_use]
    pub fn original() -> Self {
        Self::with_prediction(Label::Original, 85.5)
    }

    /// Mock answering `Fake` at the given confidence.
    #[must_use]
    pub fn fake(confidence: f32) -> Self {
        Self::with_prediction(Label::Fake, confidence)
    }

    /// Mock with an arbitrary fixed prediction.
    #[must_use]
    pub fn with_prediction(label: Label, confidence: f32) -> Self {
        Self {
            label,
            confidence,
            activation_map_size: 7,
        }
    }

    /// Disable activation maps, exercising the no-heatmap path.
    #[must_use]
    pub fn without_activation_map(mut self) -> Self {
        self.activation_map_size = 0;
        self
    }
}

impl Classifier for MockClassifier {
    fn predict(&self, _tensor: &InferenceTensor) -> Result<Prediction> {
        let confident = self.confidence / 100.0;
        let probabilities = match self.label {
            Label::Original => [confident, 1.0 - confident],
            Label::Fake => [1.0 - confident, confident],
        };
        Prediction::new(self.label, self.confidence, probabilities)
    }

    fn activation_map(
        &self,
        _tensor: &InferenceTensor,
        _class_index: usize,
    ) -> Result<Option<Array2<f32>>> {
        if self.activation_map_size == 0 {
            return Ok(None);
        }
        let size = self.activation_map_size;
        let center = (size as f32 - 1.0) / 2.0;
        // Radial falloff peaking at the map center.
        let map = Array2::from_shape_fn((size, size), |(y, x)| {
            let dy = (y as f32 - center) / center.max(1.0);
            let dx = (x as f32 - center) / center.max(1.0);
            (1.0 - (dx * dx + dy * dy).sqrt() / std::f32::consts::SQRT_2).clamp(0.0, 1.0)
        });
        Ok(Some(map))
    }

    fn name(&self) -> &str {
        "mock"
    }
}
