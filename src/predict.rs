//! The prediction service: preprocess -> forward pass -> argmax -> label

use crate::error::GatewayError;
use crate::labels::LabelTable;
use crate::torch::{self, ImageClassifier};
use tracing::debug;

/// Orchestrates classification for one request. Shares the loaded model and
/// label table across requests; holds no per-request state.
#[derive(Debug)]
pub struct Predictor {
    classifier: ImageClassifier,
    labels: LabelTable,
}

impl Predictor {
    pub fn new(classifier: ImageClassifier, labels: LabelTable) -> Self {
        Predictor { classifier, labels }
    }

    /// Classify raw image bytes, returning the label of the top-scoring class
    pub fn classify(&self, bytes: &[u8]) -> Result<String, GatewayError> {
        let input = torch::preprocess(bytes)?;
        let scores = self.classifier.scores(&input)?;
        debug!("model produced {} class scores", scores.len());

        let index = best_index(&scores).ok_or(GatewayError::LabelLookup {
            index: 0,
            len: self.labels.len(),
        })?;
        let label = self.labels.get(index).ok_or(GatewayError::LabelLookup {
            index,
            len: self.labels.len(),
        })?;
        Ok(label.to_string())
    }
}

/// Index of the maximum score; ties resolve to the lowest index
fn best_index(scores: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &score) in scores.iter().enumerate() {
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((i, score)),
        }
    }
    best.map(|(i, _)| i)
}
