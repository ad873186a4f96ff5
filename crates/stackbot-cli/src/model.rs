use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stackbot_evaluator::weights::WeightVector;
use stackbot_training::trainer::TrainingSummary;

/// Output of the `train` command.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrainedModel {
    pub trained_at: DateTime<Utc>,
    pub final_fitness: Option<f32>,
    pub iterations: usize,
    pub improvements: usize,
    pub weights: WeightVector,
}

impl TrainedModel {
    pub fn from_summary(summary: &TrainingSummary) -> Self {
        Self {
            trained_at: Utc::now(),
            final_fitness: summary.best_fitness,
            iterations: summary.iterations,
            improvements: summary.improvements,
            weights: summary.best_weights,
        }
    }
}

/// Any JSON file a weight vector can be loaded from.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WeightsFile {
    Model(TrainedModel),
    Bare(WeightVector),
}

impl WeightsFile {
    pub fn weights(&self) -> WeightVector {
        match self {
            WeightsFile::Model(model) => model.weights,
            WeightsFile::Bare(weights) => *weights,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_weights_file_accepts_bare_weights() {
        let file: WeightsFile = serde_json::from_value(json!({ "holes": -1.5 })).unwrap();
        let weights = file.weights();
        assert!((weights.holes - -1.5).abs() < f32::EPSILON);
        assert!((weights.lines - WeightVector::default().lines).abs() < f32::EPSILON);
    }

    #[test]
    fn test_weights_file_accepts_trained_model() {
        let summary = TrainingSummary {
            iterations: 5,
            improvements: 2,
            best_weights: WeightVector::default().map(|_, w| w * 2.0),
            best_fitness: Some(3.5),
        };
        let model = TrainedModel::from_summary(&summary);
        let json = serde_json::to_value(&model).unwrap();
        let file: WeightsFile = serde_json::from_value(json).unwrap();
        assert!(matches!(file, WeightsFile::Model(_)));
        assert_eq!(file.weights(), summary.best_weights);
    }

    #[test]
    fn test_weights_file_rejects_unknown_terms() {
        let result = serde_json::from_value::<WeightsFile>(json!({ "height": 1.0 }));
        assert!(result.is_err());
    }
}
