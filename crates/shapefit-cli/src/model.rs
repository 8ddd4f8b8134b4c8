use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shapefit_features::{FeatureIndex, FeatureKey, IndexBackend};
use shapefit_training::{Trainer, TrainerConfig, WeightVector};

use crate::util;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrainedModel {
    pub name: String,
    pub trained_at: DateTime<Utc>,
    pub best_metric: f32,
    pub rounds: u64,
    pub config: TrainerConfig,
    /// Features in ID order.
    pub features: Vec<TrainedFeature>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrainedFeature {
    pub key: FeatureKey,
    pub weight: f32,
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub enum FeatureOrder {
    /// Largest weight first
    #[default]
    Weight,
    /// Largest absolute weight first
    Magnitude,
}

impl TrainedModel {
    pub fn from_trainer(name: &str, trainer: &Trainer) -> Self {
        let weights = trainer.best_weights().as_slice();
        Self {
            name: name.to_owned(),
            trained_at: Utc::now(),
            best_metric: trainer.best_metric(),
            rounds: trainer.round(),
            config: trainer.config().clone(),
            features: trainer
                .index()
                .keys()
                .iter()
                .zip(weights)
                .map(|(key, &weight)| TrainedFeature {
                    key: key.clone(),
                    weight,
                })
                .collect(),
        }
    }

    pub fn open<P>(path: P) -> anyhow::Result<Self>
    where
        P: AsRef<Path>,
    {
        util::read_json_file("model", path)
    }

    /// Rebuilds the feature index and weight vector the model was trained with.
    pub fn to_index_and_weights(
        &self,
        backend: IndexBackend,
    ) -> anyhow::Result<(FeatureIndex, WeightVector)> {
        let index = FeatureIndex::from_keys(backend, self.features.iter().map(|f| f.key.clone()))
            .with_context(|| format!("Model {:?} has an inconsistent feature list", self.name))?;
        let weights = self.features.iter().map(|f| f.weight).collect::<Vec<_>>();
        Ok((index, WeightVector::from(weights)))
    }

    pub fn top_features(&self, count: usize, order: FeatureOrder) -> Vec<&TrainedFeature> {
        let mut features = self.features.iter().collect::<Vec<_>>();
        match order {
            FeatureOrder::Weight => features.sort_by(|a, b| b.weight.total_cmp(&a.weight)),
            FeatureOrder::Magnitude => {
                features.sort_by(|a, b| b.weight.abs().total_cmp(&a.weight.abs()));
            }
        }
        features.truncate(count);
        features
    }
}

#[cfg(test)]
mod tests {
    use shapefit_board::{Board, BoardSample};

    use super::*;

    fn trained() -> TrainedModel {
        let config = TrainerConfig {
            rounds: 50,
            report_interval: 0,
            ..TrainerConfig::default()
        };
        let mut trainer = Trainer::new(config, FeatureIndex::new()).unwrap();
        trainer.add_samples(&[BoardSample::new("PN/BR".parse::<Board>().unwrap(), 20.0)]);
        trainer.train();
        TrainedModel::from_trainer("test", &trainer)
    }

    #[test]
    fn test_json_roundtrip_restores_index() {
        let model = trained();
        assert_eq!(model.features.len(), 8);
        assert_eq!(model.rounds, 50);

        let json = serde_json::to_string(&model).unwrap();
        let back: TrainedModel = serde_json::from_str(&json).unwrap();
        let (index, weights) = back.to_index_and_weights(IndexBackend::Hash).unwrap();
        assert_eq!(index.len(), 8);
        for (i, feature) in model.features.iter().enumerate() {
            let id = index.lookup(&feature.key).unwrap();
            assert_eq!(id.index(), i);
            assert_eq!(weights.get(id).to_bits(), feature.weight.to_bits());
        }
    }

    #[test]
    fn test_top_features() {
        let mut model = trained();
        for (i, feature) in model.features.iter_mut().enumerate() {
            feature.weight = if i == 3 { -100.0 } else { f32::from(u8::try_from(i).unwrap()) };
        }
        let top = model.top_features(2, FeatureOrder::Weight);
        assert_eq!(top.iter().map(|f| f.weight).collect::<Vec<_>>(), [7.0, 6.0]);
        let top = model.top_features(1, FeatureOrder::Magnitude);
        assert_eq!(top[0].weight, -100.0);
        assert_eq!(model.top_features(100, FeatureOrder::Weight).len(), 8);
    }

    #[test]
    fn test_duplicate_keys_are_rejected() {
        let mut model = trained();
        let first = model.features[0].clone();
        model.features.push(first);
        assert!(model.to_index_and_weights(IndexBackend::Trie).is_err());
    }
}
