//! Qdrant backend implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use qdrant_client::Qdrant;
use qdrant_client::qdrant::vectors_config::Config as VectorsConfig;
use qdrant_client::qdrant::with_payload_selector::SelectorOptions;
use qdrant_client::qdrant::{Condition, Filter, PointId, SearchPointsBuilder};

use super::QdrantConfig;
use crate::TRACING_TARGET;
use crate::error::{VectorError, VectorResult};
use crate::store::{CollectionStats, SearchOptions, SearchResult, VectorStoreBackend};

/// Qdrant backend implementation.
pub struct QdrantBackend {
    client: Qdrant,
    config: QdrantConfig,
}

impl QdrantBackend {
    /// Creates a new Qdrant backend.
    pub async fn new(config: &QdrantConfig) -> VectorResult<Self> {
        let client = Qdrant::from_url(&config.url)
            .api_key(config.api_key.clone())
            .build()
            .map_err(|e| VectorError::connection(e.to_string()))?;

        tracing::debug!(
            target: TRACING_TARGET,
            url = %config.url,
            collection = %config.collection,
            "Connected to Qdrant"
        );

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Extracts point ID as a string.
    fn extract_point_id(id: Option<PointId>) -> Option<String> {
        use qdrant_client::qdrant::point_id::PointIdOptions;

        match id {
            Some(PointId {
                point_id_options: Some(id),
            }) => match id {
                PointIdOptions::Num(n) => Some(n.to_string()),
                PointIdOptions::Uuid(s) => Some(s),
            },
            _ => None,
        }
    }
}

#[async_trait]
impl VectorStoreBackend for QdrantBackend {
    fn name(&self) -> &'static str {
        "qdrant"
    }

    async fn search(
        &self,
        query: Vec<f32>,
        limit: usize,
        options: SearchOptions,
    ) -> VectorResult<Vec<SearchResult>> {
        let mut search = SearchPointsBuilder::new(&self.config.collection, query, limit as u64)
            .with_payload(SelectorOptions::Enable(true));

        if let Some(min_score) = options.min_score {
            search = search.score_threshold(min_score);
        }

        if let Some(filter_json) = options.filter
            && let Some(conditions) = parse_filter(&filter_json)
        {
            search = search.filter(Filter::must(conditions));
        }

        let response = self
            .client
            .search_points(search)
            .await
            .map_err(|e| VectorError::backend(e.to_string()))?;

        let results = response
            .result
            .into_iter()
            .map(|point| {
                let id = Self::extract_point_id(point.id).unwrap_or_default();
                let metadata: HashMap<String, serde_json::Value> = point
                    .payload
                    .into_iter()
                    .map(|(k, v)| (k, qdrant_value_to_json(v)))
                    .collect();

                SearchResult {
                    id,
                    score: point.score,
                    metadata,
                }
            })
            .collect();

        Ok(results)
    }

    async fn stats(&self) -> VectorResult<CollectionStats> {
        let response = self
            .client
            .collection_info(&self.config.collection)
            .await
            .map_err(|e| VectorError::backend(e.to_string()))?;

        let info = response
            .result
            .ok_or_else(|| VectorError::collection_not_found(&self.config.collection))?;

        let dimensions = info
            .config
            .and_then(|c| c.params)
            .and_then(|p| p.vectors_config)
            .and_then(|v| v.config)
            .and_then(|config| match config {
                VectorsConfig::Params(params) => Some(params.size as usize),
                VectorsConfig::ParamsMap(_) => None,
            });

        Ok(CollectionStats {
            total_vectors: info.points_count.unwrap_or(0),
            dimensions,
        })
    }
}

/// Converts Qdrant value to JSON value.
fn qdrant_value_to_json(value: qdrant_client::qdrant::Value) -> serde_json::Value {
    use qdrant_client::qdrant::value::Kind;

    match value.kind {
        Some(Kind::NullValue(_)) => serde_json::Value::Null,
        Some(Kind::BoolValue(b)) => serde_json::Value::Bool(b),
        Some(Kind::IntegerValue(i)) => serde_json::json!(i),
        Some(Kind::DoubleValue(f)) => serde_json::json!(f),
        Some(Kind::StringValue(s)) => serde_json::Value::String(s),
        Some(Kind::ListValue(list)) => {
            let arr: Vec<serde_json::Value> =
                list.values.into_iter().map(qdrant_value_to_json).collect();
            serde_json::Value::Array(arr)
        }
        Some(Kind::StructValue(obj)) => {
            let map: serde_json::Map<String, serde_json::Value> = obj
                .fields
                .into_iter()
                .map(|(k, v)| (k, qdrant_value_to_json(v)))
                .collect();
            serde_json::Value::Object(map)
        }
        None => serde_json::Value::Null,
    }
}

/// Parses a flat JSON object into Qdrant equality conditions.
fn parse_filter(filter: &serde_json::Value) -> Option<Vec<Condition>> {
    let serde_json::Value::Object(obj) = filter else {
        return None;
    };

    let conditions: Vec<Condition> = obj
        .iter()
        .filter_map(|(key, value)| match value {
            serde_json::Value::String(s) => Some(Condition::matches(key.clone(), s.clone())),
            serde_json::Value::Number(n) => n.as_i64().map(|i| Condition::matches(key.clone(), i)),
            serde_json::Value::Bool(b) => Some(Condition::matches(key.clone(), *b)),
            _ => None,
        })
        .collect();

    (!conditions.is_empty()).then_some(conditions)
}

#[cfg(test)]
mod tests {
    use qdrant_client::qdrant::value::Kind;

    use super::*;

    #[test]
    fn converts_nested_payload() {
        let value = qdrant_client::qdrant::Value {
            kind: Some(Kind::StructValue(qdrant_client::qdrant::Struct {
                fields: HashMap::from([(
                    "page".to_owned(),
                    qdrant_client::qdrant::Value {
                        kind: Some(Kind::IntegerValue(3)),
                    },
                )]),
            })),
        };

        assert_eq!(qdrant_value_to_json(value), serde_json::json!({"page": 3}));
    }

    #[test]
    fn filter_ignores_nested_values() {
        let filter = serde_json::json!({"source": "menter1994.pdf", "nested": {"a": 1}});
        assert_eq!(parse_filter(&filter).map(|c| c.len()), Some(1));
        assert!(parse_filter(&serde_json::json!({"nested": []})).is_none());
    }
}
