use serde_json::Value;

use super::error::MatchError;

/// Dimensionality of the vectors produced by the external embedding model
/// (all-MiniLM-L6-v2).
pub const EXPECTED_DIMENSIONS: usize = 384;

/// A parsed embedding vector.
///
/// Stored embeddings come back from the database in two encodings: a JSON
/// array of numbers, or a bracketed string (`"[0.1,0.2,...]"`). Both are
/// normalized here, at the ingestion boundary — nothing past this type
/// handles the raw encodings.
#[derive(Debug, Clone, PartialEq)]
pub struct Embedding(Vec<f32>);

impl Embedding {
    pub fn new(values: Vec<f32>) -> Self {
        Self(values)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// Normalizes a stored embedding value into a numeric vector.
    pub fn from_value(value: &Value) -> Result<Self, MatchError> {
        match value {
            Value::Array(items) => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    let n = item.as_f64().ok_or_else(|| {
                        MatchError::InvalidEmbeddingFormat(format!("non-numeric element: {item}"))
                    })?;
                    values.push(n as f32);
                }
                Ok(Self(values))
            }
            Value::String(raw) => Self::from_bracketed_str(raw),
            other => Err(MatchError::InvalidEmbeddingFormat(format!(
                "expected array or bracketed string, got {other}"
            ))),
        }
    }

    fn from_bracketed_str(raw: &str) -> Result<Self, MatchError> {
        let inner = raw
            .trim()
            .strip_prefix('[')
            .and_then(|s| s.strip_suffix(']'))
            .ok_or_else(|| {
                MatchError::InvalidEmbeddingFormat("missing surrounding brackets".to_string())
            })?;

        if inner.trim().is_empty() {
            return Ok(Self(Vec::new()));
        }

        inner
            .split(',')
            .map(|token| {
                token.trim().parse::<f32>().map_err(|_| {
                    MatchError::InvalidEmbeddingFormat(format!("non-numeric token: {token:?}"))
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

/// Cosine similarity between two equal-length vectors.
///
/// A zero-magnitude vector compares as 0.0 ("no relation") rather than NaN;
/// unequal lengths are a `DimensionMismatch` error, never an elementwise
/// comparison of what happens to overlap.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32, MatchError> {
    if a.len() != b.len() {
        return Err(MatchError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    Ok(dot / (norm_a * norm_b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_similarity_is_symmetric() {
        let a = [0.2, 0.5, 0.1];
        let b = [0.9, 0.3, 0.4];
        assert_eq!(
            cosine_similarity(&a, &b).unwrap(),
            cosine_similarity(&b, &a).unwrap()
        );
    }

    #[test]
    fn test_identical_nonzero_vectors_score_one() {
        let a = [0.3, 0.6, 0.2];
        let sim = cosine_similarity(&a, &a).unwrap();
        assert!((sim - 1.0).abs() < 1e-6, "similarity was {sim}");
    }

    #[test]
    fn test_zero_vector_scores_zero() {
        let zero = [0.0, 0.0, 0.0];
        let v = [0.5, 0.1, 0.3];
        assert_eq!(cosine_similarity(&zero, &v).unwrap(), 0.0);
        assert_eq!(cosine_similarity(&v, &zero).unwrap(), 0.0);
    }

    #[test]
    fn test_unequal_lengths_fail() {
        let a = [1.0, 0.0, 0.0];
        let b = [1.0, 0.0];
        match cosine_similarity(&a, &b) {
            Err(MatchError::DimensionMismatch { expected, actual }) => {
                assert_eq!(expected, 3);
                assert_eq!(actual, 2);
            }
            other => panic!("expected DimensionMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_orthogonal_vectors_score_zero() {
        let a = [1.0, 0.0];
        let b = [0.0, 1.0];
        assert_eq!(cosine_similarity(&a, &b).unwrap(), 0.0);
    }

    #[test]
    fn test_parse_native_array() {
        let parsed = Embedding::from_value(&json!([0.1, 0.2, 0.3])).unwrap();
        assert_eq!(parsed.as_slice(), &[0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_parse_bracketed_string_matches_native_array() {
        let from_string = Embedding::from_value(&json!("[0.1,0.2,0.3]")).unwrap();
        let from_array = Embedding::from_value(&json!([0.1, 0.2, 0.3])).unwrap();
        assert_eq!(from_string, from_array);
    }

    #[test]
    fn test_parse_bracketed_string_with_spaces() {
        let parsed = Embedding::from_value(&json!("[ 0.5, -0.25 , 1 ]")).unwrap();
        assert_eq!(parsed.as_slice(), &[0.5, -0.25, 1.0]);
    }

    #[test]
    fn test_parse_rejects_non_numeric_tokens() {
        let err = Embedding::from_value(&json!("[0.1,abc,0.3]")).unwrap_err();
        assert!(matches!(err, MatchError::InvalidEmbeddingFormat(_)));
    }

    #[test]
    fn test_parse_rejects_non_numeric_elements() {
        let err = Embedding::from_value(&json!([0.1, "x", 0.3])).unwrap_err();
        assert!(matches!(err, MatchError::InvalidEmbeddingFormat(_)));
    }

    #[test]
    fn test_parse_rejects_unbracketed_string() {
        let err = Embedding::from_value(&json!("0.1,0.2")).unwrap_err();
        assert!(matches!(err, MatchError::InvalidEmbeddingFormat(_)));
    }

    #[test]
    fn test_parse_rejects_other_json_shapes() {
        let err = Embedding::from_value(&json!({"v": [1.0]})).unwrap_err();
        assert!(matches!(err, MatchError::InvalidEmbeddingFormat(_)));
    }
}
