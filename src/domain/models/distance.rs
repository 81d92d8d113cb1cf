use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Distance metrics supported for similarity search.
///
/// Both metrics rank ascending: 0 means identical, larger means less
/// similar. Cosine distance is `1 - cosine_similarity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    Cosine,
    Euclidean,
}

impl DistanceMetric {
    /// Parses a metric name. Accepts `cosine`, `l2`, and `euclidean`
    /// (case-insensitive); anything else fails with `UnsupportedMetric`
    /// before any store round-trip.
    pub fn parse(name: &str) -> Result<Self, DomainError> {
        match name.to_ascii_lowercase().as_str() {
            "cosine" => Ok(Self::Cosine),
            "l2" | "euclidean" => Ok(Self::Euclidean),
            other => Err(DomainError::unsupported_metric(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cosine => "cosine",
            Self::Euclidean => "euclidean",
        }
    }

    /// Computes the distance between two equal-length vectors in process.
    ///
    /// Zero-magnitude inputs under the cosine metric yield 1.0 (no
    /// direction, no similarity) rather than dividing by zero.
    pub fn compute(&self, a: &[f32], b: &[f32]) -> f32 {
        match self {
            Self::Cosine => {
                let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
                let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
                let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
                if norm_a == 0.0 || norm_b == 0.0 {
                    return 1.0;
                }
                1.0 - dot / (norm_a * norm_b)
            }
            Self::Euclidean => a
                .iter()
                .zip(b.iter())
                .map(|(x, y)| (x - y) * (x - y))
                .sum::<f32>()
                .sqrt(),
        }
    }
}

impl std::fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_metrics() {
        assert_eq!(DistanceMetric::parse("cosine").unwrap(), DistanceMetric::Cosine);
        assert_eq!(DistanceMetric::parse("COSINE").unwrap(), DistanceMetric::Cosine);
        assert_eq!(DistanceMetric::parse("l2").unwrap(), DistanceMetric::Euclidean);
        assert_eq!(
            DistanceMetric::parse("euclidean").unwrap(),
            DistanceMetric::Euclidean
        );
    }

    #[test]
    fn test_parse_rejects_unknown_metric() {
        let err = DistanceMetric::parse("manhattan").unwrap_err();
        assert!(err.is_unsupported_metric());
    }

    #[test]
    fn test_cosine_distance_identical_vectors() {
        let d = DistanceMetric::Cosine.compute(&[1.0, 0.0, 0.0], &[1.0, 0.0, 0.0]);
        assert!(d.abs() < 1e-6);
    }

    #[test]
    fn test_cosine_distance_orthogonal_vectors() {
        let d = DistanceMetric::Cosine.compute(&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0]);
        assert!((d - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_distance_zero_vector() {
        let d = DistanceMetric::Cosine.compute(&[0.0, 0.0], &[1.0, 0.0]);
        assert_eq!(d, 1.0);
    }

    #[test]
    fn test_euclidean_distance() {
        let d = DistanceMetric::Euclidean.compute(&[0.0, 0.0], &[3.0, 4.0]);
        assert!((d - 5.0).abs() < 1e-6);
    }
}
