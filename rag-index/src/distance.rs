use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::IndexError;

/// Distance function of the vector space. Smaller is more similar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    /// `1 - cos(a, b)`, in `[0, 2]`. Zero-norm vectors have similarity 0.
    Cosine,
    /// L2 distance.
    Euclid,
}

impl DistanceMetric {
    /// Distance between `a` and `b` given their precomputed magnitudes.
    pub fn distance(self, a: &[f32], mag_a: f32, b: &[f32], mag_b: f32) -> f32 {
        match self {
            DistanceMetric::Cosine => {
                if mag_a == 0.0 || mag_b == 0.0 {
                    return 1.0;
                }
                let sim = (dot(a, b) / (mag_a * mag_b)).clamp(-1.0, 1.0);
                1.0 - sim
            }
            DistanceMetric::Euclid => euclidean_distance_squared(a, b).sqrt(),
        }
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistanceMetric::Cosine => f.write_str("cosine"),
            DistanceMetric::Euclid => f.write_str("euclid"),
        }
    }
}

impl FromStr for DistanceMetric {
    type Err = IndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cosine" => Ok(DistanceMetric::Cosine),
            "euclid" | "euclidean" | "l2" => Ok(DistanceMetric::Euclid),
            other => Err(IndexError::Config(format!("unknown distance metric: {other}"))),
        }
    }
}

pub fn magnitude(v: &[f32]) -> f32 {
    dot(v, v).sqrt()
}

pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

pub fn euclidean_distance_squared(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}
