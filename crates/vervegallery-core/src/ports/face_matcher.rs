//! Face matcher port
//!
//! Contract for "search photos by face": an embedding vector goes in, a
//! ranked list of photos with a confidence score comes out. No model
//! service exists yet; see `vervegallery_store::face` for the placeholder
//! implementation.

use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, Photo};

/// Length of the descriptor produced by the gallery's face extractor
pub const DESCRIPTOR_LEN: usize = 128;

/// Face embedding vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f32>", into = "Vec<f32>")]
pub struct FaceDescriptor(Vec<f32>);

impl FaceDescriptor {
    /// Creates a descriptor from raw embedding values
    ///
    /// # Errors
    /// Returns error if the vector is empty or contains NaN/infinite values
    pub fn new(values: Vec<f32>) -> Result<Self, DomainError> {
        if values.is_empty() {
            return Err(DomainError::InvalidDescriptor(
                "descriptor cannot be empty".to_string(),
            ));
        }
        if let Some(pos) = values.iter().position(|v| !v.is_finite()) {
            return Err(DomainError::InvalidDescriptor(format!(
                "non-finite value at index {pos}"
            )));
        }
        Ok(Self(values))
    }

    /// The descriptor the gallery's extractor emits for any cropped face:
    /// [`DESCRIPTOR_LEN`] values of 0.5
    pub fn neutral() -> Self {
        Self(vec![0.5; DESCRIPTOR_LEN])
    }

    pub fn values(&self) -> &[f32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Vec<f32>> for FaceDescriptor {
    type Error = DomainError;

    fn try_from(values: Vec<f32>) -> Result<Self, Self::Error> {
        Self::new(values)
    }
}

impl From<FaceDescriptor> for Vec<f32> {
    fn from(descriptor: FaceDescriptor) -> Self {
        descriptor.0
    }
}

/// A photo matched against a face descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceMatch {
    pub photo: Photo,
    /// Similarity in `0.0..=1.0`, higher is better
    pub confidence: f32,
}

/// Port trait for face similarity search
#[async_trait::async_trait]
pub trait IFaceMatcher: Send + Sync {
    /// Ranks photos from `pool` that contain the face described by `descriptor`
    ///
    /// # Returns
    /// Matches sorted by descending confidence, each photo at most once
    async fn find_matches(
        &self,
        descriptor: &FaceDescriptor,
        pool: &[Photo],
    ) -> anyhow::Result<Vec<FaceMatch>>;
}
