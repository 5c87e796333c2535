//! Placeholder face matcher
//!
//! There is no face-recognition model behind the gallery yet. The
//! [`SampledFaceMatcher`] satisfies the [`IFaceMatcher`] contract by picking
//! a random subset of the pool, so the search flow can be exercised end to
//! end. It ignores the descriptor.

use rand::{seq::SliceRandom, Rng};
use tracing::debug;
use vervegallery_core::{
    config::FaceSearchConfig,
    domain::Photo,
    ports::{FaceDescriptor, FaceMatch, IFaceMatcher},
};

/// Confidence range assigned to sampled matches
const MIN_CONFIDENCE: f32 = 0.55;
const MAX_CONFIDENCE: f32 = 0.99;

/// Random-subset [`IFaceMatcher`]
///
/// Returns between `min_matches` and `max_matches` distinct photos (the whole
/// pool when it is smaller than the drawn count), sorted by descending
/// confidence.
#[derive(Debug, Clone)]
pub struct SampledFaceMatcher {
    min_matches: usize,
    max_matches: usize,
}

impl SampledFaceMatcher {
    pub fn new(min_matches: usize, max_matches: usize) -> Self {
        let min_matches = min_matches.max(1);
        Self {
            min_matches,
            max_matches: max_matches.max(min_matches),
        }
    }

    pub fn from_config(config: &FaceSearchConfig) -> Self {
        Self::new(config.min_matches, config.max_matches)
    }

    fn sample(&self, pool: &[Photo]) -> Vec<FaceMatch> {
        let mut rng = rand::thread_rng();
        let count = rng
            .gen_range(self.min_matches..=self.max_matches)
            .min(pool.len());

        let mut confidences: Vec<f32> = (0..count)
            .map(|_| rng.gen_range(MIN_CONFIDENCE..=MAX_CONFIDENCE))
            .collect();
        confidences.sort_by(|a, b| b.total_cmp(a));

        pool.choose_multiple(&mut rng, count)
            .cloned()
            .zip(confidences)
            .map(|(photo, confidence)| FaceMatch { photo, confidence })
            .collect()
    }
}

impl Default for SampledFaceMatcher {
    fn default() -> Self {
        Self::from_config(&FaceSearchConfig::default())
    }
}

#[async_trait::async_trait]
impl IFaceMatcher for SampledFaceMatcher {
    async fn find_matches(
        &self,
        descriptor: &FaceDescriptor,
        pool: &[Photo],
    ) -> anyhow::Result<Vec<FaceMatch>> {
        let matches = self.sample(pool);
        debug!(
            descriptor_len = descriptor.len(),
            pool = pool.len(),
            matches = matches.len(),
            "Sampled face matches"
        );
        Ok(matches)
    }
}
