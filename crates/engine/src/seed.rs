//! Seed selection from a user's rating history.

use crate::model::TrainedModel;
use crate::recommend::Recommendation;
use data_loader::UserRating;
use tracing::debug;

/// Default number of recommendations per request
pub const DEFAULT_LIMIT: usize = 10;

/// Where a personalised list came from.
#[derive(Debug, Clone, PartialEq)]
pub enum RecommendationSource {
    /// Hybrid ranking anchored on this seed title
    Seeded(String),
    /// No rating mapped to a known movie; weighted-rating top list
    Fallback,
}

impl TrainedModel {
    /// Title of the first rating whose movie id is known to the catalog.
    ///
    /// `ratings` must already be ordered rating desc, timestamp desc.
    pub fn select_seed(&self, ratings: &[UserRating]) -> Option<&str> {
        ratings
            .iter()
            .find_map(|rating| self.index.title_for_id(&rating.movie_id))
    }

    /// Hybrid recommendations from the seed, or the weighted-rating list
    /// when no seed resolves. Always at most `n` entries.
    pub fn recommend_from_history(
        &self,
        ratings: &[UserRating],
        n: usize,
    ) -> (RecommendationSource, Vec<Recommendation>) {
        match self.select_seed(ratings) {
            Some(seed) => {
                debug!("Seed resolved to {:?} from {} ratings", seed, ratings.len());
                let recs = self.hybrid_recommendations(seed, n, true);
                (RecommendationSource::Seeded(seed.to_string()), recs)
            }
            None => {
                debug!("No seed among {} ratings, using fallback", ratings.len());
                (RecommendationSource::Fallback, self.top_rated(n))
            }
        }
    }
}
