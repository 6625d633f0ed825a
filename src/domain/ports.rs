use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::state::Team;

pub type PortError = Box<dyn std::error::Error + Send + Sync>;

// One selectable outcome of an open prediction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionOutcome {
    pub id: String,
    pub title: String,
}

// Handle to an open prediction, kept by the match until it is resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionDetails {
    pub id: String,
    pub outcomes: Vec<PredictionOutcome>,
}

impl PredictionDetails {
    /// Outcome whose title names the given team.
    pub fn outcome_for(&self, team: Team) -> Option<&PredictionOutcome> {
        self.outcomes
            .iter()
            .find(|outcome| outcome.title == team.as_str())
    }
}

// Port for the external wagering service. The match task depends on this
// trait, not on the HTTP client.
#[async_trait]
pub trait PredictionService: Send + Sync {
    async fn open(&self, title: &str, outcomes: &[Team]) -> Result<PredictionDetails, PortError>;
    async fn resolve(&self, prediction_id: &str, winning_outcome_id: &str) -> Result<(), PortError>;
}

// Port for the match's random stream (spawn placement, bounce jitter, team tie-breaks).
pub trait RandomSource: Send {
    /// Uniform sample in `[0, 1)`.
    fn next_f64(&mut self) -> f64;
}
