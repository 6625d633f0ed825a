use crate::domain::{PortError, PredictionDetails, PredictionOutcome, PredictionService, Team};
use async_trait::async_trait;
use reqwest::{StatusCode, header::AUTHORIZATION};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

#[derive(Debug, Serialize)]
struct OutcomeTitle<'a> {
    title: &'a str,
}

#[derive(Debug, Serialize)]
struct CreatePredictionRequest<'a> {
    broadcaster_id: &'a str,
    title: &'a str,
    outcomes: Vec<OutcomeTitle<'a>>,
    prediction_window: u32,
}

#[derive(Debug, Serialize)]
struct ResolvePredictionRequest<'a> {
    broadcaster_id: &'a str,
    id: &'a str,
    status: &'static str,
    winning_outcome_id: &'a str,
}

// Helix wraps every prediction payload in a `data` array.
#[derive(Debug, Deserialize)]
struct PredictionResponse {
    #[serde(default)]
    data: Vec<PredictionData>,
}

#[derive(Debug, Deserialize)]
struct PredictionData {
    id: String,
    #[serde(default)]
    outcomes: Vec<OutcomeData>,
}

#[derive(Debug, Deserialize)]
struct OutcomeData {
    id: String,
    title: String,
}

impl From<PredictionData> for PredictionDetails {
    fn from(data: PredictionData) -> Self {
        Self {
            id: data.id,
            outcomes: data
                .outcomes
                .into_iter()
                .map(|o| PredictionOutcome {
                    id: o.id,
                    title: o.title,
                })
                .collect(),
        }
    }
}

#[derive(Debug)]
pub enum PredictionClientError {
    UpstreamUnavailable(reqwest::Error),
    Rejected { status: StatusCode },
    InvalidResponse(reqwest::Error),
    EmptyResponse,
}

impl fmt::Display for PredictionClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredictionClientError::UpstreamUnavailable(err) => {
                write!(f, "prediction service unavailable: {err}")
            }
            PredictionClientError::Rejected { status } => {
                write!(f, "prediction service rejected request with {status}")
            }
            PredictionClientError::InvalidResponse(err) => {
                write!(f, "invalid prediction response: {err}")
            }
            PredictionClientError::EmptyResponse => write!(f, "prediction response had no data"),
        }
    }
}

impl std::error::Error for PredictionClientError {}

// Thin reqwest client for the channel prediction proxy.
#[derive(Clone)]
pub struct PredictionClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
    broadcaster_id: String,
    prediction_window_secs: u32,
}

impl PredictionClient {
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        broadcaster_id: impl Into<String>,
        prediction_window_secs: u32,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            token: token.into(),
            broadcaster_id: broadcaster_id.into(),
            prediction_window_secs,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/api/twitch/helix/predictions",
            self.base_url.trim_end_matches('/')
        )
    }

    fn auth_header(&self) -> String {
        format!("Token {}", self.token)
    }

    pub async fn create(
        &self,
        title: &str,
        outcomes: &[Team],
    ) -> Result<PredictionDetails, PredictionClientError> {
        let body = CreatePredictionRequest {
            broadcaster_id: &self.broadcaster_id,
            title,
            outcomes: outcomes
                .iter()
                .map(|team| OutcomeTitle {
                    title: team.as_str(),
                })
                .collect(),
            prediction_window: self.prediction_window_secs,
        };

        let response = self
            .http
            .post(self.endpoint())
            .header(AUTHORIZATION, self.auth_header())
            .json(&body)
            .send()
            .await
            .map_err(PredictionClientError::UpstreamUnavailable)?;

        if !response.status().is_success() {
            return Err(PredictionClientError::Rejected {
                status: response.status(),
            });
        }

        let parsed = response
            .json::<PredictionResponse>()
            .await
            .map_err(PredictionClientError::InvalidResponse)?;

        parsed
            .data
            .into_iter()
            .next()
            .map(PredictionDetails::from)
            .ok_or(PredictionClientError::EmptyResponse)
    }

    pub async fn resolve_with(
        &self,
        prediction_id: &str,
        winning_outcome_id: &str,
    ) -> Result<(), PredictionClientError> {
        let body = ResolvePredictionRequest {
            broadcaster_id: &self.broadcaster_id,
            id: prediction_id,
            status: "RESOLVED",
            winning_outcome_id,
        };

        let response = self
            .http
            .patch(self.endpoint())
            .header(AUTHORIZATION, self.auth_header())
            .json(&body)
            .send()
            .await
            .map_err(PredictionClientError::UpstreamUnavailable)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(PredictionClientError::Rejected {
                status: response.status(),
            })
        }
    }
}

#[async_trait]
impl PredictionService for PredictionClient {
    async fn open(&self, title: &str, outcomes: &[Team]) -> Result<PredictionDetails, PortError> {
        Ok(self.create(title, outcomes).await?)
    }

    async fn resolve(&self, prediction_id: &str, winning_outcome_id: &str) -> Result<(), PortError> {
        Ok(self.resolve_with(prediction_id, winning_outcome_id).await?)
    }
}
