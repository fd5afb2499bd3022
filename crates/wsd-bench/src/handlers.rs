use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

use crate::corpus::EvalRow;
use crate::error::InputError;
use crate::naive_bayes::NaiveBayesWsd;
use crate::stats::ModelSummary;
use crate::strategy::{Disambiguator, Prediction};

#[derive(Clone)]
pub struct AppState {
    pub naive_bayes: Arc<NaiveBayesWsd>,
    pub strategies: Vec<Arc<dyn Disambiguator>>,
}

#[derive(Deserialize)]
pub struct DisambiguateRequest {
    pub target_word: String,
    #[serde(default)]
    pub context: String,
}

#[derive(Serialize)]
pub struct StrategyPrediction {
    strategy: &'static str,
    predicted: Prediction,
}

#[derive(Serialize)]
pub struct DisambiguateResponse {
    target_word: String,
    predictions: Vec<StrategyPrediction>,
}

#[derive(Serialize)]
pub struct ModelResponse {
    #[serde(flatten)]
    summary: ModelSummary,
    alpha: f64,
    strategies: Vec<&'static str>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/v1/model", get(model))
        .route("/v1/disambiguate", post(disambiguate))
        .with_state(state)
}

async fn healthz() -> impl IntoResponse {
    "ok"
}

async fn model(State(state): State<AppState>) -> Json<ModelResponse> {
    Json(ModelResponse {
        summary: state.naive_bayes.statistics().summary(),
        alpha: state.naive_bayes.alpha(),
        strategies: state.strategies.iter().map(|s| s.name()).collect(),
    })
}

async fn disambiguate(
    State(state): State<AppState>,
    Json(request): Json<DisambiguateRequest>,
) -> Result<Json<DisambiguateResponse>, ApiError> {
    let row = EvalRow {
        id: "request".to_string(),
        target_word: request.target_word,
        context_string: request.context,
    };

    // Classification is CPU-bound.
    let strategies = state.strategies.clone();
    let (row, predictions) = tokio::task::spawn_blocking(move || {
        let predictions = strategies
            .iter()
            .map(|strategy| {
                strategy.disambiguate(&row).map(|predicted| StrategyPrediction {
                    strategy: strategy.name(),
                    predicted,
                })
            })
            .collect::<Result<Vec<_>, InputError>>();
        (row, predictions)
    })
    .await
    .map_err(|err| {
        error!("disambiguation task failed: {err}");
        ApiError::Internal
    })?;

    Ok(Json(DisambiguateResponse {
        target_word: row.target_word,
        predictions: predictions?,
    }))
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("internal server error")]
    Internal,
}

impl From<InputError> for ApiError {
    fn from(err: InputError) -> Self {
        match err {
            InputError::MissingTargetWord { .. } => {
                ApiError::BadRequest("target_word is required".to_string())
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
