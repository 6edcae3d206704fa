//! Transport for prediction requests.

use std::future::Future;

use reqwest::StatusCode;
use serde::Deserialize;

use crate::config::PredictConfig;
use crate::error::PredictError;
use crate::form::PredictionPayload;
use crate::state::Prediction;

/// Sends one payload and reports how the request ended.
pub trait Predictor: Send + Sync {
    fn predict(
        &self,
        payload: PredictionPayload,
    ) -> impl Future<Output = Result<Prediction, PredictError>> + Send;
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    prediction: Prediction,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// `POST {backend_url}/predict` with a JSON body.
#[derive(Debug, Clone)]
pub struct HttpPredictor {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpPredictor {
    pub fn new(config: &PredictConfig) -> Result<Self, PredictError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| PredictError::Client(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: config.endpoint(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn send(&self, payload: PredictionPayload) -> Result<Prediction, PredictError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(|e| PredictError::Network {
                detail: e.to_string(),
            })?;

        let status = response.status();
        log::debug!("prediction: {} answered {status}", self.endpoint);

        if status.is_success() {
            let body: PredictResponse =
                response
                    .json()
                    .await
                    .map_err(|e| PredictError::MalformedResponse {
                        detail: e.to_string(),
                    })?;
            return Ok(body.prediction);
        }

        if status == StatusCode::BAD_REQUEST {
            return match response.json::<ErrorBody>().await {
                Ok(body) => Err(PredictError::BadRequest(body.error)),
                Err(e) => {
                    log::debug!("prediction: unreadable 400 body: {e}");
                    Err(PredictError::UnexpectedStatus {
                        status: status.as_u16(),
                    })
                }
            };
        }

        Err(PredictError::UnexpectedStatus {
            status: status.as_u16(),
        })
    }
}

impl Predictor for HttpPredictor {
    fn predict(
        &self,
        payload: PredictionPayload,
    ) -> impl Future<Output = Result<Prediction, PredictError>> + Send {
        self.send(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_comes_from_config() {
        let config = PredictConfig {
            backend_url: "http://127.0.0.1:9/".to_string(),
            ..PredictConfig::default()
        };
        let predictor = HttpPredictor::new(&config).unwrap();
        assert_eq!(predictor.endpoint(), "http://127.0.0.1:9/predict");
    }

    #[test]
    fn response_bodies_deserialize() {
        let ok: PredictResponse = serde_json::from_str(r#"{"prediction": 1}"#).unwrap();
        assert_eq!(ok.prediction, Prediction::new(1.0));
        assert!(ok.prediction.is_diabetic());
        let other: PredictResponse = serde_json::from_str(r#"{"prediction": 0.0}"#).unwrap();
        assert!(!other.prediction.is_diabetic());
        let err: ErrorBody = serde_json::from_str(r#"{"error": "Glucose out of range"}"#).unwrap();
        assert_eq!(err.error, "Glucose out of range");
        assert!(serde_json::from_str::<PredictResponse>(r#"{"outcome": 1}"#).is_err());
    }
}
