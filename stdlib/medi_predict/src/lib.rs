//! Diabetes prediction form and its request lifecycle.
//!
//! The form holds eight numeric fields as typed. Submitting parses them,
//! moves the session to [`PredictionState::Pending`] and sends one request
//! through a [`Predictor`]. The completion moves the session to
//! `Succeeded` or `Failed`; completions from superseded submissions are
//! dropped by generation number.
//!
//! ```no_run
//! use medi_predict::{HttpPredictor, PredictConfig, PredictionController, PredictionForm, Feature};
//!
//! # async fn run() -> Result<(), medi_predict::PredictError> {
//! let config = PredictConfig::from_env();
//! let controller = PredictionController::new(HttpPredictor::new(&config)?, config.input_mode);
//! let mut form = PredictionForm::new();
//! form.set(Feature::Glucose, "148");
//! controller.submit(&form).await;
//! println!("{}", controller.view());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod form;
pub mod render;
pub mod state;

pub use client::{HttpPredictor, Predictor};
pub use config::PredictConfig;
pub use controller::PredictionController;
pub use error::{FailureKind, PredictError};
pub use form::{Feature, InputMode, PredictionForm, PredictionPayload};
pub use render::{ResultLabel, ResultView, Tone};
pub use state::{Prediction, PredictionSession, PredictionState, SubmitTicket};
