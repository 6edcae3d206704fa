//! Request lifecycle: `Idle -> Pending -> Succeeded | Failed`.
//!
//! Every submission bumps a generation counter. Only the completion
//! carrying the latest generation may resolve `Pending`, so when two
//! submissions race, the most recent one wins no matter which response
//! arrives last.

use std::fmt;
use std::time::Duration;

use medi_core::Notice;
use serde::Deserialize;

use crate::error::PredictError;
use crate::form::{InputMode, PredictionForm, PredictionPayload};
use crate::render::ResultView;

/// How long a failure notice stays up unless dismissed or superseded.
pub const ERROR_NOTICE_WINDOW: Duration = Duration::from_millis(6_000);

/// The `prediction` value returned by the service.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Prediction(f64);

impl Prediction {
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Only an exact `1` counts; `0`, `2` or anything else does not.
    pub fn is_diabetic(self) -> bool {
        self.0 == 1.0
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum PredictionState {
    #[default]
    Idle,
    Pending,
    Succeeded(Prediction),
    Failed(PredictError),
}

impl PredictionState {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn prediction(&self) -> Option<Prediction> {
        match self {
            Self::Succeeded(prediction) => Some(*prediction),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&PredictError> {
        match self {
            Self::Failed(error) => Some(error),
            _ => None,
        }
    }

    pub fn view(&self) -> ResultView {
        ResultView::from(self)
    }
}

/// A submission that still has to be sent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubmitTicket {
    pub generation: u64,
    pub payload: PredictionPayload,
}

#[derive(Debug, Default)]
pub struct PredictionSession {
    state: PredictionState,
    generation: u64,
    notice: Option<Notice>,
}

impl PredictionSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &PredictionState {
        &self.state
    }

    /// Generation of the latest submission; `0` before the first one.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The latest error notice, including a dismissed one.
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        if let Some(notice) = self.notice.as_mut() {
            notice.dismiss();
        }
    }

    /// Starts a submission: clears any shown result and error notice and
    /// enters `Pending`.
    ///
    /// Returns the ticket to send, or `None` when strict input parsing
    /// rejected the form, in which case the session is already `Failed`.
    pub fn begin(&mut self, form: &PredictionForm, mode: InputMode) -> Option<SubmitTicket> {
        self.generation += 1;
        if self.state.is_pending() {
            log::debug!(
                "prediction: request {} supersedes an in-flight request",
                self.generation
            );
        }
        self.state = PredictionState::Pending;
        self.dismiss_notice();

        match form.payload(mode) {
            Ok(payload) => {
                log::info!("prediction: submitting request {}", self.generation);
                Some(SubmitTicket {
                    generation: self.generation,
                    payload,
                })
            }
            Err(error) => {
                self.fail(error);
                None
            }
        }
    }

    /// Applies the outcome of request `generation`.
    ///
    /// Returns `false` when the outcome was dropped because a newer
    /// submission exists or the request was already resolved.
    pub fn complete(
        &mut self,
        generation: u64,
        outcome: Result<Prediction, PredictError>,
    ) -> bool {
        if generation != self.generation {
            log::debug!(
                "prediction: dropping response for request {generation}, latest is {}",
                self.generation
            );
            return false;
        }
        if !self.state.is_pending() {
            log::debug!("prediction: request {generation} already resolved");
            return false;
        }

        match outcome {
            Ok(prediction) => {
                log::info!("prediction: request {generation} returned {prediction}");
                self.state = PredictionState::Succeeded(prediction);
            }
            Err(error) => self.fail(error),
        }
        true
    }

    fn fail(&mut self, error: PredictError) {
        log::warn!(
            "prediction: request {} failed ({:?}): {error:?}",
            self.generation,
            error.kind()
        );
        self.notice =
            Some(Notice::error(error.message()).with_auto_hide(ERROR_NOTICE_WINDOW));
        self.state = PredictionState::Failed(error);
    }

    pub fn view(&self) -> ResultView {
        self.state.view()
    }
}
