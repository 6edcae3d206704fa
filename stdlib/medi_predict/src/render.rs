//! What the result area shows for each lifecycle state.

use std::fmt;

use crate::state::{Prediction, PredictionState};

pub const DIABETIC: &str = "Diabetic";
pub const NON_DIABETIC: &str = "Non-Diabetic";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// High-alert styling.
    Alert,
    Normal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultLabel {
    pub outcome: &'static str,
    pub tone: Tone,
}

impl ResultLabel {
    pub fn for_prediction(prediction: Prediction) -> Self {
        if prediction.is_diabetic() {
            Self {
                outcome: DIABETIC,
                tone: Tone::Alert,
            }
        } else {
            Self {
                outcome: NON_DIABETIC,
                tone: Tone::Normal,
            }
        }
    }
}

impl fmt::Display for ResultLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Prediction Result: {}", self.outcome)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultView {
    /// Nothing shown: no submission yet, or the last one failed.
    Hidden,
    Loading,
    Result(ResultLabel),
}

impl ResultView {
    pub fn label(&self) -> Option<&ResultLabel> {
        match self {
            Self::Result(label) => Some(label),
            Self::Hidden | Self::Loading => None,
        }
    }
}

impl From<&PredictionState> for ResultView {
    fn from(state: &PredictionState) -> Self {
        match state {
            PredictionState::Idle | PredictionState::Failed(_) => Self::Hidden,
            PredictionState::Pending => Self::Loading,
            PredictionState::Succeeded(prediction) => {
                Self::Result(ResultLabel::for_prediction(*prediction))
            }
        }
    }
}

impl fmt::Display for ResultView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hidden => Ok(()),
            Self::Loading => f.write_str("Loading..."),
            Self::Result(label) => write!(f, "{label}"),
        }
    }
}
