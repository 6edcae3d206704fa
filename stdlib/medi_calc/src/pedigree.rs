//! Family-history ("pedigree") calculator.
//!
//! Relatives are an ordered list identified only by position. Removing one
//! parks it in a single-slot undo buffer and raises a notice with an UNDO
//! action. The notice hides itself after a few seconds, but the buffer is
//! kept until the next removal or an undo, so a late undo still restores.
//!
//! The score is a placeholder: every relative with an age of onset adds
//! `(100 - age) * 0.01`. It is not a clinical formula.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use medi_core::{env, to_fixed, to_number, Notice};

use crate::error::CalcError;

pub const REMOVED_MESSAGE: &str = "Relative removed";
pub const UNDO_ACTION: &str = "UNDO";
pub const DEFAULT_UNDO_WINDOW: Duration = Duration::from_millis(5_000);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Relative {
    /// Age of onset as typed; empty means "not filled in".
    pub age_of_onset: String,
}

impl Relative {
    pub fn new(age_of_onset: impl Into<String>) -> Self {
        Self {
            age_of_onset: age_of_onset.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.age_of_onset.is_empty()
    }

    /// `None` for an empty field, otherwise the coerced number (possibly NaN).
    pub fn age(&self) -> Option<f64> {
        if self.is_empty() {
            None
        } else {
            Some(to_number(&self.age_of_onset))
        }
    }
}

/// The most recently removed relative and the position it was removed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovedRelative {
    pub relative: Relative,
    pub index: usize,
}

/// Where an undone removal goes back into the list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UndoPlacement {
    /// Append at the end, whatever happened to the list meanwhile.
    #[default]
    Append,
    /// Re-insert at the index it was removed from, clamped to the length.
    Original,
}

impl FromStr for UndoPlacement {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "append" | "end" => Ok(Self::Append),
            "original" | "index" => Ok(Self::Original),
            _ => Err(CalcError::UnknownPlacement(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PedigreeConfig {
    /// How long the "Relative removed" notice stays up.
    pub undo_window: Duration,
    pub placement: UndoPlacement,
}

impl Default for PedigreeConfig {
    fn default() -> Self {
        Self {
            undo_window: DEFAULT_UNDO_WINDOW,
            placement: UndoPlacement::default(),
        }
    }
}

impl PedigreeConfig {
    /// Reads `MEDI_UNDO_NOTICE_MS` and `MEDI_UNDO_PLACEMENT`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(ms) = env::parse_var::<u64>("MEDI_UNDO_NOTICE_MS") {
            config.undo_window = Duration::from_millis(ms);
        }
        if let Some(placement) = env::parse_var::<UndoPlacement>("MEDI_UNDO_PLACEMENT") {
            config.placement = placement;
        }
        config
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PedigreeScore(f64);

impl PedigreeScore {
    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for PedigreeScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&to_fixed(self.0, 2))
    }
}

/// Sums `(100 - age) * 0.01` over relatives with an age. Empty ages are
/// skipped. The sum is kept unrounded; [`PedigreeScore`] rounds for display.
pub fn pedigree_score(relatives: &[Relative]) -> f64 {
    relatives
        .iter()
        .filter_map(Relative::age)
        .fold(0.0, |acc, age| acc + (100.0 - age) * 0.01)
}

#[derive(Debug, Clone)]
pub struct PedigreeCalculator {
    relatives: Vec<Relative>,
    removed: Option<RemovedRelative>,
    notice: Option<Notice>,
    score: Option<PedigreeScore>,
    config: PedigreeConfig,
}

impl Default for PedigreeCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl PedigreeCalculator {
    /// A panel with one empty relative, ready for input.
    pub fn new() -> Self {
        Self::with_config(PedigreeConfig::default())
    }

    pub fn with_config(config: PedigreeConfig) -> Self {
        Self {
            relatives: vec![Relative::default()],
            removed: None,
            notice: None,
            score: None,
            config,
        }
    }

    pub fn config(&self) -> &PedigreeConfig {
        &self.config
    }

    pub fn relatives(&self) -> &[Relative] {
        &self.relatives
    }

    pub fn len(&self) -> usize {
        self.relatives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relatives.is_empty()
    }

    /// Appends a relative with an empty age of onset.
    pub fn add(&mut self) {
        self.relatives.push(Relative::default());
    }

    pub fn update(&mut self, index: usize, value: impl Into<String>) -> Result<(), CalcError> {
        let len = self.relatives.len();
        let relative = self
            .relatives
            .get_mut(index)
            .ok_or(CalcError::IndexOutOfRange { index, len })?;
        relative.age_of_onset = value.into();
        Ok(())
    }

    /// Removes the relative at `index` into the undo buffer and raises the
    /// undo notice. A previous buffered relative is discarded for good.
    pub fn remove(&mut self, index: usize) -> Result<Relative, CalcError> {
        let len = self.relatives.len();
        if index >= len {
            return Err(CalcError::IndexOutOfRange { index, len });
        }
        let relative = self.relatives.remove(index);
        let previous = self.removed.replace(RemovedRelative {
            relative: relative.clone(),
            index,
        });
        if let Some(previous) = previous {
            log::debug!(
                "pedigree: undo buffer overwritten, dropping relative removed from {}",
                previous.index
            );
        }
        self.notice = Some(
            Notice::info(REMOVED_MESSAGE)
                .with_action(UNDO_ACTION)
                .with_auto_hide(self.config.undo_window),
        );
        Ok(relative)
    }

    /// Restores the buffered relative and closes the undo notice.
    ///
    /// Returns the index it was restored at, or `None` when the buffer was
    /// empty. The notice is closed either way.
    pub fn undo(&mut self) -> Option<usize> {
        self.dismiss_notice();
        let removed = self.removed.take()?;
        let at = match self.config.placement {
            UndoPlacement::Append => self.relatives.len(),
            UndoPlacement::Original => removed.index.min(self.relatives.len()),
        };
        self.relatives.insert(at, removed.relative);
        Some(at)
    }

    pub fn pending_undo(&self) -> Option<&RemovedRelative> {
        self.removed.as_ref()
    }

    /// The undo notice, including a hidden or dismissed one.
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        if let Some(notice) = self.notice.as_mut() {
            notice.dismiss();
        }
    }

    pub fn compute_score(&mut self) -> PedigreeScore {
        let score = PedigreeScore(pedigree_score(&self.relatives));
        log::debug!(
            "pedigree: {} relatives -> score {score}",
            self.relatives.len()
        );
        self.score = Some(score);
        score
    }

    pub fn score(&self) -> Option<PedigreeScore> {
        self.score
    }

    pub fn display(&self) -> Option<String> {
        self.score
            .map(|score| format!("Your Diabetes Pedigree Function Score is: {score}"))
    }

    /// Field labels, one per relative, numbered from 1.
    pub fn labels(&self) -> impl Iterator<Item = String> + '_ {
        (1..=self.relatives.len()).map(|n| format!("Relative {n} Age of Onset"))
    }
}
