//! Drives a [`PredictionSession`] with a [`Predictor`].
//!
//! Submitting is split in two so the caller decides where the request
//! runs: [`PredictionController::begin`] updates the session right away,
//! [`PredictionController::fulfil`] awaits the response and applies it.
//! The session lock is never held across the network call.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use medi_core::Notice;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::client::Predictor;
use crate::form::{InputMode, PredictionForm};
use crate::render::ResultView;
use crate::state::{PredictionSession, PredictionState, SubmitTicket};

#[derive(Debug)]
pub struct PredictionController<P> {
    session: Arc<Mutex<PredictionSession>>,
    predictor: Arc<P>,
    mode: InputMode,
}

impl<P> Clone for PredictionController<P> {
    fn clone(&self) -> Self {
        Self {
            session: Arc::clone(&self.session),
            predictor: Arc::clone(&self.predictor),
            mode: self.mode,
        }
    }
}

impl<P: Predictor> PredictionController<P> {
    pub fn new(predictor: P, mode: InputMode) -> Self {
        Self {
            session: Arc::new(Mutex::new(PredictionSession::new())),
            predictor: Arc::new(predictor),
            mode,
        }
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    fn session(&self) -> MutexGuard<'_, PredictionSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Enters `Pending` and returns the request to send, if any.
    pub fn begin(&self, form: &PredictionForm) -> Option<SubmitTicket> {
        self.session().begin(form, self.mode)
    }

    /// Sends `ticket` and applies the outcome. Returns whether the outcome
    /// was applied (it is dropped when a newer submission exists).
    pub async fn fulfil(&self, ticket: SubmitTicket) -> bool {
        let outcome = self.predictor.predict(ticket.payload).await;
        self.session().complete(ticket.generation, outcome)
    }

    /// Submits and waits for the outcome.
    pub async fn submit(&self, form: &PredictionForm) -> bool {
        match self.begin(form) {
            Some(ticket) => self.fulfil(ticket).await,
            None => false,
        }
    }

    /// Submits on `runtime` without waiting. The session is `Pending` by
    /// the time this returns.
    pub fn spawn_submit(&self, form: &PredictionForm, runtime: &Handle) -> Option<JoinHandle<bool>>
    where
        P: 'static,
    {
        let ticket = self.begin(form)?;
        let controller = self.clone();
        Some(runtime.spawn(async move { controller.fulfil(ticket).await }))
    }

    pub fn state(&self) -> PredictionState {
        self.session().state().clone()
    }

    pub fn view(&self) -> ResultView {
        self.session().view()
    }

    pub fn notice(&self) -> Option<Notice> {
        self.session().notice().cloned()
    }

    pub fn dismiss_notice(&self) {
        self.session().dismiss_notice();
    }
}
