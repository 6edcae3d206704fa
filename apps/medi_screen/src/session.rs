use std::time::Instant;

use medi_calc::{BmiConverter, CalcError, PedigreeCalculator, PedigreeConfig};
use medi_core::{Notice, Severity};
use medi_predict::{Feature, PredictionController, PredictionForm, Predictor, ResultView};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

const HELP: &[&str] = &[
    "bmi panel:      weight <kg>, height <cm>, bmi",
    "pedigree panel: relatives, add, age <n> <years>, remove <n>, undo, score",
    "prediction:     form, set <field> <value>, predict, status, wait, dismiss",
    "session:        :help, :quit",
    "fields: Pregnancies Glucose BloodPressure SkinThickness Insulin BMI DiabetesPedigreeFunction Age",
];

/// One user's screening session: the three panels plus the in-flight
/// prediction request, if any.
pub struct ScreenSession<P> {
    bmi: BmiConverter,
    pedigree: PedigreeCalculator,
    form: PredictionForm,
    controller: PredictionController<P>,
    runtime: Handle,
    in_flight: Option<JoinHandle<bool>>,
}

impl<P: Predictor + 'static> ScreenSession<P> {
    pub fn new(
        controller: PredictionController<P>,
        pedigree: PedigreeConfig,
        runtime: Handle,
    ) -> Self {
        Self {
            bmi: BmiConverter::new(),
            pedigree: PedigreeCalculator::with_config(pedigree),
            form: PredictionForm::new(),
            controller,
            runtime,
            in_flight: None,
        }
    }

    pub fn prompt(&self) -> &'static str {
        if self.controller.state().is_pending() {
            "screen (pending)> "
        } else {
            "screen> "
        }
    }

    /// Handles one input line. Returns the lines to print and whether the
    /// session should end.
    pub fn handle_line(&mut self, line: &str) -> (Vec<String>, bool) {
        let trimmed = line.trim();
        let (command, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (trimmed, ""),
        };

        let out = match command {
            "" => Vec::new(),
            ":help" | "help" => HELP.iter().map(|l| l.to_string()).collect(),
            ":q" | ":quit" | ":exit" => return (Vec::new(), true),

            "weight" => {
                self.bmi.set_weight(rest);
                Vec::new()
            }
            "height" => {
                self.bmi.set_height(rest);
                Vec::new()
            }
            "bmi" => self.calculate_bmi(),

            "relatives" => self.render_relatives(),
            "add" => {
                self.pedigree.add();
                self.render_relatives()
            }
            "age" => self.update_relative(rest),
            "remove" => self.remove_relative(rest),
            "undo" => match self.pedigree.undo() {
                Some(at) => vec![format!("restored as relative {}", at + 1)],
                None => vec!["nothing to undo".to_string()],
            },
            "score" => {
                self.pedigree.compute_score();
                self.pedigree.display().into_iter().collect()
            }

            "form" => self
                .form
                .fields()
                .map(|(feature, text)| format!("{feature}: {text}"))
                .collect(),
            "set" => self.set_field(rest),
            "predict" => self.predict(),
            "status" => self.status(),
            "wait" => self.wait(),
            "dismiss" => {
                self.controller.dismiss_notice();
                self.pedigree.dismiss_notice();
                Vec::new()
            }

            other => vec![format!("error: unknown command '{other}' (try :help)")],
        };
        (out, false)
    }

    fn calculate_bmi(&mut self) -> Vec<String> {
        if self.bmi.calculate().is_none() {
            let mut out = vec!["enter both weight and height first".to_string()];
            out.extend(self.bmi.display());
            return out;
        }
        self.bmi.display().into_iter().collect()
    }

    fn render_relatives(&self) -> Vec<String> {
        let mut out: Vec<String> = self
            .pedigree
            .labels()
            .zip(self.pedigree.relatives())
            .map(|(label, relative)| format!("{label}: {}", relative.age_of_onset))
            .collect();
        if out.is_empty() {
            out.push("(no relatives)".to_string());
        }
        out.extend(visible(self.pedigree.notice()));
        out
    }

    fn update_relative(&mut self, rest: &str) -> Vec<String> {
        let (position, value) = match rest.split_once(char::is_whitespace) {
            Some((position, value)) => (position, value.trim()),
            None => (rest, ""),
        };
        let index = match parse_position(position) {
            Ok(index) => index,
            Err(message) => return vec![message],
        };
        match self.pedigree.update(index, value) {
            Ok(()) => Vec::new(),
            Err(e) => vec![out_of_range(e)],
        }
    }

    fn remove_relative(&mut self, rest: &str) -> Vec<String> {
        let index = match parse_position(rest) {
            Ok(index) => index,
            Err(message) => return vec![message],
        };
        match self.pedigree.remove(index) {
            Ok(_) => self.render_relatives(),
            Err(e) => vec![out_of_range(e)],
        }
    }

    fn set_field(&mut self, rest: &str) -> Vec<String> {
        let (name, value) = match rest.split_once(char::is_whitespace) {
            Some((name, value)) => (name, value.trim()),
            None => (rest, ""),
        };
        match name.parse::<Feature>() {
            Ok(feature) => {
                self.form.set(feature, value);
                Vec::new()
            }
            Err(e) => vec![format!("error: {e}")],
        }
    }

    fn predict(&mut self) -> Vec<String> {
        self.in_flight = self.controller.spawn_submit(&self.form, &self.runtime);
        self.status()
    }

    fn wait(&mut self) -> Vec<String> {
        if let Some(task) = self.in_flight.take() {
            if let Err(e) = self.runtime.block_on(task) {
                log::error!("prediction task failed: {e}");
            }
        }
        self.status()
    }

    fn status(&self) -> Vec<String> {
        let mut out = Vec::new();
        match self.controller.view() {
            ResultView::Hidden => {}
            view => out.push(view.to_string()),
        }
        out.extend(visible(self.controller.notice().as_ref()));
        out
    }
}

fn visible(notice: Option<&Notice>) -> Option<String> {
    let notice = notice.filter(|n| n.is_visible_at(Instant::now()))?;
    let prefix = match notice.severity() {
        Severity::Info => "notice",
        Severity::Error => "error",
    };
    Some(format!("{prefix}: {notice}"))
}

/// Reports a bad position the way the user typed it, counting from 1.
fn out_of_range(error: CalcError) -> String {
    match error {
        CalcError::IndexOutOfRange { index, len } => {
            format!("error: there is no relative {} (list has {len})", index + 1)
        }
        other => format!("error: {other}"),
    }
}

/// Parses a 1-based position typed by the user into an index.
fn parse_position(text: &str) -> Result<usize, String> {
    match text.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(format!("error: expected a relative number (1, 2, ...), got '{text}'")),
    }
}

#[cfg(test)]
mod tests {
    use std::future::Future;

    use medi_predict::{InputMode, Prediction, PredictError, PredictionPayload};
    use pretty_assertions::assert_eq;
    use tokio::runtime::Runtime;

    use super::*;

    /// Answers every request with the same outcome.
    struct Fixed(Result<Prediction, PredictError>);

    impl Predictor for Fixed {
        fn predict(
            &self,
            _payload: PredictionPayload,
        ) -> impl Future<Output = Result<Prediction, PredictError>> + Send {
            let outcome = self.0.clone();
            async move { outcome }
        }
    }

    fn session(
        outcome: Result<Prediction, PredictError>,
        runtime: &Runtime,
    ) -> ScreenSession<Fixed> {
        let controller = PredictionController::new(Fixed(outcome), InputMode::Permissive);
        ScreenSession::new(controller, PedigreeConfig::default(), runtime.handle().clone())
    }

    fn run(session: &mut ScreenSession<Fixed>, lines: &[&str]) -> Vec<String> {
        let mut out = Vec::new();
        for line in lines {
            out.extend(session.handle_line(line).0);
        }
        out
    }

    #[test]
    fn bmi_panel_commands() {
        let rt = Runtime::new().unwrap();
        let mut s = session(Ok(Prediction::new(0.0)), &rt);
        assert_eq!(run(&mut s, &["weight 70", "bmi"]), vec!["enter both weight and height first"]);
        assert_eq!(run(&mut s, &["height 175", "bmi"]), vec!["Your BMI is: 22.86"]);
        assert_eq!(
            run(&mut s, &["height", "bmi"]),
            vec!["enter both weight and height first", "Your BMI is: 22.86"]
        );
    }

    #[test]
    fn pedigree_panel_commands() {
        let rt = Runtime::new().unwrap();
        let mut s = session(Ok(Prediction::new(0.0)), &rt);
        run(&mut s, &["age 1 30", "add", "age 2 50", "add"]);
        assert_eq!(
            run(&mut s, &["score"]),
            vec!["Your Diabetes Pedigree Function Score is: 1.20"]
        );
        assert_eq!(
            run(&mut s, &["remove 1"]),
            vec![
                "Relative 1 Age of Onset: 50",
                "Relative 2 Age of Onset: ",
                "notice: Relative removed [UNDO]",
            ]
        );
        assert_eq!(run(&mut s, &["undo"]), vec!["restored as relative 3"]);
        assert_eq!(run(&mut s, &["undo"]), vec!["nothing to undo"]);
        assert_eq!(
            run(&mut s, &["remove 0", "remove 9"]),
            vec![
                "error: expected a relative number (1, 2, ...), got '0'",
                "error: there is no relative 9 (list has 3)",
            ]
        );
    }

    #[test]
    fn predict_then_wait_shows_label() {
        let rt = Runtime::new().unwrap();
        let mut s = session(Ok(Prediction::new(1.0)), &rt);
        run(&mut s, &["set Glucose 148", "set bmi 33.6"]);
        let out = run(&mut s, &["predict", "wait"]);
        assert_eq!(out.last().map(String::as_str), Some("Prediction Result: Diabetic"));
        assert_eq!(s.prompt(), "screen> ");
    }

    #[test]
    fn failed_prediction_shows_error_notice_until_dismissed() {
        let rt = Runtime::new().unwrap();
        let mut s = session(
            Err(PredictError::BadRequest("Glucose out of range".to_string())),
            &rt,
        );
        let out = run(&mut s, &["predict", "wait"]);
        assert_eq!(out.last().map(String::as_str), Some("error: Glucose out of range"));
        assert_eq!(run(&mut s, &["dismiss", "status"]), Vec::<String>::new());
    }

    #[test]
    fn unknown_input_is_reported() {
        let rt = Runtime::new().unwrap();
        let mut s = session(Ok(Prediction::new(0.0)), &rt);
        assert_eq!(
            run(&mut s, &["set Cholesterol 5", "launch"]),
            vec![
                "error: unknown field \"Cholesterol\"",
                "error: unknown command 'launch' (try :help)",
            ]
        );
        assert!(s.handle_line(":quit").1);
    }
}
