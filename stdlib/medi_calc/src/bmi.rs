//! Body mass index converter.
//!
//! Inputs are kept as the text the user typed. Plausibility is not
//! checked: a zero height gives `Infinity`, non-numeric text gives `NaN`,
//! and both are shown as-is.

use std::fmt;

use medi_core::{to_fixed, to_number};

/// `weight / (height/100)^2`, unrounded. [`Bmi`] rounds for display.
pub fn body_mass_index(weight_kg: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    weight_kg / (height_m * height_m)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bmi(f64);

impl Bmi {
    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Bmi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&to_fixed(self.0, 2))
    }
}

#[derive(Debug, Clone, Default)]
pub struct BmiConverter {
    weight: String,
    height: String,
    result: Option<Bmi>,
}

impl BmiConverter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Weight in kilograms, as typed.
    pub fn set_weight(&mut self, text: impl Into<String>) {
        self.weight = text.into();
    }

    /// Height in centimetres, as typed.
    pub fn set_height(&mut self, text: impl Into<String>) {
        self.height = text.into();
    }

    pub fn weight(&self) -> &str {
        &self.weight
    }

    pub fn height(&self) -> &str {
        &self.height
    }

    /// Computes and stores a new result when both fields are filled in.
    ///
    /// Returns `None` and keeps the previous result otherwise.
    pub fn calculate(&mut self) -> Option<Bmi> {
        if self.weight.is_empty() || self.height.is_empty() {
            log::debug!("bmi: skipped, weight or height is empty");
            return None;
        }
        let bmi = Bmi(body_mass_index(
            to_number(&self.weight),
            to_number(&self.height),
        ));
        log::debug!("bmi: {} kg / {} cm -> {bmi}", self.weight, self.height);
        self.result = Some(bmi);
        Some(bmi)
    }

    pub fn result(&self) -> Option<Bmi> {
        self.result
    }

    pub fn display(&self) -> Option<String> {
        self.result.map(|bmi| format!("Your BMI is: {bmi}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn computes_rounded_bmi() {
        let mut panel = BmiConverter::new();
        panel.set_weight("70");
        panel.set_height("175");
        let bmi = panel.calculate().expect("both fields set");
        assert!((bmi.value() - 22.857142857142858).abs() < 1e-12);
        assert_eq!(panel.display().as_deref(), Some("Your BMI is: 22.86"));
    }

    #[test]
    fn display_rounds_the_stored_value_not_the_written_one() {
        // 40.9 / 2^2 is stored just below 10.225
        let mut panel = BmiConverter::new();
        panel.set_weight("40.9");
        panel.set_height("200");
        panel.calculate();
        assert_eq!(panel.display().as_deref(), Some("Your BMI is: 10.22"));
    }

    #[test]
    fn negative_zero_weight_shows_unsigned_zero() {
        let mut panel = BmiConverter::new();
        panel.set_weight("-0");
        panel.set_height("170");
        assert_eq!(
            panel.calculate().map(|b| b.to_string()).as_deref(),
            Some("0.00")
        );
    }

    #[test]
    fn nothing_is_shown_before_the_trigger() {
        let mut panel = BmiConverter::new();
        panel.set_weight("70");
        panel.set_height("175");
        assert_eq!(panel.result(), None);
        assert_eq!(panel.display(), None);
    }

    #[test]
    fn missing_input_keeps_the_stale_result() {
        let mut panel = BmiConverter::new();
        panel.set_weight("80");
        panel.set_height("200");
        panel.calculate();
        panel.set_height("");
        assert_eq!(panel.calculate(), None);
        assert_eq!(panel.display().as_deref(), Some("Your BMI is: 20.00"));
    }

    #[test]
    fn editing_inputs_does_not_clear_result() {
        let mut panel = BmiConverter::new();
        panel.set_weight("80");
        panel.set_height("200");
        panel.calculate();
        panel.set_weight("95");
        assert_eq!(panel.result().map(Bmi::value), Some(20.0));
    }

    #[test]
    fn degenerate_heights_are_not_guarded() {
        let mut panel = BmiConverter::new();
        panel.set_weight("70");
        panel.set_height("0");
        assert_eq!(panel.calculate().map(|b| b.to_string()).as_deref(), Some("Infinity"));

        panel.set_height("-100");
        assert_eq!(panel.calculate().map(Bmi::value), Some(70.0));

        panel.set_height("tall");
        assert_eq!(panel.display().as_deref(), Some("Your BMI is: 70.00"));
        assert_eq!(panel.calculate().map(|b| b.to_string()).as_deref(), Some("NaN"));
    }

    proptest! {
        #[test]
        fn matches_formula_for_positive_inputs(w in 1.0f64..400.0, h in 30.0f64..260.0) {
            let hm = h / 100.0;
            let expected = w / (hm * hm);
            let mut panel = BmiConverter::new();
            panel.set_weight(w.to_string());
            panel.set_height(h.to_string());
            let got = panel.calculate().map(Bmi::value);
            prop_assert!(got.is_some());
            prop_assert!((got.unwrap_or(f64::NAN) - expected).abs() < 1e-9);
            prop_assert_eq!(
                panel.display(),
                Some(format!("Your BMI is: {}", to_fixed(expected, 2)))
            );
        }
    }
}
