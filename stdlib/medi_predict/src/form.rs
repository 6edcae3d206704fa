//! The eight-field prediction form and the payload built from it.

use std::fmt;
use std::str::FromStr;

use medi_core::parse_float;
use serde::Serialize;

use crate::error::PredictError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    Pregnancies,
    Glucose,
    BloodPressure,
    SkinThickness,
    Insulin,
    Bmi,
    DiabetesPedigreeFunction,
    Age,
}

impl Feature {
    /// Form order, which is also the order on the wire.
    pub const ALL: [Feature; 8] = [
        Feature::Pregnancies,
        Feature::Glucose,
        Feature::BloodPressure,
        Feature::SkinThickness,
        Feature::Insulin,
        Feature::Bmi,
        Feature::DiabetesPedigreeFunction,
        Feature::Age,
    ];

    /// Field name as sent to the service and shown as the input label.
    pub fn name(self) -> &'static str {
        match self {
            Feature::Pregnancies => "Pregnancies",
            Feature::Glucose => "Glucose",
            Feature::BloodPressure => "BloodPressure",
            Feature::SkinThickness => "SkinThickness",
            Feature::Insulin => "Insulin",
            Feature::Bmi => "BMI",
            Feature::DiabetesPedigreeFunction => "DiabetesPedigreeFunction",
            Feature::Age => "Age",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Feature {
    type Err = PredictError;

    /// Accepts the wire name in any letter case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Feature::ALL
            .into_iter()
            .find(|feature| feature.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| PredictError::UnknownFeature(s.to_string()))
    }
}

/// How field text becomes numbers when a request is built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputMode {
    /// `parseFloat` semantics; unreadable text is sent as NaN (`null`).
    #[default]
    Permissive,
    /// The whole field must be a finite number, otherwise nothing is sent.
    Strict,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PredictionForm {
    values: [String; 8],
}

impl PredictionForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, feature: Feature, text: impl Into<String>) {
        self.values[feature.index()] = text.into();
    }

    pub fn get(&self, feature: Feature) -> &str {
        &self.values[feature.index()]
    }

    /// `(label, text)` pairs in form order.
    pub fn fields(&self) -> impl Iterator<Item = (Feature, &str)> + '_ {
        Feature::ALL
            .into_iter()
            .map(move |feature| (feature, self.get(feature)))
    }

    pub fn payload(&self, mode: InputMode) -> Result<PredictionPayload, PredictError> {
        let mut values = [0.0; 8];
        for (feature, text) in self.fields() {
            values[feature.index()] = match mode {
                InputMode::Permissive => {
                    let value = parse_float(text);
                    if value.is_nan() {
                        log::debug!("form: {feature} = {text:?} is not a number, sending NaN");
                    }
                    value
                }
                InputMode::Strict => parse_strict(feature, text)?,
            };
        }
        Ok(PredictionPayload::from_values(values))
    }
}

fn parse_strict(feature: Feature, text: &str) -> Result<f64, PredictError> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| PredictError::InvalidInput {
            feature,
            text: text.to_string(),
        })
}

/// Request body for `POST /predict`. Non-finite values serialize as `null`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PredictionPayload {
    pub pregnancies: f64,
    pub glucose: f64,
    pub blood_pressure: f64,
    pub skin_thickness: f64,
    pub insulin: f64,
    #[serde(rename = "BMI")]
    pub bmi: f64,
    pub diabetes_pedigree_function: f64,
    pub age: f64,
}

impl PredictionPayload {
    fn from_values(values: [f64; 8]) -> Self {
        let [
            pregnancies,
            glucose,
            blood_pressure,
            skin_thickness,
            insulin,
            bmi,
            diabetes_pedigree_function,
            age,
        ] = values;
        Self {
            pregnancies,
            glucose,
            blood_pressure,
            skin_thickness,
            insulin,
            bmi,
            diabetes_pedigree_function,
            age,
        }
    }

    pub fn get(&self, feature: Feature) -> f64 {
        match feature {
            Feature::Pregnancies => self.pregnancies,
            Feature::Glucose => self.glucose,
            Feature::BloodPressure => self.blood_pressure,
            Feature::SkinThickness => self.skin_thickness,
            Feature::Insulin => self.insulin,
            Feature::Bmi => self.bmi,
            Feature::DiabetesPedigreeFunction => self.diabetes_pedigree_function,
            Feature::Age => self.age,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn filled_form() -> PredictionForm {
        let mut form = PredictionForm::new();
        for (feature, text) in Feature::ALL.into_iter().zip([
            "6", "148", "72", "35", "0", "33.6", "0.627", "50",
        ]) {
            form.set(feature, text);
        }
        form
    }

    #[test]
    fn feature_names_round_trip() {
        for feature in Feature::ALL {
            assert_eq!(feature.name().parse::<Feature>(), Ok(feature));
        }
        assert_eq!("bmi".parse::<Feature>(), Ok(Feature::Bmi));
        assert!("Cholesterol".parse::<Feature>().is_err());
    }

    #[test]
    fn payload_serializes_in_form_order() {
        let payload = filled_form().payload(InputMode::Permissive).unwrap();
        let json = serde_json::to_string(&payload).unwrap();
        assert_eq!(
            json,
            r#"{"Pregnancies":6.0,"Glucose":148.0,"BloodPressure":72.0,"SkinThickness":35.0,"Insulin":0.0,"BMI":33.6,"DiabetesPedigreeFunction":0.627,"Age":50.0}"#
        );
    }

    #[test]
    fn permissive_mode_sends_nan_as_null() {
        let mut form = filled_form();
        form.set(Feature::Glucose, "");
        form.set(Feature::Insulin, "n/a");
        form.set(Feature::Age, "50 years");
        let payload = form.payload(InputMode::Permissive).unwrap();
        assert!(payload.get(Feature::Glucose).is_nan());
        assert!(payload.insulin.is_nan());
        assert_eq!(payload.age, 50.0);

        let json: serde_json::Value = serde_json::to_value(payload).unwrap();
        assert_eq!(json["Glucose"], serde_json::Value::Null);
        assert_eq!(json["Insulin"], serde_json::Value::Null);
    }

    #[test]
    fn strict_mode_rejects_partial_numbers() {
        let mut form = filled_form();
        form.set(Feature::Age, "50 years");
        assert_eq!(
            form.payload(InputMode::Strict),
            Err(PredictError::InvalidInput {
                feature: Feature::Age,
                text: "50 years".to_string(),
            })
        );

        form.set(Feature::Age, " 50 ");
        assert_eq!(form.payload(InputMode::Strict).map(|p| p.age), Ok(50.0));

        form.set(Feature::Glucose, "inf");
        assert!(form.payload(InputMode::Strict).is_err());
    }

    #[test]
    fn fields_list_labels_in_order() {
        let labels: Vec<&str> = PredictionForm::new()
            .fields()
            .map(|(feature, _)| feature.name())
            .collect();
        assert_eq!(
            labels,
            vec![
                "Pregnancies",
                "Glucose",
                "BloodPressure",
                "SkinThickness",
                "Insulin",
                "BMI",
                "DiabetesPedigreeFunction",
                "Age",
            ]
        );
    }
}
