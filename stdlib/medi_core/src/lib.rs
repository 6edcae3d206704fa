//! Shared building blocks for the Medi screening panels.
//!
//! Nothing in here knows about BMI, relatives or predictions; the panel
//! crates (`medi_calc`, `medi_predict`) build on these pieces.

pub mod env;
pub mod notice;
pub mod number;

pub use notice::{Notice, Severity};
pub use number::{parse_float, to_fixed, to_number};
