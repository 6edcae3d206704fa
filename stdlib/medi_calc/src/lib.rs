//! Calculator panels that sit beside the prediction form.
//!
//! - [`bmi`]: weight/height to body mass index.
//! - [`pedigree`]: an editable list of relatives' ages of onset with
//!   single-step undo and a placeholder pedigree score.
//!
//! Both panels only recompute on an explicit trigger; a displayed result
//! stays as it was while the inputs are edited.

pub mod bmi;
pub mod error;
pub mod pedigree;

pub use bmi::{body_mass_index, Bmi, BmiConverter};
pub use error::CalcError;
pub use pedigree::{
    pedigree_score, PedigreeCalculator, PedigreeConfig, PedigreeScore, Relative, RemovedRelative,
    UndoPlacement,
};
