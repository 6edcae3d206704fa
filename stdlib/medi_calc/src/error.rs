use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    #[error("no relative at position {index} (list has {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("unknown undo placement {0:?}, expected \"append\" or \"original\"")]
    UnknownPlacement(String),
}
