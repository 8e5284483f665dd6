pub mod error;
pub mod turn;

pub use error::ChatError;
pub use turn::{Speaker, Turn, TurnSliceExt};
