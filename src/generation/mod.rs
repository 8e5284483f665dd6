pub mod adapter;
pub mod params;

pub use adapter::{EchoAdapter, InferenceAdapter, ScriptedAdapter};
pub use params::{GenerationParams, DEFAULT_MAX_LEN, DEFAULT_TEMPERATURE, DEFAULT_TOP_P};
