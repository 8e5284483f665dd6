use crate::core::ChatError;

/// Default maximum reply length, in characters of generated text.
pub const DEFAULT_MAX_LEN: usize = 256;
/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
/// Default nucleus-sampling cutoff.
pub const DEFAULT_TOP_P: f64 = 0.95;

/// Generation parameters handed to the inference adapter.
///
/// Values are only replaced through [`GenerationParams::update_from_strs`],
/// which validates all three fields together: invalid input leaves the
/// current configuration untouched.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GenerationParams {
    /// Upper bound on the reply length. Must be at least 1.
    pub max_len: usize,
    /// Sampling temperature. Must be finite and greater than 0.
    pub temperature: f64,
    /// Nucleus-sampling cutoff. Must lie in `(0, 1]`.
    pub top_p: f64,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_len: DEFAULT_MAX_LEN,
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
        }
    }
}

impl GenerationParams {
    /// Build a parameter set, rejecting out-of-range values.
    pub fn new(max_len: usize, temperature: f64, top_p: f64) -> Result<Self, ChatError> {
        let params = Self {
            max_len,
            temperature,
            top_p,
        };
        params.validate()?;
        Ok(params)
    }

    /// Check every field against its accepted range.
    pub fn validate(&self) -> Result<(), ChatError> {
        if self.max_len == 0 {
            return Err(ChatError::InvalidSettings(
                "max length must be at least 1".to_string(),
            ));
        }
        if !self.temperature.is_finite() || self.temperature <= 0.0 {
            return Err(ChatError::InvalidSettings(
                "temperature must be greater than 0".to_string(),
            ));
        }
        if !self.top_p.is_finite() || self.top_p <= 0.0 || self.top_p > 1.0 {
            return Err(ChatError::InvalidSettings(
                "top p must be in (0, 1]".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse and apply all three settings fields at once.
    ///
    /// All-or-nothing: if any field fails to parse or validate, the call
    /// fails with [`ChatError::InvalidSettings`] and the current values stay
    /// in place.
    pub fn update_from_strs(
        &mut self,
        max_len: &str,
        temperature: &str,
        top_p: &str,
    ) -> Result<(), ChatError> {
        let max_len = max_len.trim().parse::<usize>().map_err(|_| {
            ChatError::InvalidSettings(format!("max length is not a positive integer: {max_len:?}"))
        })?;
        let temperature = temperature.trim().parse::<f64>().map_err(|_| {
            ChatError::InvalidSettings(format!("temperature is not a number: {temperature:?}"))
        })?;
        let top_p = top_p.trim().parse::<f64>().map_err(|_| {
            ChatError::InvalidSettings(format!("top p is not a number: {top_p:?}"))
        })?;

        let candidate = Self {
            max_len,
            temperature,
            top_p,
        };
        candidate.validate()?;

        tracing::debug!(max_len, temperature, top_p, "generation settings updated");
        *self = candidate;
        Ok(())
    }
}
