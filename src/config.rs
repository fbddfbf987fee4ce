//! Negotiation configuration
//!
//! Options resolve once, at middleware construction. A process-wide default
//! exists for deployments that configure negotiation globally before traffic
//! starts; it is held as an immutable snapshot behind a lock and swapped as
//! a whole value, so readers always observe a consistent configuration and
//! never a partial update. Middlewares built before a swap keep the options
//! they were constructed with.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, OnceLock, RwLock};
use tracing::debug;

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for the negotiation step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NegotiationConfig {
    /// Reject requests with 406 when no declared pair is acceptable,
    /// instead of silently answering with the server default
    #[serde(default)]
    pub strict_mode: bool,
}

impl NegotiationConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for configuration.
    pub fn builder() -> NegotiationConfigBuilder {
        NegotiationConfigBuilder::new()
    }
}

/// Builder for [`NegotiationConfig`].
#[derive(Debug, Clone, Default)]
pub struct NegotiationConfigBuilder {
    config: NegotiationConfig,
}

impl NegotiationConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: NegotiationConfig::default(),
        }
    }

    /// Set strict mode.
    pub fn strict_mode(mut self, strict: bool) -> Self {
        self.config.strict_mode = strict;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> NegotiationConfig {
        self.config
    }
}

// ============================================================================
// Process-wide default
// ============================================================================

static DEFAULTS: OnceLock<RwLock<Arc<NegotiationConfig>>> = OnceLock::new();

fn defaults_cell() -> &'static RwLock<Arc<NegotiationConfig>> {
    DEFAULTS.get_or_init(|| RwLock::new(Arc::new(NegotiationConfig::default())))
}

/// The current process-wide default configuration snapshot.
pub fn default_config() -> Arc<NegotiationConfig> {
    defaults_cell().read().unwrap().clone()
}

/// Replace the process-wide default configuration.
///
/// The swap is whole-value: negotiation steps constructed afterwards see the
/// new configuration, steps already constructed keep their frozen options.
pub fn set_default_config(config: NegotiationConfig) {
    debug!(?config, "replacing default negotiation configuration");
    *defaults_cell().write().unwrap() = Arc::new(config);
}

/// Set one key of the process-wide default configuration.
///
/// `strict_mode` is the only documented key and expects a boolean. The
/// key/value shape keeps the signature stable as keys are added.
///
/// # Example
///
/// ```
/// use serde_json::json;
///
/// mediate::set_default_option("strict_mode", json!(true)).unwrap();
/// assert!(mediate::default_config().strict_mode);
/// mediate::set_default_option("strict_mode", json!(false)).unwrap();
/// ```
pub fn set_default_option(key: &str, value: serde_json::Value) -> Result<(), crate::Error> {
    match key {
        "strict_mode" => {
            let strict = value.as_bool().ok_or_else(|| {
                crate::Error::Config(format!("option strict_mode expects a boolean, got {value}"))
            })?;
            let cell = defaults_cell();
            let mut guard = cell.write().unwrap();
            let mut next = (**guard).clone();
            next.strict_mode = strict;
            *guard = Arc::new(next);
            Ok(())
        }
        other => Err(crate::Error::UnknownOption(other.to_string())),
    }
}
