//! Schema generation options.

use tracing::warn;

/// Policy flags applied uniformly while converting descriptors.
///
/// In plugin mode these come from the `--jsonschema_opt` parameter string,
/// see [`Options::from_parameter`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    /// Every generated node additionally accepts `null`.
    pub allow_null_values: bool,
    /// Message objects forbid properties that are not listed.
    pub disallow_additional_properties: bool,
    /// 64-bit integer fields accept only numeric JSON, not strings.
    pub disallow_bigints_as_strings: bool,
    /// Raise log verbosity. Has no effect on the generated schemas.
    pub debug: bool,
}

impl Options {
    /// Create options with every flag unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Let every generated node accept `null`.
    pub fn allow_null_values(&mut self, enabled: bool) -> &mut Self {
        self.allow_null_values = enabled;
        self
    }

    /// Forbid properties not declared on a message.
    pub fn disallow_additional_properties(&mut self, enabled: bool) -> &mut Self {
        self.disallow_additional_properties = enabled;
        self
    }

    /// Accept only numbers for 64-bit integer fields.
    pub fn disallow_bigints_as_strings(&mut self, enabled: bool) -> &mut Self {
        self.disallow_bigints_as_strings = enabled;
        self
    }

    /// Raise log verbosity.
    pub fn debug(&mut self, enabled: bool) -> &mut Self {
        self.debug = enabled;
        self
    }

    /// Parse a comma separated list of `key` or `key=value` entries.
    ///
    /// Only the presence of a key matters. Unknown keys and entries with more
    /// than one `=` are logged and skipped.
    pub fn from_parameter(parameter: &str) -> Self {
        let mut options = Self::default();

        for param in parameter.split(',').filter(|p| !p.is_empty()) {
            if param.matches('=').count() > 1 {
                warn!("invalid parameter: {:?}", param);
                continue;
            }

            let key = param.split_once('=').map_or(param, |(key, _)| key);
            match key {
                "allow_null_values" => options.allow_null_values = true,
                "debug" => options.debug = true,
                "disallow_additional_properties" => options.disallow_additional_properties = true,
                "disallow_bigints_as_strings" => options.disallow_bigints_as_strings = true,
                _ => warn!("unknown parameter: {:?}", param),
            }
        }

        options
    }
}
