// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Reflection configuration.
//!
//! - **Static**: path grammar tokens and accessor naming conventions.
//! - **Dynamic**: [`ReflectionConfig`] limits applied per publication.
//!
//! # Example
//!
//! ```rust
//! use smp_reflect::config::ReflectionConfig;
//!
//! let config = ReflectionConfig::default().with_max_path_depth(8);
//! assert!(config.validate().is_ok());
//! ```

use crate::error::{Error, Result};

// =======================================================================
// Path grammar
// =======================================================================

/// Separator between structure members (and between components).
pub const PATH_SEPARATOR: char = '.';

/// Opens an array index inside a field path segment.
pub const INDEX_OPEN: char = '[';

/// Closes an array index inside a field path segment.
pub const INDEX_CLOSE: char = ']';

// =======================================================================
// Property accessors
// =======================================================================

/// Prefix of the operation reading property `P` (`get_P`).
pub const GETTER_PREFIX: &str = "get_";

/// Prefix of the operation writing property `P` (`set_P`).
pub const SETTER_PREFIX: &str = "set_";

// =======================================================================
// Defaults
// =======================================================================

/// Default maximum number of segments in a field path.
pub const DEFAULT_MAX_PATH_DEPTH: usize = 32;

/// Default maximum nesting of registered types expanded by publication.
pub const DEFAULT_MAX_TYPE_NESTING: usize = 16;

/// Limits and checks applied by a [`Publication`](crate::Publication).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config-loaders", derive(serde::Deserialize))]
#[cfg_attr(feature = "config-loaders", serde(default, deny_unknown_fields))]
pub struct ReflectionConfig {
    /// Paths with more segments are rejected as invalid field names.
    pub max_path_depth: usize,
    /// Deeper type layouts are rejected as recursive.
    pub max_type_nesting: usize,
    /// Warn when a publication is dropped with live requests.
    pub leak_check: bool,
}

impl Default for ReflectionConfig {
    fn default() -> Self {
        Self {
            max_path_depth: DEFAULT_MAX_PATH_DEPTH,
            max_type_nesting: DEFAULT_MAX_TYPE_NESTING,
            leak_check: true,
        }
    }
}

impl ReflectionConfig {
    /// Set the path depth limit.
    #[must_use]
    pub fn with_max_path_depth(mut self, depth: usize) -> Self {
        self.max_path_depth = depth;
        self
    }

    /// Set the type nesting limit.
    #[must_use]
    pub fn with_max_type_nesting(mut self, depth: usize) -> Self {
        self.max_type_nesting = depth;
        self
    }

    /// Enable or disable the leaked-request warning.
    #[must_use]
    pub fn with_leak_check(mut self, enabled: bool) -> Self {
        self.leak_check = enabled;
        self
    }

    /// Reject limits that would make every path or type unusable.
    pub fn validate(&self) -> Result<()> {
        if self.max_path_depth == 0 {
            return Err(Error::Config("max_path_depth must be at least 1".into()));
        }
        if self.max_type_nesting == 0 {
            return Err(Error::Config("max_type_nesting must be at least 1".into()));
        }
        Ok(())
    }

    /// Load from YAML; missing keys keep their defaults.
    ///
    /// ```yaml
    /// max_path_depth: 12
    /// leak_check: false
    /// ```
    #[cfg(feature = "config-loaders")]
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let config: Self =
            serde_yaml::from_str(text).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ReflectionConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.leak_check);
    }

    #[test]
    fn test_zero_limits_rejected() {
        assert!(ReflectionConfig::default()
            .with_max_path_depth(0)
            .validate()
            .is_err());
        assert!(ReflectionConfig::default()
            .with_max_type_nesting(0)
            .validate()
            .is_err());
    }

    #[cfg(feature = "config-loaders")]
    #[test]
    fn test_yaml_partial() {
        let config = ReflectionConfig::from_yaml_str("max_path_depth: 4\nleak_check: false\n")
            .expect("yaml");
        assert_eq!(config.max_path_depth, 4);
        assert_eq!(config.max_type_nesting, DEFAULT_MAX_TYPE_NESTING);
        assert!(!config.leak_check);

        assert!(ReflectionConfig::from_yaml_str("max_path_depth: 0\n").is_err());
        assert!(ReflectionConfig::from_yaml_str("bogus: 1\n").is_err());
    }
}
