//! Run-target strings of the form `module` or `module/configuration`.

use crate::error::Error;

/// A parsed run target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunTarget {
    pub module: String,
    pub configuration: Option<String>,
}

impl RunTarget {
    /// Parse and validate a user-supplied target string.
    ///
    /// Targets must be non-empty, contain only alphanumeric characters,
    /// `_` and `/`, and must not end with `/`. The first `/` separates
    /// the module name from the configuration name.
    pub fn parse(target: &str) -> Result<RunTarget, Error> {
        if target.is_empty() {
            return Err(Error::InvalidTarget {
                target: target.to_string(),
                reason: "target is empty",
            });
        }
        if !target
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '/')
        {
            return Err(Error::InvalidTarget {
                target: target.to_string(),
                reason: "targets may only contain alphanumeric characters, '_' and '/'",
            });
        }
        if target.ends_with('/') {
            return Err(Error::InvalidTarget {
                target: target.to_string(),
                reason: "trailing '/'",
            });
        }

        match target.split_once('/') {
            Some((module, configuration)) => Ok(RunTarget {
                module: module.to_string(),
                configuration: Some(configuration.to_string()),
            }),
            None => Ok(RunTarget {
                module: target.to_string(),
                configuration: None,
            }),
        }
    }
}
