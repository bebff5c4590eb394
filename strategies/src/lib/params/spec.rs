use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::errors::ConfigurationError;
use crate::params::extractor::RequestContext;
use crate::params::tree::ParamValue;

/// Separator between segments of a nested specifier.
pub const PATH_SEPARATOR: char = ':';

/// Caller-supplied extraction function.
pub type ComputedParam = Arc<dyn Fn(&RequestContext<'_>) -> Option<ParamValue> + Send + Sync>;

/// Where to find one credential field in a request's parameters.
///
/// Specifiers are parsed once when a strategy is configured; `"user:password"`
/// becomes a two-segment path.
#[derive(Clone)]
pub enum ParamSpec {
    Literal(String),
    NestedPath(Vec<String>),
    Computed(ComputedParam),
}

impl ParamSpec {
    /// Parse a raw specifier.
    ///
    /// # Arguments
    /// * `raw` - Bare key (`login`) or colon separated path (`user:login`)
    ///
    /// # Errors
    /// * `MalformedSpecifier` - Empty specifier or empty path segment
    pub fn parse(raw: &str) -> Result<Self, ConfigurationError> {
        let segments: Vec<String> = raw.split(PATH_SEPARATOR).map(str::to_owned).collect();

        if segments.iter().any(String::is_empty) {
            return Err(ConfigurationError::MalformedSpecifier(raw.to_owned()));
        }

        match <[String; 1]>::try_from(segments) {
            Ok([key]) => Ok(ParamSpec::Literal(key)),
            Err(segments) => Ok(ParamSpec::NestedPath(segments)),
        }
    }

    /// Wrap a function computing the value from the request context.
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&RequestContext<'_>) -> Option<ParamValue> + Send + Sync + 'static,
    {
        ParamSpec::Computed(Arc::new(f))
    }
}

impl FromStr for ParamSpec {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ParamSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamSpec::Literal(key) => f.write_str(key),
            ParamSpec::NestedPath(segments) => f.write_str(&segments.join(":")),
            ParamSpec::Computed(_) => f.write_str("<computed>"),
        }
    }
}

impl fmt::Debug for ParamSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamSpec::Literal(key) => f.debug_tuple("Literal").field(key).finish(),
            ParamSpec::NestedPath(segments) => f.debug_tuple("NestedPath").field(segments).finish(),
            ParamSpec::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

impl PartialEq for ParamSpec {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ParamSpec::Literal(a), ParamSpec::Literal(b)) => a == b,
            (ParamSpec::NestedPath(a), ParamSpec::NestedPath(b)) => a == b,
            (ParamSpec::Computed(a), ParamSpec::Computed(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}
