use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;
use url::form_urlencoded;

use crate::errors::ParamTreeError;

/// Parsed request parameters: string keys mapping to scalars or nested trees.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Value")]
pub struct ParamTree(BTreeMap<String, ParamValue>);

/// A single parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Scalar(String),
    Nested(ParamTree),
}

impl ParamValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Scalar(value) => Some(value.as_str()),
            ParamValue::Nested(_) => None,
        }
    }

    pub fn as_tree(&self) -> Option<&ParamTree> {
        match self {
            ParamValue::Scalar(_) => None,
            ParamValue::Nested(tree) => Some(tree),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Scalar(value.to_owned())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Scalar(value)
    }
}

impl From<ParamTree> for ParamValue {
    fn from(tree: ParamTree) -> Self {
        ParamValue::Nested(tree)
    }
}

impl ParamTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<ParamValue>,
    ) -> Option<ParamValue> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Parse a form/query encoded string with bracketed nesting.
    ///
    /// `login=fred&user[address][city]=Springfield` yields a top-level
    /// `login` scalar and a `user` tree containing an `address` tree.
    /// Repeated keys keep the last value. A bare key without `=` carries no
    /// value and is left out; `key=` is an empty scalar.
    ///
    /// # Errors
    /// * `UnsupportedValue` - Array-style keys such as `ids[]`
    /// * `Conflict` - A key is used both as a scalar and as a tree
    pub fn from_query(query: &str) -> Result<Self, ParamTreeError> {
        let mut tree = ParamTree::new();

        let pairs = query
            .split('&')
            .filter(|pair| pair.contains('='))
            .flat_map(|pair| form_urlencoded::parse(pair.as_bytes()));

        for (key, value) in pairs {
            let segments = key_segments(&key);
            if segments.iter().any(String::is_empty) {
                return Err(ParamTreeError::UnsupportedValue(key.into_owned()));
            }
            tree.insert_path(&segments, ParamValue::Scalar(value.into_owned()))?;
        }

        Ok(tree)
    }

    fn insert_path(&mut self, segments: &[String], value: ParamValue) -> Result<(), ParamTreeError> {
        let Some((last, parents)) = segments.split_last() else {
            return Ok(());
        };

        let mut tree = self;
        for segment in parents {
            let entry = tree
                .0
                .entry(segment.clone())
                .or_insert_with(|| ParamValue::Nested(ParamTree::new()));
            tree = match entry {
                ParamValue::Nested(nested) => nested,
                ParamValue::Scalar(_) => return Err(ParamTreeError::Conflict(segments.join(":"))),
            };
        }

        if let Some(ParamValue::Nested(_)) = tree.0.get(last) {
            return Err(ParamTreeError::Conflict(segments.join(":")));
        }

        tree.0.insert(last.clone(), value);
        Ok(())
    }
}

impl<K, V> FromIterator<(K, V)> for ParamTree
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

impl TryFrom<Value> for ParamTree {
    type Error = ParamTreeError;

    /// Strings, numbers and booleans become scalars; nulls are treated as absent.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let Value::Object(object) = value else {
            return Err(ParamTreeError::NotAnObject);
        };

        let mut tree = ParamTree::new();
        for (key, value) in object {
            let value = match value {
                Value::Null => continue,
                Value::String(s) => ParamValue::Scalar(s),
                Value::Bool(b) => ParamValue::Scalar(b.to_string()),
                Value::Number(n) => ParamValue::Scalar(n.to_string()),
                nested @ Value::Object(_) => ParamValue::Nested(ParamTree::try_from(nested)?),
                Value::Array(_) => return Err(ParamTreeError::UnsupportedValue(key)),
            };
            tree.0.insert(key, value);
        }

        Ok(tree)
    }
}

/// Split `a[b][c]` into `["a", "b", "c"]`. Keys that are not well-formed
/// bracket paths are kept whole.
fn key_segments(key: &str) -> Vec<String> {
    let Some(open) = key.find('[') else {
        return vec![key.to_owned()];
    };

    let (head, mut rest) = key.split_at(open);
    let mut segments = vec![head.to_owned()];

    while !rest.is_empty() {
        let Some(inner) = rest.strip_prefix('[') else {
            return vec![key.to_owned()];
        };
        let Some(close) = inner.find(']') else {
            return vec![key.to_owned()];
        };
        segments.push(inner[..close].to_owned());
        rest = &inner[close + 1..];
    }

    segments
}
