use std::fmt;

/// Scalar value of a single query parameter.
#[derive(Clone, Debug, PartialEq)]
pub enum QueryValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl QueryValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn integer(value: i64) -> Self {
        Self::Integer(value)
    }

    /// Empty text is treated like an absent value and never emitted.
    pub(crate) fn is_empty(&self) -> bool {
        matches!(self, Self::Text(value) if value.is_empty())
    }
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for QueryValue {
    fn from(value: i32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<u32> for QueryValue {
    fn from(value: u32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<f64> for QueryValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// Ordered query-parameter mapping.
///
/// Entries keep insertion order. An entry whose value is `None` or an empty
/// string is kept in the mapping but skipped when the target is built.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryParams(Vec<(String, Option<QueryValue>)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a parameter. Use `None::<QueryValue>` for an absent value.
    pub fn push<K, V>(&mut self, key: K, value: Option<V>)
    where
        K: Into<String>,
        V: Into<QueryValue>,
    {
        self.0.push((key.into(), value.map(Into::into)));
    }

    /// Builder form of [`QueryParams::push`] for a present value.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.push(key, Some(value));
        self
    }

    /// Builder form of [`QueryParams::push`] for an optional value.
    pub fn with_opt<V: Into<QueryValue>>(
        mut self,
        key: impl Into<String>,
        value: Option<V>,
    ) -> Self {
        self.push(key, value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the entries that will be emitted, in insertion order.
    pub fn present(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.0.iter().filter_map(|(key, value)| match value {
            Some(value) if !value.is_empty() => Some((key.as_str(), value)),
            _ => None,
        })
    }
}

impl<K, V> FromIterator<(K, Option<V>)> for QueryParams
where
    K: Into<String>,
    V: Into<QueryValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, Option<V>)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (key, value) in iter {
            params.push(key, value);
        }
        params
    }
}

impl From<()> for QueryParams {
    fn from(_: ()) -> Self {
        Self::default()
    }
}

impl<K: Into<String>, V: Into<QueryValue>, const N: usize> From<[(K, V); N]> for QueryParams {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs
            .into_iter()
            .map(|(key, value)| (key, Some(value)))
            .collect()
    }
}
