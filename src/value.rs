use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::collections::btree_map;

/// A value produced while compiling an expression.
///
/// Every intermediate result is one of three shapes: a single scalar, a query
/// document, or an ordered list (the operands of `$or`, `$and`, `$in`, `$nin`
/// and `$all`).
///
/// # Examples
///
/// ```
/// use mongoq::{Document, QueryValue, Scalar};
///
/// let name = QueryValue::from("Alice");
/// assert_eq!(name, QueryValue::Scalar(Scalar::String("Alice".to_string())));
///
/// let mut doc = Document::new();
/// doc.insert("name", name);
/// assert!(doc.contains_key("name"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Scalar(Scalar),
    Document(Document),
    List(Vec<QueryValue>),
}

/// Leaf values of a query document.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    DateTime(DateTime<Utc>),
    ObjectId(ObjectId),
    Pattern(Pattern),
}

/// Case-insensitive regular-expression match request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    pub pattern: String,
    pub options: String,
}

impl Pattern {
    pub fn case_insensitive(pattern: impl Into<String>) -> Self {
        Pattern {
            pattern: pattern.into(),
            options: "i".to_string(),
        }
    }
}

/// Mapping from field paths or `$` operators to values.
///
/// Keys are kept sorted so that rendering is deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document(BTreeMap<String, QueryValue>);

impl Document {
    pub fn new() -> Self {
        Document(BTreeMap::new())
    }

    /// Document with exactly one entry.
    pub fn with(key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        let mut doc = Document::new();
        doc.insert(key, value);
        doc
    }

    /// Insert an entry, returning the value previously stored under `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Option<QueryValue> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<QueryValue> {
        self.0.remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, QueryValue> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when no key of `other` is present in `self`.
    pub fn is_disjoint(&self, other: &Document) -> bool {
        other.keys().all(|key| !self.contains_key(key))
    }

    /// The value under `key` when it is the document's only entry.
    pub fn single(&self, key: &str) -> Option<&QueryValue> {
        if self.len() == 1 { self.get(key) } else { None }
    }
}

impl IntoIterator for Document {
    type Item = (String, QueryValue);
    type IntoIter = btree_map::IntoIter<String, QueryValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = (&'a String, &'a QueryValue);
    type IntoIter = btree_map::Iter<'a, String, QueryValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Extend<(String, QueryValue)> for Document {
    fn extend<I: IntoIterator<Item = (String, QueryValue)>>(&mut self, iter: I) {
        self.0.extend(iter)
    }
}

impl QueryValue {
    pub fn as_document(&self) -> Option<&Document> {
        match self {
            QueryValue::Document(doc) => Some(doc),
            _ => None,
        }
    }

    /// Ordering comparisons accept numbers and timestamps only.
    pub fn is_orderable(&self) -> bool {
        matches!(
            self,
            QueryValue::Scalar(Scalar::Integer(_) | Scalar::Float(_) | Scalar::DateTime(_))
        )
    }

    /// Short description used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            QueryValue::Scalar(Scalar::String(_)) => "string",
            QueryValue::Scalar(Scalar::Integer(_)) => "integer",
            QueryValue::Scalar(Scalar::Float(_)) => "float",
            QueryValue::Scalar(Scalar::Boolean(_)) => "boolean",
            QueryValue::Scalar(Scalar::DateTime(_)) => "timestamp",
            QueryValue::Scalar(Scalar::ObjectId(_)) => "object id",
            QueryValue::Scalar(Scalar::Pattern(_)) => "pattern",
            QueryValue::Document(_) => "document",
            QueryValue::List(_) => "list",
        }
    }
}

impl From<Scalar> for QueryValue {
    fn from(scalar: Scalar) -> Self {
        QueryValue::Scalar(scalar)
    }
}

impl From<Document> for QueryValue {
    fn from(doc: Document) -> Self {
        QueryValue::Document(doc)
    }
}

impl From<Vec<QueryValue>> for QueryValue {
    fn from(list: Vec<QueryValue>) -> Self {
        QueryValue::List(list)
    }
}

impl From<&str> for QueryValue {
    fn from(s: &str) -> Self {
        QueryValue::Scalar(Scalar::String(s.to_string()))
    }
}

impl From<String> for QueryValue {
    fn from(s: String) -> Self {
        QueryValue::Scalar(Scalar::String(s))
    }
}

impl From<i64> for QueryValue {
    fn from(n: i64) -> Self {
        QueryValue::Scalar(Scalar::Integer(n))
    }
}

impl From<f64> for QueryValue {
    fn from(n: f64) -> Self {
        QueryValue::Scalar(Scalar::Float(n))
    }
}

impl From<bool> for QueryValue {
    fn from(b: bool) -> Self {
        QueryValue::Scalar(Scalar::Boolean(b))
    }
}

impl From<ObjectId> for QueryValue {
    fn from(oid: ObjectId) -> Self {
        QueryValue::Scalar(Scalar::ObjectId(oid))
    }
}

impl From<DateTime<Utc>> for QueryValue {
    fn from(ts: DateTime<Utc>) -> Self {
        QueryValue::Scalar(Scalar::DateTime(ts))
    }
}

impl From<Pattern> for QueryValue {
    fn from(pattern: Pattern) -> Self {
        QueryValue::Scalar(Scalar::Pattern(pattern))
    }
}
