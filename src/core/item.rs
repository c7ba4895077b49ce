use std::fmt;

use serde::de::DeserializeOwned;
use uuid::Uuid;

/// A record as read from the source file: a JSON object with optional keys.
pub type RawRecord = serde_json::Value;

/// A single bind parameter of a table row.
///
/// Rows are expressed with this neutral value type so the same mapping can be
/// bound by every database provider (PostgreSQL in production, SQLite in tests).
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Uuid(Uuid),
    Text(String),
    /// Text column that becomes SQL `NULL` when absent.
    OptionalText(Option<String>),
    Integer(i64),
    Decimal(f64),
    /// Collection of identifiers (`text[]` on PostgreSQL).
    List(LotList),
}

/// An ordered collection of lot identifiers, stored in list-valued columns
/// such as `affected_lots` and `consumed_in_lots`.
///
/// Its `Display` form is the PostgreSQL array literal: `{}`, `{X1}`, `{X1,X2}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LotList(Vec<String>);

impl LotList {
    pub fn new(items: Vec<String>) -> Self {
        Self(items)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.0.clone()
    }
}

impl From<Vec<String>> for LotList {
    fn from(items: Vec<String>) -> Self {
        Self(items)
    }
}

fn needs_quotes(item: &str) -> bool {
    item.is_empty()
        || item.eq_ignore_ascii_case("null")
        || item
            .chars()
            .any(|c| matches!(c, ',' | '{' | '}' | '"' | '\\') || c.is_whitespace())
}

impl fmt::Display for LotList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (index, item) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str(",")?;
            }
            if needs_quotes(item) {
                f.write_str("\"")?;
                for c in item.chars() {
                    if c == '"' || c == '\\' {
                        f.write_str("\\")?;
                    }
                    write!(f, "{c}")?;
                }
                f.write_str("\"")?;
            } else {
                f.write_str(item)?;
            }
        }
        f.write_str("}")
    }
}

/// A destination table and the strongly-typed row written to it.
///
/// Implementors deserialize from a [`RawRecord`] with schema defaults for every
/// missing or `null` field (see [`crate::record::fields`]), so mapping a raw
/// record never depends on which keys happen to be present.
pub trait TableRow: DeserializeOwned + Send + Sync + 'static {
    /// Destination table name.
    const TABLE: &'static str;

    /// All inserted columns, `id` first, in bind order.
    const COLUMNS: &'static [&'static str];

    /// Business key backing the insert-or-ignore rule, if the table has one.
    const CONFLICT_KEY: Option<&'static str> = None;

    /// Human-readable name used in banners and logs.
    const LABEL: &'static str;

    /// Domain column values in `COLUMNS` order, without the generated id.
    fn values(&self) -> Vec<SqlValue>;

    /// Maps a raw record to this row type.
    fn from_record(record: &RawRecord) -> Result<Self, serde_json::Error> {
        Self::deserialize(record)
    }

    /// The full bind tuple for this row: the generated id followed by the domain values.
    fn bind_tuple(&self, id: Uuid) -> Vec<SqlValue> {
        let mut tuple = Vec::with_capacity(Self::COLUMNS.len());
        tuple.push(SqlValue::Uuid(id));
        tuple.extend(self.values());
        debug_assert_eq!(tuple.len(), Self::COLUMNS.len());
        tuple
    }
}
