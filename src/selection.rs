//! Column selections and their resolution into SQL.
//!
//! Every entry of a node's column list resolves to two things: an entry for
//! the derived table's select list, and a `"key", value` pair for the node's
//! `JSON_OBJECT` property list. A column pulled from a joined table
//! (`film_actor.actor_id` on a node over `actor`) is aliased
//! `<table>_<column>` inside the derived table so it cannot collide with a
//! same-named column of the node's own table.

use smallvec::SmallVec;

use crate::error::{QueryError, Result};

/// One entry in a node's column list.
///
/// Plain strings convert into [`ColumnSelection::Column`], so the common
/// case stays terse:
///
/// ```
/// use jsonquery::prelude::*;
///
/// let films = find_many("film", ["film_id", "title"], ())?;
/// assert!(films.compile().contains("\"title\", film.title"));
/// # Ok::<(), jsonquery::QueryError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSelection {
    /// A column reference whose JSON key is the column name itself.
    ///
    /// May be qualified as `table.column` to read from one of the node's
    /// joined tables; the key is then the column part alone.
    Column(String),

    /// A column reference emitted under an explicit JSON key.
    Keyed {
        /// The column, optionally qualified as `table.column`.
        column: String,
        /// The JSON object key the value appears under.
        json_key: String,
    },

    /// A raw SQL expression emitted under an explicit JSON key.
    ///
    /// The expression is spliced verbatim, wrapped in parentheses, and
    /// evaluates against the node's derived table. Any column it reads must
    /// either have its own selection entry or be listed in
    /// `referenced_columns`, which pulls it into the derived table without
    /// emitting a JSON key for it.
    Calculated {
        /// The SQL expression text.
        expression: String,
        /// The JSON object key the value appears under.
        json_key: String,
        /// Columns the expression reads, resolved like plain entries.
        referenced_columns: Vec<String>,
    },
}

impl ColumnSelection {
    /// Column reference emitted under an explicit JSON key.
    pub fn keyed(column: impl Into<String>, json_key: impl Into<String>) -> Self {
        Self::Keyed {
            column: column.into(),
            json_key: json_key.into(),
        }
    }

    /// Raw SQL expression emitted under an explicit JSON key, together with
    /// the columns it reads.
    pub fn calculated<I>(
        expression: impl Into<String>,
        json_key: impl Into<String>,
        referenced_columns: I,
    ) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self::Calculated {
            expression: expression.into(),
            json_key: json_key.into(),
            referenced_columns: referenced_columns.into_iter().map(Into::into).collect(),
        }
    }

    /// Rejects entries that match none of the accepted shapes.
    pub(crate) fn validate(&self) -> Result<()> {
        match self {
            Self::Column(column) => validate_column_ref(column),
            Self::Keyed { column, json_key } => {
                validate_column_ref(column)?;
                validate_json_key(json_key, column)
            }
            Self::Calculated {
                expression,
                json_key,
                referenced_columns,
            } => {
                if expression.is_empty() {
                    return Err(QueryError::MalformedSelection {
                        entry: json_key.clone(),
                        reason: "empty calculation expression",
                    });
                }
                validate_json_key(json_key, expression)?;
                for column in referenced_columns {
                    validate_column_ref(column)?;
                }
                Ok(())
            }
        }
    }

    /// Resolves this entry against the node's own table, appending select
    /// list entries and JSON properties to `out`.
    pub(crate) fn resolve_into(&self, table: &str, out: &mut ResolvedColumns) {
        match self {
            Self::Column(column) => {
                let resolved = resolve_ref(table, column);
                out.push_select(resolved.select_entry);
                out.push_prop(resolved.json_key, resolved.value_expr);
            }
            Self::Keyed { column, json_key } => {
                let resolved = resolve_ref(table, column);
                out.push_select(resolved.select_entry);
                out.push_prop(json_key.clone(), resolved.value_expr);
            }
            Self::Calculated {
                expression,
                json_key,
                referenced_columns,
            } => {
                for column in referenced_columns {
                    out.push_select(resolve_ref(table, column).select_entry);
                }
                out.push_prop(json_key.clone(), format!("({expression})"));
            }
        }
    }
}

impl From<&str> for ColumnSelection {
    fn from(column: &str) -> Self {
        Self::Column(column.to_owned())
    }
}

impl From<String> for ColumnSelection {
    fn from(column: String) -> Self {
        Self::Column(column)
    }
}

/// `(column, json_key)` pair.
impl From<(&str, &str)> for ColumnSelection {
    fn from((column, json_key): (&str, &str)) -> Self {
        Self::keyed(column, json_key)
    }
}

/// `(column, json_key)` pair.
impl From<(String, String)> for ColumnSelection {
    fn from((column, json_key): (String, String)) -> Self {
        Self::Keyed { column, json_key }
    }
}

/// A column reference resolved against a node's table.
struct ResolvedRef {
    select_entry: String,
    value_expr: String,
    json_key: String,
}

/// Resolution scheme: bare and self-qualified references select and read
/// `table.column`; references into another table of the node's FROM list are
/// selected as `other.column AS other_column` and read back through the
/// alias, keeping the derived table's column names unambiguous.
fn resolve_ref(table: &str, raw: &str) -> ResolvedRef {
    match raw.split_once('.') {
        Some((owner, column)) if owner != table => ResolvedRef {
            select_entry: format!("{owner}.{column} AS {owner}_{column}"),
            value_expr: format!("{owner}_{column}"),
            json_key: column.to_owned(),
        },
        Some((_, column)) => ResolvedRef {
            select_entry: format!("{table}.{column}"),
            value_expr: format!("{table}.{column}"),
            json_key: column.to_owned(),
        },
        None => ResolvedRef {
            select_entry: format!("{table}.{raw}"),
            value_expr: format!("{table}.{raw}"),
            json_key: raw.to_owned(),
        },
    }
}

fn validate_column_ref(raw: &str) -> Result<()> {
    let malformed = |reason: &'static str| QueryError::MalformedSelection {
        entry: raw.to_owned(),
        reason,
    };
    if raw.is_empty() {
        return Err(malformed("empty column reference"));
    }
    if raw.split('.').count() > 2 {
        return Err(malformed("at most one `.` qualifier is allowed"));
    }
    if raw.split('.').any(str::is_empty) {
        return Err(malformed("qualifier and column name must not be empty"));
    }
    Ok(())
}

fn validate_json_key(json_key: &str, entry: &str) -> Result<()> {
    if json_key.is_empty() {
        return Err(QueryError::MalformedSelection {
            entry: entry.to_owned(),
            reason: "empty JSON key",
        });
    }
    Ok(())
}

/// Accumulator for one node's resolved column list.
#[derive(Debug, Default)]
pub(crate) struct ResolvedColumns {
    /// Entries of the derived table's select list, in first-seen order.
    pub(crate) select_list: SmallVec<[String; 8]>,
    /// `(key, value)` pairs of the node's JSON object, in declaration order.
    pub(crate) json_props: SmallVec<[(String, String); 8]>,
}

impl ResolvedColumns {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Appends a select list entry unless an identical one is present.
    /// MySQL rejects duplicate column names in a derived table.
    pub(crate) fn push_select(&mut self, entry: String) {
        if !self.select_list.contains(&entry) {
            self.select_list.push(entry);
        }
    }

    pub(crate) fn push_prop(&mut self, key: String, value: String) {
        self.json_props.push((key, value));
    }
}
