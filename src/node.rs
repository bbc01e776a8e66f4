//! The query tree model.
//!
//! A [`QueryNode`] describes one table's query together with its nested
//! relations. Trees are assembled through [`find_unique`] and [`find_many`],
//! validated on construction, and compiled to SQL with [`QueryNode::compile`].
//!
//! [`find_unique`]: crate::find_unique
//! [`find_many`]: crate::find_many

use crate::error::{QueryError, Result};
use crate::selection::ColumnSelection;
use crate::sql;
use crate::trace::trace_compile;

/// Whether a node expects exactly one row or an aggregated list of rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Exactly one result row, emitted as a single JSON object.
    Object,
    /// Zero or more result rows, aggregated into a JSON array.
    Array,
}

/// A table reference plus the optional JSON key its node appears under in
/// the parent object. The key defaults to the table name; overriding it is
/// how two relations on the same table coexist under one parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSelection {
    table: String,
    json_key: Option<String>,
}

impl TableSelection {
    /// Table keyed under its own name.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            json_key: None,
        }
    }

    /// Table keyed under an explicit JSON key.
    pub fn keyed(table: impl Into<String>, json_key: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            json_key: Some(json_key.into()),
        }
    }

    /// The underlying table name.
    pub fn name(&self) -> &str {
        &self.table
    }

    /// The key this node's value is emitted under in the parent object, and
    /// the alias of its lateral subquery: the override when present, the
    /// table name otherwise.
    pub fn json_key(&self) -> &str {
        self.json_key.as_deref().unwrap_or(&self.table)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.table.is_empty() {
            return Err(QueryError::EmptyTableName);
        }
        if self.json_key.as_deref() == Some("") {
            return Err(QueryError::EmptyFragment {
                what: "JSON key override",
                table: self.table.clone(),
            });
        }
        Ok(())
    }
}

impl From<&str> for TableSelection {
    fn from(table: &str) -> Self {
        Self::new(table)
    }
}

impl From<String> for TableSelection {
    fn from(table: String) -> Self {
        Self::new(table)
    }
}

/// `(table, json_key)` pair.
impl From<(&str, &str)> for TableSelection {
    fn from((table, json_key): (&str, &str)) -> Self {
        Self::keyed(table, json_key)
    }
}

/// `(table, json_key)` pair.
impl From<(String, String)> for TableSelection {
    fn from((table, json_key): (String, String)) -> Self {
        Self::keyed(table, json_key)
    }
}

/// Sort direction of an ORDER BY pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Ascending order.
    Asc,
    /// Descending order.
    Desc,
}

impl SortOrder {
    pub(crate) fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// One `column direction` ordering pair. Rows are ordered inside the derived
/// table, before aggregation, so the JSON array preserves the order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub(crate) column: String,
    pub(crate) order: SortOrder,
}

impl OrderBy {
    /// Ascending order on `column`.
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            order: SortOrder::Asc,
        }
    }

    /// Descending order on `column`.
    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            order: SortOrder::Desc,
        }
    }
}

/// One node of a query tree: a single table's query, object or array shaped,
/// plus the relation nodes nested beneath it.
///
/// Nodes are immutable once built and carry no connection state; the same
/// tree can be compiled and executed any number of times. Construction goes
/// through [`find_unique`] and [`find_many`], which validate the node and
/// its place among its siblings, so every reachable `QueryNode` compiles.
///
/// [`find_unique`]: crate::find_unique
/// [`find_many`]: crate::find_many
#[derive(Debug, Clone)]
pub struct QueryNode {
    pub(crate) kind: NodeKind,
    pub(crate) table: TableSelection,
    pub(crate) columns: Vec<ColumnSelection>,
    pub(crate) filter: Option<String>,
    pub(crate) join: Vec<String>,
    pub(crate) order_by: Vec<OrderBy>,
    pub(crate) limit: Option<u32>,
    pub(crate) offset: Option<u32>,
    pub(crate) children: Vec<QueryNode>,
}

impl QueryNode {
    /// Whether this node compiles to an object or an array query.
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// The table this node reads from.
    pub fn table_name(&self) -> &str {
        self.table.name()
    }

    /// The JSON key this node's value is emitted under in its parent.
    pub fn json_key(&self) -> &str {
        self.table.json_key()
    }

    /// The nested relation nodes, in declaration order.
    pub fn children(&self) -> &[QueryNode] {
        &self.children
    }

    /// Compiles the tree into one SQL statement.
    ///
    /// The statement returns a single row with a single column named `_json`
    /// holding the fully nested JSON value. Compilation is pure text
    /// generation: deterministic for a given tree, no connection involved.
    /// `?` placeholders inside filter fragments pass through verbatim, and
    /// their bind order is their order of appearance in the output; see
    /// [`count_placeholders`](crate::count_placeholders).
    ///
    /// ```
    /// use jsonquery::prelude::*;
    ///
    /// let films = find_many("film", ["film_id", "title"], ())?;
    /// assert_eq!(
    ///     films.compile(),
    ///     r#"SELECT COALESCE(JSON_ARRAYAGG(JSON_OBJECT("film_id", film.film_id, "title", film.title)), CAST('[]' AS JSON)) AS _json FROM (SELECT film.film_id, film.title FROM film) AS film"#,
    /// );
    /// # Ok::<(), jsonquery::QueryError>(())
    /// ```
    pub fn compile(&self) -> String {
        let mut out = String::with_capacity(256);
        sql::write_query(self, &mut out);
        trace_compile!(self.table.name(), &out);
        out
    }

    /// Validates this node and the alias uniqueness of its children.
    /// Children are themselves validated when they are built, so the check
    /// does not recurse.
    pub(crate) fn validate(&self) -> Result<()> {
        self.table.validate()?;
        for selection in &self.columns {
            selection.validate()?;
        }
        match self.kind {
            // A missing filter would make the subquery return one row per
            // table row and trip MySQL's scalar subquery cardinality error
            // at execution time; reject it here instead.
            NodeKind::Object => {
                if self.filter.as_deref().is_none_or(str::is_empty) {
                    return Err(QueryError::MissingFilter {
                        table: self.table.name().to_owned(),
                    });
                }
            }
            NodeKind::Array => {
                if self.filter.as_deref() == Some("") {
                    return Err(QueryError::EmptyFragment {
                        what: "filter fragment",
                        table: self.table.name().to_owned(),
                    });
                }
            }
        }
        for join in &self.join {
            if join.is_empty() {
                return Err(QueryError::EmptyFragment {
                    what: "join table name",
                    table: self.table.name().to_owned(),
                });
            }
        }
        for pair in &self.order_by {
            if pair.column.is_empty() {
                return Err(QueryError::EmptyFragment {
                    what: "order column",
                    table: self.table.name().to_owned(),
                });
            }
        }
        for (i, child) in self.children.iter().enumerate() {
            let alias = child.table.json_key();
            if self.children[..i]
                .iter()
                .any(|sibling| sibling.table.json_key() == alias)
            {
                return Err(QueryError::DuplicateChildAlias {
                    table: self.table.name().to_owned(),
                    alias: alias.to_owned(),
                });
            }
        }
        Ok(())
    }
}
