use thiserror::Error;

/// Errors reported while assembling a query tree.
///
/// All validation happens at construction time, through [`find_unique`] and
/// [`find_many`]: a [`QueryNode`] that exists is well formed, and compiling
/// it never fails.
///
/// [`find_unique`]: crate::find_unique
/// [`find_many`]: crate::find_many
/// [`QueryNode`]: crate::QueryNode
#[derive(Debug, Error)]
pub enum QueryError {
    /// A column selection entry that matches none of the accepted shapes.
    #[error("malformed column selection `{entry}`: {reason}")]
    MalformedSelection {
        /// The offending entry text.
        entry: String,
        /// What the entry violated.
        reason: &'static str,
    },

    /// A single-row query built without a row filter.
    #[error("single-row query on `{table}` requires a filter")]
    MissingFilter {
        /// Table of the offending node.
        table: String,
    },

    /// Two sibling relations under one parent resolve to the same alias,
    /// which would collide both as JSON keys and as subquery aliases.
    #[error("duplicate relation alias `{alias}` under `{table}`")]
    DuplicateChildAlias {
        /// Table of the parent node.
        table: String,
        /// The alias both children resolved to.
        alias: String,
    },

    /// A table selection with an empty table name.
    #[error("table name must not be empty")]
    EmptyTableName,

    /// An empty SQL fragment where a non-empty one is required.
    #[error("empty {what} on `{table}`")]
    EmptyFragment {
        /// Which fragment was empty.
        what: &'static str,
        /// Table of the offending node.
        table: String,
    },
}

/// Result type for query construction.
pub type Result<T> = std::result::Result<T, QueryError>;
