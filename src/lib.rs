//! Compiles a declarative tree of related relational queries into one MySQL
//! statement that returns its entire result as JSON.
//!
//! Fetching a nested object graph over SQL usually means either N+1 queries
//! or a wide join that gets re-nested in application code. This crate takes
//! a third route: describe the graph as a tree of table queries, compile it
//! to a single statement in which every relation is a correlated
//! `LEFT JOIN LATERAL` subquery, and let MySQL build the nested document
//! itself with `JSON_OBJECT` and `JSON_ARRAYAGG`. The statement returns one
//! row with one column named `_json`, ready to hand to any JSON consumer.
//!
//! Trees are built with [`find_unique`] (exactly one row, a JSON object)
//! and [`find_many`] (any number of rows, a JSON array):
//!
//! ```
//! use jsonquery::prelude::*;
//!
//! let customer = find_unique(
//!     "customer",
//!     ["customer_id", "first_name"],
//!     "customer.customer_id = ?",
//!     [],
//! )?;
//!
//! assert_eq!(
//!     customer.compile(),
//!     r#"SELECT JSON_OBJECT("customer_id", customer.customer_id, "first_name", customer.first_name) AS _json FROM (SELECT customer.customer_id, customer.first_name FROM customer WHERE customer.customer_id = ?) AS customer"#,
//! );
//! # Ok::<(), jsonquery::QueryError>(())
//! ```
//!
//! Compilation is pure text generation. Nothing here connects to a
//! database: the caller executes the statement with whatever MySQL driver
//! it already uses, binding one value per `?` placeholder in order of
//! appearance ([`count_placeholders`] tells how many). Filter fragments,
//! join tables and calculated expressions are spliced verbatim and must be
//! trusted text; placeholders are the only channel for runtime values.

pub mod builder;
pub mod error;
pub mod node;
pub mod selection;
pub mod sql;
mod trace;

pub use builder::{FindManyArgs, QueryOptions, find_many, find_unique};
pub use error::{QueryError, Result};
pub use node::{NodeKind, OrderBy, QueryNode, SortOrder, TableSelection};
pub use selection::ColumnSelection;
pub use sql::count_placeholders;

/// Single-import surface for building and compiling query trees.
pub mod prelude {
    pub use crate::builder::{FindManyArgs, QueryOptions, find_many, find_unique};
    pub use crate::error::QueryError;
    pub use crate::node::{NodeKind, OrderBy, QueryNode, SortOrder, TableSelection};
    pub use crate::selection::ColumnSelection;
    pub use crate::sql::count_placeholders;
}
