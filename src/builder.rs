//! Builder entry points. [`find_unique`] and [`find_many`] are the only way
//! to obtain a [`QueryNode`], which keeps every reachable tree valid.

use crate::error::Result;
use crate::node::{NodeKind, OrderBy, QueryNode, TableSelection};
use crate::selection::ColumnSelection;

// ================================================================================================
// Options
// ================================================================================================

/// Row-set options of an array node: filter, junction joins, ordering and
/// pagination. All methods chain.
///
/// ```
/// use jsonquery::prelude::*;
///
/// let options = QueryOptions::new()
///     .r#where("film.rating = ?")
///     .order_by([OrderBy::asc("title")])
///     .limit(20)
///     .offset(40);
/// # let _ = options;
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    pub(crate) filter: Option<String>,
    pub(crate) join: Vec<String>,
    pub(crate) order_by: Vec<OrderBy>,
    pub(crate) limit: Option<u32>,
    pub(crate) offset: Option<u32>,
}

impl QueryOptions {
    /// Creates empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the raw WHERE fragment. The fragment may reference columns of
    /// the parent's derived table to correlate the relation, and may carry
    /// `?` placeholders, which pass through to the compiled statement.
    pub fn r#where(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Adds junction tables to the node's own FROM list, for relations that
    /// hop across a many-to-many link table. Join predicates go into
    /// [`QueryOptions::r#where`].
    pub fn join<I>(mut self, tables: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.join.extend(tables.into_iter().map(Into::into));
        self
    }

    /// Appends ordering pairs, applied inside the derived table so the
    /// aggregated JSON array preserves the order.
    pub fn order_by<I>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = OrderBy>,
    {
        self.order_by.extend(pairs);
        self
    }

    /// Caps the number of aggregated rows.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Skips leading rows. Only rendered together with a limit.
    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }
}

// ================================================================================================
// find_many argument dispatch
// ================================================================================================

/// The trailing argument of [`find_many`], spelling out which of options and
/// nested relations a call carries instead of sniffing argument shapes.
///
/// Callers rarely name this type: `()`, a `[QueryNode; N]` or
/// `Vec<QueryNode>`, a [`QueryOptions`], and an options/children pair all
/// convert into it.
#[derive(Debug, Clone, Default)]
pub enum FindManyArgs {
    /// No options, no nested relations.
    #[default]
    Empty,
    /// Nested relations only.
    Children(Vec<QueryNode>),
    /// Options only.
    Options(QueryOptions),
    /// Options plus nested relations.
    OptionsWithChildren(QueryOptions, Vec<QueryNode>),
}

impl FindManyArgs {
    fn into_parts(self) -> (QueryOptions, Vec<QueryNode>) {
        match self {
            Self::Empty => (QueryOptions::default(), Vec::new()),
            Self::Children(children) => (QueryOptions::default(), children),
            Self::Options(options) => (options, Vec::new()),
            Self::OptionsWithChildren(options, children) => (options, children),
        }
    }
}

impl From<()> for FindManyArgs {
    fn from((): ()) -> Self {
        Self::Empty
    }
}

impl From<Vec<QueryNode>> for FindManyArgs {
    fn from(children: Vec<QueryNode>) -> Self {
        Self::Children(children)
    }
}

impl<const N: usize> From<[QueryNode; N]> for FindManyArgs {
    fn from(children: [QueryNode; N]) -> Self {
        Self::Children(children.into())
    }
}

impl From<QueryOptions> for FindManyArgs {
    fn from(options: QueryOptions) -> Self {
        Self::Options(options)
    }
}

impl From<(QueryOptions, Vec<QueryNode>)> for FindManyArgs {
    fn from((options, children): (QueryOptions, Vec<QueryNode>)) -> Self {
        Self::OptionsWithChildren(options, children)
    }
}

impl<const N: usize> From<(QueryOptions, [QueryNode; N])> for FindManyArgs {
    fn from((options, children): (QueryOptions, [QueryNode; N])) -> Self {
        Self::OptionsWithChildren(options, children.into())
    }
}

// ================================================================================================
// Entry points
// ================================================================================================

/// Builds a single-row node, compiled as one `JSON_OBJECT`.
///
/// `filter` is mandatory: a single-row subquery without one would return a
/// row per table row, and MySQL rejects multi-row scalar subqueries at
/// execution time. Matching zero rows is fine and yields SQL `NULL` (at the
/// root) or a `null` JSON property (nested under a parent).
///
/// ```
/// use jsonquery::prelude::*;
///
/// let customer = find_unique(
///     "customer",
///     ["customer_id", "first_name"],
///     "customer.customer_id = ?",
///     [],
/// )?;
/// # let _ = customer;
/// # Ok::<(), jsonquery::QueryError>(())
/// ```
pub fn find_unique<T, C, R>(
    table: T,
    columns: C,
    filter: impl Into<String>,
    children: R,
) -> Result<QueryNode>
where
    T: Into<TableSelection>,
    C: IntoIterator,
    C::Item: Into<ColumnSelection>,
    R: IntoIterator<Item = QueryNode>,
{
    let node = QueryNode {
        kind: NodeKind::Object,
        table: table.into(),
        columns: columns.into_iter().map(Into::into).collect(),
        filter: Some(filter.into()),
        join: Vec::new(),
        order_by: Vec::new(),
        limit: None,
        offset: None,
        children: children.into_iter().collect(),
    };
    node.validate()?;
    Ok(node)
}

/// Builds a multi-row node, compiled as one `JSON_ARRAYAGG` aggregate with a
/// `[]` fallback when no rows match.
///
/// The trailing argument takes anything that converts into [`FindManyArgs`]:
///
/// ```
/// use jsonquery::prelude::*;
///
/// // Whole table, no options.
/// let all = find_many("film", ["film_id", "title"], ())?;
///
/// // Options only.
/// let recent = find_many(
///     "film",
///     ["film_id", "title"],
///     QueryOptions::new().order_by([OrderBy::desc("release_year")]).limit(10),
/// )?;
///
/// // Options plus a nested relation, keyed as "actors" in each film object.
/// let with_actors = find_many(
///     "film",
///     ["film_id", "title"],
///     (
///         QueryOptions::new().limit(10),
///         [find_many(
///             ("actor", "actors"),
///             ["first_name", "last_name"],
///             QueryOptions::new()
///                 .join(["film_actor"])
///                 .r#where("film_actor.film_id = film.film_id AND film_actor.actor_id = actor.actor_id"),
///         )?],
///     ),
/// )?;
/// # let _ = (all, recent, with_actors);
/// # Ok::<(), jsonquery::QueryError>(())
/// ```
pub fn find_many<T, C, A>(table: T, columns: C, args: A) -> Result<QueryNode>
where
    T: Into<TableSelection>,
    C: IntoIterator,
    C::Item: Into<ColumnSelection>,
    A: Into<FindManyArgs>,
{
    let (options, children) = args.into().into_parts();
    let node = QueryNode {
        kind: NodeKind::Array,
        table: table.into(),
        columns: columns.into_iter().map(Into::into).collect(),
        filter: options.filter,
        join: options.join,
        order_by: options.order_by,
        limit: options.limit,
        offset: options.offset,
        children,
    };
    node.validate()?;
    Ok(node)
}
