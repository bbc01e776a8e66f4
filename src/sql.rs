//! SQL generation.
//!
//! Every compiled node, at any depth, is a subquery exposing exactly one
//! output column named `_json`. A parent splices each child in as
//! `LEFT JOIN LATERAL (<child>) AS <alias> ON true` and reads
//! `<alias>._json` as one property of its own JSON object. LATERAL is what
//! lets the child's filter reference columns of the parent's derived table,
//! re-evaluating the child once per parent row; LEFT keeps parents with no
//! matching child rows, where the child column becomes SQL `NULL` (object
//! children) or `[]` via the COALESCE fallback (array children).
//!
//! The whole tree is rendered into one `String` in a single depth-first
//! pass, with no intermediate allocations per node.

use core::fmt::Write;

use crate::node::{NodeKind, OrderBy, QueryNode};
use crate::selection::ResolvedColumns;

/// Recursively writes the subquery for `node` and its children.
pub(crate) fn write_query(node: &QueryNode, sql: &mut String) {
    let table = node.table.name();

    let mut columns = ResolvedColumns::new();
    for selection in &node.columns {
        selection.resolve_into(table, &mut columns);
    }
    // Own columns first, then one property per relation, in declaration
    // order: the alias is both the JSON key and the lateral subquery name.
    for child in &node.children {
        let alias = child.json_key();
        columns.push_prop(alias.to_owned(), format!("{alias}._json"));
    }

    match node.kind {
        NodeKind::Object => {
            sql.push_str("SELECT ");
            write_json_object(&columns.json_props, sql);
            sql.push_str(" AS _json FROM (SELECT ");
            write_select_list(&columns.select_list, sql);
            sql.push_str(" FROM ");
            sql.push_str(table);
            if let Some(filter) = node.filter.as_deref() {
                sql.push_str(" WHERE ");
                sql.push_str(filter);
            }
            sql.push_str(") AS ");
            sql.push_str(table);
        }
        NodeKind::Array => {
            sql.push_str("SELECT COALESCE(JSON_ARRAYAGG(");
            write_json_object(&columns.json_props, sql);
            sql.push_str("), CAST('[]' AS JSON)) AS _json FROM (SELECT ");
            write_select_list(&columns.select_list, sql);
            sql.push_str(" FROM ");
            sql.push_str(table);
            // Junction tables join the node's own FROM list as a comma
            // cross join; the filter carries the join predicates.
            for join in &node.join {
                sql.push_str(", ");
                sql.push_str(join);
            }
            if let Some(filter) = node.filter.as_deref() {
                sql.push_str(" WHERE ");
                sql.push_str(filter);
            }
            write_order_by(&node.order_by, sql);
            write_limit(node.limit, node.offset, sql);
            sql.push_str(") AS ");
            sql.push_str(table);
        }
    }

    write_lateral_joins(&node.children, sql);
}

/// Writes `JSON_OBJECT("key", value, ...)` with double-quoted keys.
fn write_json_object(props: &[(String, String)], sql: &mut String) {
    sql.push_str("JSON_OBJECT(");
    for (i, (key, value)) in props.iter().enumerate() {
        if i > 0 {
            sql.push_str(", ");
        }
        sql.push('"');
        sql.push_str(key);
        sql.push_str("\", ");
        sql.push_str(value);
    }
    sql.push(')');
}

/// Writes the derived table's select list, `*` when nothing was selected.
fn write_select_list(entries: &[String], sql: &mut String) {
    if entries.is_empty() {
        sql.push('*');
        return;
    }
    for (i, entry) in entries.iter().enumerate() {
        if i > 0 {
            sql.push_str(", ");
        }
        sql.push_str(entry);
    }
}

/// Writes all pairs under a single ORDER BY keyword.
fn write_order_by(pairs: &[OrderBy], sql: &mut String) {
    for (i, pair) in pairs.iter().enumerate() {
        sql.push_str(if i == 0 { " ORDER BY " } else { ", " });
        sql.push_str(&pair.column);
        sql.push(' ');
        sql.push_str(pair.order.as_sql());
    }
}

/// Writes the MySQL `LIMIT [offset, ]limit` clause. An offset without a
/// limit has no rendering and is ignored.
fn write_limit(limit: Option<u32>, offset: Option<u32>, sql: &mut String) {
    if let Some(limit) = limit {
        sql.push_str(" LIMIT ");
        if let Some(offset) = offset {
            let _ = write!(sql, "{offset}, ");
        }
        let _ = write!(sql, "{limit}");
    }
}

fn write_lateral_joins(children: &[QueryNode], sql: &mut String) {
    for child in children {
        sql.push_str(" LEFT JOIN LATERAL (");
        write_query(child, sql);
        sql.push_str(") AS ");
        sql.push_str(child.json_key());
        sql.push_str(" ON true");
    }
}

/// Counts the positional `?` placeholders in a compiled statement.
///
/// Placeholders pass through compilation verbatim, so their bind order is
/// their order of appearance in the output text: a depth-first walk of the
/// tree, parent filter before child filters, siblings in declaration order.
/// The scan skips `?` characters inside single- or double-quoted SQL string
/// literals, honoring doubled-quote and backslash escapes.
///
/// ```
/// use jsonquery::count_placeholders;
///
/// assert_eq!(count_placeholders("WHERE a = ? AND b = '?'"), 1);
/// ```
pub fn count_placeholders(sql: &str) -> usize {
    let bytes = sql.as_bytes();
    let mut count = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'?' => {
                count += 1;
                i += 1;
            }
            quote @ (b'\'' | b'"') => {
                i += 1;
                while i < bytes.len() {
                    if bytes[i] == b'\\' {
                        i += 2;
                    } else if bytes[i] == quote {
                        // A doubled quote escapes itself inside a literal.
                        if bytes.get(i + 1) == Some(&quote) {
                            i += 2;
                        } else {
                            i += 1;
                            break;
                        }
                    } else {
                        i += 1;
                    }
                }
            }
            _ => i += 1,
        }
    }
    count
}
