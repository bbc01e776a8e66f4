use common::{films_with_actors, store_storefront};
use jsonquery::prelude::*;

mod common;

#[test]
fn test_nested_compilation_exact() {
    let payments = find_many(
        ("payment", "payments"),
        ["payment_id", "amount"],
        QueryOptions::new()
            .r#where("payment.customer_id = customer.customer_id")
            .order_by([OrderBy::desc("payment_date")])
            .limit(5),
    )
    .unwrap();
    let customers = find_many(
        ("customer", "customers"),
        ["customer_id", "email"],
        (
            QueryOptions::new().r#where("customer.store_id = store.store_id"),
            [payments],
        ),
    )
    .unwrap();
    let store = find_unique(
        "store",
        ["store_id", "address_id"],
        "store.store_id = ?",
        [customers],
    )
    .unwrap();

    assert_eq!(
        store.compile(),
        r#"SELECT JSON_OBJECT("store_id", store.store_id, "address_id", store.address_id, "customers", customers._json) AS _json FROM (SELECT store.store_id, store.address_id FROM store WHERE store.store_id = ?) AS store LEFT JOIN LATERAL (SELECT COALESCE(JSON_ARRAYAGG(JSON_OBJECT("customer_id", customer.customer_id, "email", customer.email, "payments", payments._json)), CAST('[]' AS JSON)) AS _json FROM (SELECT customer.customer_id, customer.email FROM customer WHERE customer.store_id = store.store_id) AS customer LEFT JOIN LATERAL (SELECT COALESCE(JSON_ARRAYAGG(JSON_OBJECT("payment_id", payment.payment_id, "amount", payment.amount)), CAST('[]' AS JSON)) AS _json FROM (SELECT payment.payment_id, payment.amount FROM payment WHERE payment.customer_id = customer.customer_id ORDER BY payment_date DESC LIMIT 5) AS payment) AS payments ON true) AS customers ON true"#,
    );
}

#[test]
fn test_one_lateral_join_per_child_edge() {
    // Six edges: store -> customers/films/address, customers -> payments,
    // films -> actors/categories.
    let sql = store_storefront().compile();
    assert_eq!(sql.matches("LEFT JOIN LATERAL").count(), 6, "{sql}");
}

#[test]
fn test_every_node_exposes_single_json_column() {
    // Seven nodes, one `_json` output column each.
    let sql = store_storefront().compile();
    assert_eq!(sql.matches(" AS _json").count(), 7, "{sql}");
}

#[test]
fn test_child_subqueries_nest_inside_parent() {
    // A compiled child is spliced verbatim into its parent's text, so the
    // parent output must contain each child's own compilation, descendants
    // included rather than hoisted to the root.
    let store = store_storefront();
    let sql = store.compile();

    for child in store.children() {
        let child_sql = child.compile();
        assert!(
            sql.contains(&child_sql),
            "missing child subquery for `{}`",
            child.json_key()
        );
        for grandchild in child.children() {
            assert!(
                child_sql.contains(&grandchild.compile()),
                "grandchild `{}` not nested inside `{}`",
                grandchild.json_key(),
                child.json_key()
            );
        }
    }
}

#[test]
fn test_children_render_in_declaration_order() {
    let sql = store_storefront().compile();

    let customers = sql.find(r#""customers", customers._json"#).unwrap();
    let films = sql.find(r#""films", films._json"#).unwrap();
    let address = sql.find(r#""address", address._json"#).unwrap();
    assert!(customers < films && films < address, "{sql}");

    let customers_join = sql.find(") AS customers ON true").unwrap();
    let films_join = sql.find(") AS films ON true").unwrap();
    let address_join = sql.find(") AS address ON true").unwrap();
    assert!(customers_join < films_join && films_join < address_join, "{sql}");
}

#[test]
fn test_json_key_override_renames_key_and_alias() {
    let films = films_with_actors();
    let sql = films.compile();

    // The override names the JSON property and the lateral alias; the
    // derived table inside the child keeps the table name, so the child's
    // own filter still correlates through `actor` and `film`.
    assert!(sql.contains(r#""actors", actors._json"#), "{sql}");
    assert!(sql.contains(") AS actor) AS actors ON true"), "{sql}");
}

#[test]
fn test_root_json_key_override_is_inert() {
    // The root has no parent object to be keyed into.
    let sql = films_with_actors().compile();
    assert!(!sql.contains(r#""films""#), "{sql}");
    assert!(sql.contains("FROM film ORDER BY title ASC LIMIT 200) AS film"), "{sql}");
}

#[test]
fn test_correlation_columns_exposed_by_parent() {
    // Children of the store node correlate on store.store_id and
    // store.address_id; both must be columns of the store derived table.
    let sql = store_storefront().compile();
    assert!(
        sql.contains(
            "FROM (SELECT store.store_id, store.manager_staff_id, store.address_id FROM store WHERE store.store_id = ?) AS store"
        ),
        "{sql}"
    );
}

#[test]
fn test_compilation_is_deterministic() {
    let store = store_storefront();
    assert_eq!(store.compile(), store.compile());
    assert_eq!(store.clone().compile(), store.compile());
    assert_eq!(store_storefront().compile(), store.compile());
}
