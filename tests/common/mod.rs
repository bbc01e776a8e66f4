//! Shared query trees over the sakila rental schema, mirroring the shapes a
//! storefront API loads: one customer, a film page with its cast, and a
//! store snapshot with customers, stocked films and the street address.

#![allow(dead_code)]

use jsonquery::prelude::*;

/// Flat single-customer lookup by primary key.
pub fn customer_by_id() -> QueryNode {
    find_unique(
        "customer",
        ["customer_id", "store_id", "first_name", "last_name", "email"],
        "customer.customer_id = ?",
        [],
    )
    .unwrap()
}

/// One page of films, ordered by title.
pub fn films_page() -> QueryNode {
    find_many(
        "film",
        ["film_id", "title", "release_year"],
        QueryOptions::new()
            .order_by([OrderBy::asc("title")])
            .limit(20),
    )
    .unwrap()
}

/// Cast list correlated against an enclosing film row, hopping the
/// film_actor junction table.
pub fn actors_of_film() -> QueryNode {
    find_many(
        ("actor", "actors"),
        ["actor_id", "first_name", "last_name"],
        QueryOptions::new()
            .join(["film_actor"])
            .r#where("film_actor.film_id = film.film_id AND film_actor.actor_id = actor.actor_id"),
    )
    .unwrap()
}

/// A film page with the cast nested under each film.
pub fn films_with_actors() -> QueryNode {
    find_many(
        ("film", "films"),
        ["film_id", "title"],
        (
            QueryOptions::new()
                .order_by([OrderBy::asc("title")])
                .limit(200),
            [actors_of_film()],
        ),
    )
    .unwrap()
}

/// Storefront snapshot: one store with its ten most recent customers (each
/// with their latest payments), ten stocked films (each with cast and
/// categories), and the street address.
pub fn store_storefront() -> QueryNode {
    let payments = find_many(
        ("payment", "payments"),
        ["payment_id", "amount", "payment_date"],
        QueryOptions::new()
            .r#where("payment.customer_id = customer.customer_id")
            .order_by([OrderBy::desc("payment_date")])
            .limit(5),
    )
    .unwrap();

    let customers = find_many(
        ("customer", "customers"),
        ["customer_id", "first_name", "last_name", "email"],
        (
            QueryOptions::new()
                .r#where("customer.store_id = store.store_id")
                .limit(10),
            [payments],
        ),
    )
    .unwrap();

    let categories = find_many(
        ("category", "categories"),
        ["name"],
        QueryOptions::new().join(["film_category"]).r#where(
            "film_category.film_id = film.film_id AND film_category.category_id = category.category_id",
        ),
    )
    .unwrap();

    let films = find_many(
        ("film", "films"),
        ["film_id", "title", "rental_rate"],
        (
            QueryOptions::new()
                .join(["inventory"])
                .r#where("inventory.store_id = store.store_id AND inventory.film_id = film.film_id")
                .limit(10),
            [actors_of_film(), categories],
        ),
    )
    .unwrap();

    let address = find_unique(
        "address",
        ["address", "district", "postal_code"],
        "address.address_id = store.address_id",
        [],
    )
    .unwrap();

    find_unique(
        "store",
        ["store_id", "manager_staff_id", "address_id"],
        "store.store_id = ?",
        [customers, films, address],
    )
    .unwrap()
}
