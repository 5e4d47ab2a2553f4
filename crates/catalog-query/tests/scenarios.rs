//! End-to-end operation scenarios against the in-memory store.

use std::sync::Arc;

use serde_json::{json, Value};

use catalog_core::{ErrorKind, ProductId, UserId};
use catalog_query::{QueryEngine, Request, Response};
use catalog_store::MemoryStore;

fn engine() -> QueryEngine {
    QueryEngine::with_store(Arc::new(MemoryStore::new())).unwrap()
}

async fn run(engine: &QueryEngine, operation: &str, arguments: Value) -> Response {
    engine
        .execute_request(Request::new(operation, arguments))
        .await
}

async fn ok(engine: &QueryEngine, operation: &str, arguments: Value) -> Value {
    let response = run(engine, operation, arguments).await;
    assert!(response.is_ok(), "{operation} failed: {:?}", response.errors);
    response.value(operation).cloned().unwrap()
}

fn id_of(value: &Value) -> String {
    value["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn added_user_reads_back_with_no_products() {
    let engine = engine();
    let added = ok(&engine, "addUser", json!({"name": "Carol", "age": 52})).await;

    let found = ok(&engine, "user", json!({"id": id_of(&added)})).await;
    assert_eq!(found["name"], "Carol");
    assert_eq!(found["age"], 52);
    assert_eq!(found["products"], json!([]));
}

#[tokio::test]
async fn alice_owns_widget() {
    let engine = engine();
    let alice = ok(&engine, "addUser", json!({"name": "Alice", "age": 30})).await;
    let u1 = id_of(&alice);

    let widget = ok(
        &engine,
        "addProduct",
        json!({"title": "Widget", "price": 10, "userId": u1}),
    )
    .await;
    let p1 = id_of(&widget);

    let found = ok(&engine, "user", json!({"id": u1})).await;
    assert_eq!(
        found,
        json!({
            "id": u1,
            "name": "Alice",
            "age": 30,
            "products": [{"id": p1, "title": "Widget", "price": 10}],
        })
    );
}

#[tokio::test]
async fn new_product_is_appended_exactly_once() {
    let engine = engine();
    let owner = ok(&engine, "addUser", json!({"name": "Dan", "age": 19})).await;
    let uid = id_of(&owner);

    let first = ok(&engine, "addProduct", json!({"title": "A", "price": 1, "userId": uid})).await;
    let second = ok(&engine, "addProduct", json!({"title": "B", "price": 2, "userId": uid})).await;

    let found = ok(&engine, "user", json!({"id": uid})).await;
    let ids: Vec<String> = found["products"]
        .as_array()
        .unwrap()
        .iter()
        .map(id_of)
        .collect();
    assert_eq!(ids, vec![id_of(&first), id_of(&second)]);
}

#[tokio::test]
async fn users_lists_each_owner_with_populated_products() {
    let engine = engine();
    let grace = id_of(&ok(&engine, "addUser", json!({"name": "Grace", "age": 36})).await);
    let heidi = id_of(&ok(&engine, "addUser", json!({"name": "Heidi", "age": 28})).await);

    let mut grace_products = Vec::new();
    let mut heidi_products = Vec::new();
    for (title, price, owner) in [
        ("Lamp", 40, &grace),
        ("Desk", 250, &heidi),
        ("Chair", 90, &grace),
        ("Rug", 120, &heidi),
        ("Shelf", 75, &grace),
    ] {
        let product = ok(
            &engine,
            "addProduct",
            json!({"title": title, "price": price, "userId": owner}),
        )
        .await;
        if owner == &grace {
            grace_products.push(product);
        } else {
            heidi_products.push(product);
        }
    }

    let users = ok(&engine, "users", json!({})).await;
    let users = users.as_array().unwrap();
    assert_eq!(users.len(), 2);

    for user in users {
        let expected = if id_of(user) == grace {
            &grace_products
        } else {
            assert_eq!(id_of(user), heidi);
            &heidi_products
        };
        assert_eq!(user["products"], Value::Array(expected.clone()));
    }
}

#[tokio::test]
async fn orphan_product_is_referenced_by_nobody() {
    let engine = engine();
    ok(&engine, "addUser", json!({"name": "Eve", "age": 44})).await;

    let orphan = ok(&engine, "addProduct", json!({"title": "Orphan", "price": 5})).await;
    assert_eq!(orphan["title"], "Orphan");
    assert_eq!(orphan["price"], 5);

    let users = ok(&engine, "users", json!({})).await;
    for user in users.as_array().unwrap() {
        assert!(user["products"]
            .as_array()
            .unwrap()
            .iter()
            .all(|p| p["id"] != orphan["id"]));
    }
}

#[tokio::test]
async fn bad_owner_keeps_product_and_reports_partial_failure() {
    let engine = engine();
    let response = run(
        &engine,
        "addProduct",
        json!({"title": "Bad", "price": 1, "userId": "doesnotexist"}),
    )
    .await;

    assert_eq!(response.errors.len(), 1);
    assert_eq!(response.errors[0].kind, ErrorKind::PartialMutationFailure);
    assert_eq!(response.errors[0].path, vec!["addProduct".to_string()]);

    let created = response.value("addProduct").cloned().unwrap();
    assert_eq!(created["title"], "Bad");

    let stored = ok(&engine, "product", json!({"id": id_of(&created)})).await;
    assert_eq!(stored, created);
}

#[tokio::test]
async fn unknown_but_well_formed_owner_is_also_partial() {
    let engine = engine();
    let response = run(
        &engine,
        "addProduct",
        json!({"title": "Lost", "price": 3, "userId": UserId::new().to_string()}),
    )
    .await;

    assert_eq!(response.errors[0].kind, ErrorKind::PartialMutationFailure);
    assert!(response.errors[0].message.contains("not found"));
    assert_eq!(ok(&engine, "products", json!({})).await.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn update_user_merges_partially() {
    let engine = engine();
    let user = ok(&engine, "addUser", json!({"name": "Frank", "age": 61})).await;
    let uid = id_of(&user);

    let updated = ok(&engine, "updateUser", json!({"id": uid, "name": "X"})).await;
    assert_eq!(updated["name"], "X");
    assert_eq!(updated["age"], 61);

    let found = ok(&engine, "user", json!({"id": uid})).await;
    assert_eq!(found, updated);
}

#[tokio::test]
async fn missing_user_is_null_but_missing_update_target_is_an_error() {
    let engine = engine();
    let ghost = UserId::new().to_string();

    let lookup = run(&engine, "user", json!({"id": ghost})).await;
    assert!(lookup.is_ok());
    assert_eq!(lookup.value("user"), Some(&Value::Null));

    let update = run(&engine, "updateUser", json!({"id": ghost, "age": 5})).await;
    assert!(!update.is_ok());
    assert_eq!(update.errors[0].kind, ErrorKind::NotFound);
    assert_eq!(update.data, None);
}

#[tokio::test]
async fn missing_product_is_null() {
    let engine = engine();
    let lookup = run(&engine, "product", json!({"id": ProductId::new().to_string()})).await;
    assert!(lookup.is_ok());
    assert_eq!(lookup.value("product"), Some(&Value::Null));
}

#[tokio::test]
async fn products_listing_is_stable_without_mutation() {
    let engine = engine();
    for (title, price) in [("A", 1), ("B", 2), ("C", 3)] {
        ok(&engine, "addProduct", json!({"title": title, "price": price})).await;
    }

    let sorted = |v: Value| {
        let mut ids: Vec<String> = v.as_array().unwrap().iter().map(id_of).collect();
        ids.sort();
        ids
    };
    let first = ok(&engine, "products", json!({})).await;
    let second = ok(&engine, "products", json!({})).await;
    assert_eq!(sorted(first), sorted(second));
}

#[tokio::test]
async fn add_user_validation_errors() {
    let engine = engine();

    let missing = run(&engine, "addUser", json!({"name": "NoAge"})).await;
    assert_eq!(missing.errors[0].kind, ErrorKind::ValidationError);

    let empty = run(&engine, "addUser", json!({"name": "", "age": 3})).await;
    assert_eq!(empty.errors[0].kind, ErrorKind::ValidationError);

    let negative = run(&engine, "addUser", json!({"name": "Neg", "age": -3})).await;
    assert_eq!(negative.errors[0].kind, ErrorKind::ValidationError);

    assert_eq!(ok(&engine, "users", json!({})).await, json!([]));
}

#[tokio::test]
async fn unknown_operation_and_malformed_id() {
    let engine = engine();

    let unknown = run(&engine, "newUser", json!({})).await;
    assert_eq!(unknown.errors[0].kind, ErrorKind::UnknownOperation);

    let malformed = run(&engine, "user", json!({"id": "doesnotexist"})).await;
    assert_eq!(malformed.errors[0].kind, ErrorKind::InvalidId);
}
