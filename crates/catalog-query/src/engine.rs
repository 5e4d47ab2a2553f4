//! The query engine: schema-validated dispatch of one operation to its resolver.
//!
//! Dispatch goes through an explicit name → handler table. The table is
//! checked against the schema when the engine is built, so a declared
//! operation without a handler (or a handler without a declaration) fails at
//! startup rather than on first use.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::BoxFuture;
use serde::Serialize;
use serde_json::{Map, Value};

use catalog_store::EntityStore;

use crate::arguments::Arguments;
use crate::error::{QueryError, Result};
use crate::resolvers::Resolvers;
use crate::response::{parse_document, Request, Response};
use crate::schema::Schema;

/// A typed handler: unpacks validated arguments, calls one resolver, and
/// serializes its result.
pub type Handler = for<'a> fn(&'a Resolvers, Arguments) -> BoxFuture<'a, Result<Value>>;

pub struct QueryEngine {
    schema: Schema,
    resolvers: Resolvers,
    handlers: HashMap<&'static str, Handler>,
}

impl QueryEngine {
    /// Bind `resolvers` to every operation declared by `schema`.
    pub fn new(schema: Schema, resolvers: Resolvers) -> Result<Self> {
        let handlers = bind(&schema, &handler_table())?;
        tracing::debug!(operations = handlers.len(), "Bound schema operations to resolvers");
        Ok(Self {
            schema,
            resolvers,
            handlers,
        })
    }

    /// Engine over the catalog schema and the given store.
    pub fn with_store(store: Arc<dyn EntityStore>) -> Result<Self> {
        Self::new(Schema::catalog(), Resolvers::new(store))
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Validate and run one operation. The resolver's result or failure is
    /// returned as is.
    pub async fn execute(&self, operation: &str, arguments: &Map<String, Value>) -> Result<Value> {
        let def = self
            .schema
            .operation(operation)
            .ok_or_else(|| QueryError::UnknownOperation(operation.to_string()))?;
        let args = Arguments::validate(def, arguments)?;

        let handler = self
            .handlers
            .get(def.name)
            .ok_or_else(|| QueryError::UnmappedOperation(def.name.to_string()))?;
        handler(&self.resolvers, args).await
    }

    /// Run a request and wrap the outcome in a response envelope.
    pub async fn execute_request(&self, request: Request) -> Response {
        match self.execute(&request.operation, &request.arguments).await {
            Ok(value) => Response::success(&request.operation, value),
            Err(err) => {
                tracing::warn!(
                    operation = %request.operation,
                    kind = ?err.kind(),
                    error = %err,
                    "Operation failed"
                );
                Response::failure(&request.operation, &err)
            }
        }
    }

    /// Run every request in a JSON document, in order, one response each.
    pub async fn execute_document(&self, input: &str) -> Vec<Response> {
        let mut responses = Vec::new();
        for entry in parse_document(input) {
            let response = match entry {
                Ok(request) => self.execute_request(request).await,
                Err(rejected) => {
                    tracing::warn!(error = ?rejected.errors, "Rejected malformed request");
                    rejected
                }
            };
            responses.push(response);
        }
        responses
    }

    /// Close the underlying store.
    pub async fn close(&self) -> Result<()> {
        self.resolvers.store().close().await?;
        Ok(())
    }
}

/// Check `table` against the schema and index it by operation name.
pub fn bind(
    schema: &Schema,
    table: &[(&'static str, Handler)],
) -> Result<HashMap<&'static str, Handler>> {
    schema.check()?;

    let mut handlers = HashMap::with_capacity(table.len());
    for (name, handler) in table {
        if schema.operation(name).is_none() || handlers.insert(*name, *handler).is_some() {
            return Err(QueryError::UnmappedOperation((*name).to_string()));
        }
    }
    for op in schema.operations() {
        if !handlers.contains_key(op.name) {
            return Err(QueryError::UnmappedOperation(op.name.to_string()));
        }
    }
    Ok(handlers)
}

// ── Handler Table ─────────────────────────────────────────────────

pub fn handler_table() -> [(&'static str, Handler); 7] {
    [
        ("users", users as Handler),
        ("user", user as Handler),
        ("products", products as Handler),
        ("product", product as Handler),
        ("addUser", add_user as Handler),
        ("updateUser", update_user as Handler),
        ("addProduct", add_product as Handler),
    ]
}

fn users(r: &Resolvers, _args: Arguments) -> BoxFuture<'_, Result<Value>> {
    Box::pin(async move { to_value(r.users().await?) })
}

fn user(r: &Resolvers, args: Arguments) -> BoxFuture<'_, Result<Value>> {
    Box::pin(async move { to_value(r.user(&args.id("id")?).await?) })
}

fn products(r: &Resolvers, _args: Arguments) -> BoxFuture<'_, Result<Value>> {
    Box::pin(async move { to_value(r.products().await?) })
}

fn product(r: &Resolvers, args: Arguments) -> BoxFuture<'_, Result<Value>> {
    Box::pin(async move { to_value(r.product(&args.id("id")?).await?) })
}

fn add_user(r: &Resolvers, args: Arguments) -> BoxFuture<'_, Result<Value>> {
    Box::pin(async move { to_value(r.add_user(args.string("name")?, args.int("age")?).await?) })
}

fn update_user(r: &Resolvers, args: Arguments) -> BoxFuture<'_, Result<Value>> {
    Box::pin(async move {
        let id = args.id("id")?;
        let updated = r
            .update_user(&id, args.opt_string("name"), args.opt_int("age"))
            .await?;
        to_value(updated)
    })
}

fn add_product(r: &Resolvers, args: Arguments) -> BoxFuture<'_, Result<Value>> {
    Box::pin(async move {
        let user_id = args.opt_id("userId");
        let created = r
            .add_product(args.string("title")?, args.int("price")?, user_id.as_deref())
            .await?;
        to_value(created)
    })
}

fn to_value<T: Serialize>(value: T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::ErrorKind;
    use catalog_store::MemoryStore;
    use serde_json::json;

    fn engine() -> QueryEngine {
        QueryEngine::with_store(Arc::new(MemoryStore::new())).unwrap()
    }

    fn args(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[test]
    fn full_table_binds() {
        let handlers = bind(&Schema::catalog(), &handler_table()).unwrap();
        assert_eq!(handlers.len(), Schema::catalog().operations().len());
    }

    #[test]
    fn missing_handler_fails_binding() {
        let table = handler_table();
        let partial: Vec<_> = table
            .iter()
            .copied()
            .filter(|(name, _)| *name != "updateUser")
            .collect();
        let err = bind(&Schema::catalog(), &partial).unwrap_err();
        assert!(matches!(err, QueryError::UnmappedOperation(ref name) if name == "updateUser"));
    }

    #[test]
    fn undeclared_handler_fails_binding() {
        let mut table = handler_table().to_vec();
        table.push(("newUser", users as Handler));
        let err = bind(&Schema::catalog(), &table).unwrap_err();
        assert!(matches!(err, QueryError::UnmappedOperation(ref name) if name == "newUser"));
    }

    #[tokio::test]
    async fn unknown_operation() {
        let err = engine().execute("newUser", &Map::new()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownOperation);
    }

    #[tokio::test]
    async fn invalid_arguments_never_reach_the_store() {
        let engine = engine();
        let err = engine
            .execute("addUser", &args(json!({"name": "Alice"})))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationError);

        let users = engine.execute("users", &Map::new()).await.unwrap();
        assert_eq!(users, json!([]));
    }

    #[tokio::test]
    async fn add_user_shapes_user_type() {
        let engine = engine();
        let value = engine
            .execute("addUser", &args(json!({"name": "Alice", "age": 30})))
            .await
            .unwrap();
        assert_eq!(value["name"], "Alice");
        assert_eq!(value["age"], 30);
        assert_eq!(value["products"], json!([]));
        assert!(value["id"].is_string());
    }

    #[tokio::test]
    async fn malformed_entry_does_not_stop_the_batch() {
        let engine = engine();
        let responses = engine
            .execute_document(
                r#"[{"operation": "addUser", "arguments": {"name": "A", "age": 1}},
                    {"operation": "addUser", "arguments": []},
                    {"operation": "users", "arguments": "x"},
                    {"operation": "users"}]"#,
            )
            .await;

        assert_eq!(responses.len(), 4);
        assert!(responses[0].is_ok());
        assert_eq!(responses[1].errors[0].kind, ErrorKind::ValidationError);
        assert_eq!(responses[1].data, None);
        assert_eq!(responses[2].errors[0].kind, ErrorKind::ValidationError);

        let users = responses[3].value("users").unwrap();
        assert_eq!(users.as_array().unwrap().len(), 1);
        assert_eq!(users[0]["name"], "A");
    }

    #[tokio::test]
    async fn closed_engine_reports_internal_errors() {
        let engine = engine();
        engine.close().await.unwrap();
        let resp = engine.execute_request(Request::new("products", json!({}))).await;
        assert_eq!(resp.errors[0].kind, ErrorKind::Internal);
    }
}
