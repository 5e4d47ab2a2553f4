//! Static declaration of the catalog graph schema.
//!
//! Pure data: object types with their field nullability, and the query and
//! mutation operations with their argument signatures and return types.
//! Nothing here executes; the engine reads it to validate and dispatch.

use std::fmt::{self, Write as _};

use crate::error::{QueryError, Result};

/// Built-in scalar types used by the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scalar {
    Id,
    String,
    Int,
}

impl Scalar {
    pub fn name(&self) -> &'static str {
        match self {
            Scalar::Id => "ID",
            Scalar::String => "String",
            Scalar::Int => "Int",
        }
    }
}

/// A (possibly wrapped) type reference. Unwrapped references are nullable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeRef {
    Scalar(Scalar),
    Object(&'static str),
    List(&'static TypeRef),
    NonNull(&'static TypeRef),
}

impl TypeRef {
    pub fn is_non_null(&self) -> bool {
        matches!(self, TypeRef::NonNull(_))
    }

    /// The object type at the core of this reference, if any.
    pub fn object_name(&self) -> Option<&'static str> {
        match self {
            TypeRef::Scalar(_) => None,
            TypeRef::Object(name) => Some(*name),
            TypeRef::List(inner) | TypeRef::NonNull(inner) => inner.object_name(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Scalar(s) => f.write_str(s.name()),
            TypeRef::Object(name) => f.write_str(name),
            TypeRef::List(inner) => write!(f, "[{inner}]"),
            TypeRef::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldDef {
    pub name: &'static str,
    pub ty: TypeRef,
}

#[derive(Debug, Clone, Copy)]
pub struct ObjectDef {
    pub name: &'static str,
    pub fields: &'static [FieldDef],
}

#[derive(Debug, Clone, Copy)]
pub struct ArgumentDef {
    pub name: &'static str,
    pub ty: Scalar,
    pub required: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Query,
    Mutation,
}

#[derive(Debug, Clone, Copy)]
pub struct OperationDef {
    pub kind: OperationKind,
    pub name: &'static str,
    pub arguments: &'static [ArgumentDef],
    pub returns: TypeRef,
}

impl OperationDef {
    pub fn argument(&self, name: &str) -> Option<&ArgumentDef> {
        self.arguments.iter().find(|a| a.name == name)
    }
}

// ── Declaration ───────────────────────────────────────────────────

const ID: TypeRef = TypeRef::Scalar(Scalar::Id);
const STRING: TypeRef = TypeRef::Scalar(Scalar::String);
const INT: TypeRef = TypeRef::Scalar(Scalar::Int);
const USER: TypeRef = TypeRef::Object("UserType");
const PRODUCT: TypeRef = TypeRef::Object("ProductType");

const fn arg(name: &'static str, ty: Scalar, required: bool) -> ArgumentDef {
    ArgumentDef { name, ty, required }
}

const OBJECTS: &[ObjectDef] = &[
    ObjectDef {
        name: "UserType",
        fields: &[
            FieldDef { name: "id", ty: TypeRef::NonNull(&ID) },
            FieldDef { name: "name", ty: TypeRef::NonNull(&STRING) },
            FieldDef { name: "age", ty: TypeRef::NonNull(&INT) },
            FieldDef { name: "products", ty: TypeRef::List(&PRODUCT) },
        ],
    },
    ObjectDef {
        name: "ProductType",
        fields: &[
            FieldDef { name: "id", ty: TypeRef::NonNull(&ID) },
            FieldDef { name: "title", ty: STRING },
            FieldDef { name: "price", ty: INT },
        ],
    },
];

const OPERATIONS: &[OperationDef] = &[
    OperationDef {
        kind: OperationKind::Query,
        name: "users",
        arguments: &[],
        returns: TypeRef::List(&USER),
    },
    OperationDef {
        kind: OperationKind::Query,
        name: "user",
        arguments: &[arg("id", Scalar::Id, true)],
        returns: USER,
    },
    OperationDef {
        kind: OperationKind::Query,
        name: "products",
        arguments: &[],
        returns: TypeRef::List(&PRODUCT),
    },
    OperationDef {
        kind: OperationKind::Query,
        name: "product",
        arguments: &[arg("id", Scalar::Id, true)],
        returns: PRODUCT,
    },
    OperationDef {
        kind: OperationKind::Mutation,
        name: "addUser",
        arguments: &[arg("name", Scalar::String, true), arg("age", Scalar::Int, true)],
        returns: USER,
    },
    OperationDef {
        kind: OperationKind::Mutation,
        name: "updateUser",
        arguments: &[
            arg("id", Scalar::Id, true),
            arg("name", Scalar::String, false),
            arg("age", Scalar::Int, false),
        ],
        returns: USER,
    },
    OperationDef {
        kind: OperationKind::Mutation,
        name: "addProduct",
        arguments: &[
            arg("title", Scalar::String, true),
            arg("price", Scalar::Int, true),
            arg("userId", Scalar::Id, false),
        ],
        returns: PRODUCT,
    },
];

/// The catalog schema: two object types, four queries, three mutations.
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    objects: &'static [ObjectDef],
    operations: &'static [OperationDef],
}

impl Default for Schema {
    fn default() -> Self {
        Self::catalog()
    }
}

impl Schema {
    pub const fn catalog() -> Self {
        Self {
            objects: OBJECTS,
            operations: OPERATIONS,
        }
    }

    pub fn objects(&self) -> &'static [ObjectDef] {
        self.objects
    }

    pub fn operations(&self) -> &'static [OperationDef] {
        self.operations
    }

    pub fn operation(&self, name: &str) -> Option<&'static OperationDef> {
        self.operations.iter().find(|op| op.name == name)
    }

    pub fn object(&self, name: &str) -> Option<&'static ObjectDef> {
        self.objects.iter().find(|o| o.name == name)
    }

    /// Verify that every referenced object type is declared and that no
    /// operation name is declared twice.
    pub fn check(&self) -> Result<()> {
        for (i, op) in self.operations.iter().enumerate() {
            if self.operations[..i].iter().any(|o| o.name == op.name) {
                return Err(QueryError::InvalidSchema(format!(
                    "operation {} is declared twice",
                    op.name
                )));
            }
            if let Some(name) = op.returns.object_name() {
                if self.object(name).is_none() {
                    return Err(QueryError::InvalidSchema(format!(
                        "{} returns undeclared type {name}",
                        op.name
                    )));
                }
            }
        }
        for object in self.objects {
            for field in object.fields {
                if let Some(name) = field.ty.object_name() {
                    if self.object(name).is_none() {
                        return Err(QueryError::InvalidSchema(format!(
                            "{}.{} references undeclared type {name}",
                            object.name, field.name
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Render the declaration as GraphQL SDL.
    pub fn sdl(&self) -> String {
        let mut out = String::new();
        for object in self.objects {
            let _ = writeln!(out, "type {} {{", object.name);
            for field in object.fields {
                let _ = writeln!(out, "  {}: {}", field.name, field.ty);
            }
            out.push_str("}\n\n");
        }
        for (kind, title) in [
            (OperationKind::Query, "Query"),
            (OperationKind::Mutation, "Mutation"),
        ] {
            let _ = writeln!(out, "type {title} {{");
            for op in self.operations.iter().filter(|op| op.kind == kind) {
                let _ = writeln!(out, "  {}{}: {}", op.name, render_args(op), op.returns);
            }
            out.push_str("}\n\n");
        }
        out.truncate(out.trim_end().len());
        out.push('\n');
        out
    }
}

fn render_args(op: &OperationDef) -> String {
    if op.arguments.is_empty() {
        return String::new();
    }
    let args: Vec<String> = op
        .arguments
        .iter()
        .map(|a| {
            let bang = if a.required { "!" } else { "" };
            format!("{}: {}{bang}", a.name, a.ty.name())
        })
        .collect();
    format!("({})", args.join(", "))
}
