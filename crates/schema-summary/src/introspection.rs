//! The shape of a GraphQL `__schema` introspection result, limited to what the summary reads.
//!
//! Everything here is deserialized leniently: optional keys may be missing or `null`, and type or
//! field entries that cannot be read are skipped one at a time rather than failing what contains
//! them.

use crate::error::SummaryError;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

/// The introspection query used to fetch the types summarized by this crate
pub const INTROSPECTION_QUERY: &str = r#"
query {
    __schema {
        types {
            kind
            name
            description
            enumValues {
                name
            }
            fields {
                name
                args {
                    name
                }
                type {
                    kind
                    name
                    ofType {
                        name
                    }
                }
            }
        }
    }
}
"#;

/// The kind of an introspected type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
    List,
    NonNull,
    #[serde(other)]
    Other,
}

/// One entry of `__schema.types`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectedType {
    #[serde(default)]
    pub kind: Option<TypeKind>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub enum_values: Option<Vec<EnumValue>>,
    #[serde(default, deserialize_with = "skip_malformed_fields")]
    pub fields: Option<Vec<IntrospectedField>>,
}

/// A field of an introspected type
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IntrospectedField {
    pub name: String,
    #[serde(default)]
    pub args: Option<Vec<InputValue>>,
    #[serde(rename = "type", default)]
    pub ty: Option<TypeRef>,
}

impl IntrospectedField {
    /// Whether the field declares at least one argument
    pub fn has_arguments(&self) -> bool {
        self.args.as_ref().is_some_and(|args| !args.is_empty())
    }
}

/// A field argument. Only its presence matters, so the name may be missing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InputValue {
    #[serde(default)]
    pub name: Option<String>,
}

/// A reference to the type of a field.
///
/// Besides the usual `kind`/`name`/`ofType` wrapping, a reference may carry its own `fields` or
/// `enumValues` when the producer inlines the referenced type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeRef {
    #[serde(default)]
    pub kind: Option<TypeKind>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub of_type: Option<Box<TypeRef>>,
    #[serde(default)]
    pub enum_values: Option<Vec<EnumValue>>,
    #[serde(default, deserialize_with = "skip_malformed_fields")]
    pub fields: Option<Vec<IntrospectedField>>,
}

fn skip_malformed_fields<'de, D>(
    deserializer: D,
) -> Result<Option<Vec<IntrospectedField>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Value>>::deserialize(deserializer)?.map(|fields| {
        fields
            .into_iter()
            .enumerate()
            .filter_map(|(index, raw)| {
                IntrospectedField::deserialize(raw)
                    .inspect_err(|error| {
                        warn!(index, %error, "Skipping malformed introspected field");
                    })
                    .ok()
            })
            .collect()
    }))
}

/// An enum value, either as the introspection object `{ "name": "ASC" }` or a bare `"ASC"`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum EnumValue {
    Named { name: String },
    Bare(String),
}

impl EnumValue {
    pub fn name(&self) -> &str {
        match self {
            EnumValue::Named { name } => name,
            EnumValue::Bare(name) => name,
        }
    }
}

/// The types of an introspected schema, in the order the endpoint returned them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntrospectedSchema {
    pub types: Vec<IntrospectedType>,
}

impl IntrospectedSchema {
    /// Read the schema from the `data` object of an introspection response.
    ///
    /// Type entries that do not deserialize are logged and skipped.
    pub fn from_data(data: &Value) -> Result<Self, SummaryError> {
        let types = data
            .get("__schema")
            .and_then(|schema| schema.get("types"))
            .and_then(Value::as_array)
            .ok_or(SummaryError::MalformedSchema)?;

        Ok(Self {
            types: types
                .iter()
                .enumerate()
                .filter_map(|(index, raw)| {
                    IntrospectedType::deserialize(raw)
                        .inspect_err(|error| {
                            warn!(index, %error, "Skipping malformed introspected type");
                        })
                        .ok()
                })
                .collect(),
        })
    }
}
