//! Extracts the queryable fields of an introspected type.
//!
//! Fields are visited depth-first in declaration order. A field whose type carries its own
//! `fields` is followed immediately by the fields of that type. Internal fields (see
//! [`is_queryable_field`]) are dropped along with anything nested below them.

use crate::introspection::{IntrospectedField, IntrospectedType};
use std::collections::HashSet;
use std::slice;
use tracing::trace;

const TYPENAME_FIELD: &str = "__typename";
const FILTER_SUFFIX: &str = "_filter";
const ORDER_BY_SUFFIX: &str = "_orderBy";

/// A queryable field, with the values of its enum type if it has any
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInfo {
    pub name: String,
    pub enum_values: Option<Vec<String>>,
}

impl FieldInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enum_values: None,
        }
    }

    pub fn with_enum_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_values = Some(values.into_iter().map(Into::into).collect());
        self
    }
}

impl From<&IntrospectedField> for FieldInfo {
    fn from(field: &IntrospectedField) -> Self {
        let enum_values = field
            .ty
            .as_ref()
            .and_then(|ty| ty.enum_values.as_ref())
            .filter(|values| !values.is_empty())
            .map(|values| values.iter().map(|value| value.name().to_string()).collect());
        Self {
            name: field.name.clone(),
            enum_values,
        }
    }
}

/// The result of extracting the fields of a type
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldExtraction {
    /// The queryable fields, parents before their nested fields
    pub fields: Vec<FieldInfo>,

    /// Whether any extracted field, at any depth, declares arguments
    pub args_required: bool,
}

/// Extract the queryable fields of a schema type
pub fn extract_fields(introspected_type: &IntrospectedType) -> FieldExtraction {
    walk(
        Some(introspected_type.name.as_str()),
        introspected_type.fields.as_deref(),
    )
}

/// Whether a field is exposed to users, as opposed to being an internal or meta field.
///
/// Lower-case-only names are treated as internal. A name is lower-case when it has at least one
/// cased character and no upper-case ones, so `amount0` is lower-case and `_0` is not.
pub fn is_queryable_field(name: &str) -> bool {
    name != TYPENAME_FIELD
        && !name.ends_with(FILTER_SUFFIX)
        && !name.ends_with(ORDER_BY_SUFFIX)
        && !is_lowercase(name)
}

fn is_lowercase(name: &str) -> bool {
    name.chars().any(char::is_lowercase) && !name.chars().any(char::is_uppercase)
}

struct Frame<'a> {
    fields: slice::Iter<'a, IntrospectedField>,
    /// The type name this frame added to the current path, removed again when the frame ends
    expanded_type: Option<&'a str>,
}

fn walk<'a>(
    root_name: Option<&'a str>,
    root_fields: Option<&'a [IntrospectedField]>,
) -> FieldExtraction {
    let mut extraction = FieldExtraction::default();

    // Type names on the path from the root to the current frame. A type is not expanded again
    // below itself, which bounds the walk on self-referencing schemas.
    let mut path: HashSet<&'a str> = root_name.into_iter().collect();
    let mut stack = vec![Frame {
        fields: root_fields.unwrap_or_default().iter(),
        expanded_type: None,
    }];

    while let Some(frame) = stack.last_mut() {
        let Some(field) = frame.fields.next() else {
            if let Some(type_name) = frame.expanded_type {
                path.remove(type_name);
            }
            stack.pop();
            continue;
        };

        if !is_queryable_field(&field.name) {
            continue;
        }

        extraction.fields.push(FieldInfo::from(field));
        if field.has_arguments() {
            extraction.args_required = true;
        }

        let nested = field.ty.as_ref().and_then(|ty| {
            ty.fields
                .as_deref()
                .filter(|fields| !fields.is_empty())
                .map(|fields| (ty.name.as_deref(), fields))
        });
        if let Some((type_name, nested_fields)) = nested {
            if type_name.is_some_and(|name| !path.insert(name)) {
                trace!(
                    field = %field.name,
                    ?type_name,
                    "Not expanding a type already on the current path"
                );
                continue;
            }
            stack.push(Frame {
                fields: nested_fields.iter(),
                expanded_type: type_name,
            });
        }
    }

    extraction
}
