//! Renders a classified schema as plain text for an LLM agent.

use crate::classify::{Bucket, Category, ClassifiedSchema};
use crate::extract::FieldInfo;

const SPECIFIC_EXAMPLE: &str = r#"{
    entityName(id: "specific_id") {
        fieldName1
        fieldName2
        ...
    }
}"#;

const LIST_EXAMPLE: &str = r#"{
    entityNames(first: 10, orderBy: "someField", orderDirection: "asc") {
        fieldName1
        fieldName2
        ...
    }
}"#;

struct Section {
    category: Category,
    label: &'static str,
    description: &'static str,
    example: &'static str,
}

const SECTIONS: [Section; 3] = [
    Section {
        category: Category::SpecificEntityQueries,
        label: "Specific Entity Queries (Requires Arguments)",
        description: "These queries target a singular entity and require specific arguments (like an ID) to fetch data.",
        example: SPECIFIC_EXAMPLE,
    },
    Section {
        category: Category::ListEntityQueries,
        label: "List Entity Queries (Optional Arguments)",
        description: "These queries fetch a list of entities. They don't strictly require arguments but often accept optional parameters for filtering, sorting, and pagination.",
        example: LIST_EXAMPLE,
    },
    Section {
        category: Category::OtherEntities,
        label: "Other Entities",
        description: "These are additional entities that may not fit the conventional singular/plural querying pattern of subgraphs.",
        example: "",
    },
];

/// Render all three categories, in a fixed order, with a breakdown of every entity's fields
pub fn render(schema: &ClassifiedSchema) -> String {
    SECTIONS
        .iter()
        .map(|section| format_section(section, schema.bucket(section.category)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_section(section: &Section, entities: &Bucket) -> String {
    let mut lines = vec![
        format!("Category: {}", section.label),
        format!("Description: {}", section.description),
        "Generic Example:".to_string(),
        section.example.to_string(),
        "\nDetailed Breakdown:".to_string(),
    ];

    for (entity, fields) in entities {
        lines.push(format!("  Entity: {entity}"));
        lines.extend(fields.iter().map(format_field));
        lines.push(String::new());
    }

    lines.push(String::new());
    lines.join("\n")
}

fn format_field(field: &FieldInfo) -> String {
    match &field.enum_values {
        Some(values) => format!("    - {} (Enum values: {})", field.name, values.join(", ")),
        None => format!("    - {}", field.name),
    }
}
