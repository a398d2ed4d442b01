//! Sorts introspected types into query categories.
//!
//! The default rules follow the naming convention of generated subgraph schemas: a singular
//! entity name with arguments is a lookup of one entity, a plural name without arguments is a
//! list query. Other conventions can be plugged in with [`Classifier::new`].

use crate::extract::{FieldInfo, extract_fields};
use crate::introspection::IntrospectedType;
use indexmap::IndexMap;
use tracing::debug;

const META_PREFIX: &str = "__";
const PLURAL_SUFFIX: char = 's';

/// The categories an entity can be classified into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Lookups of a single entity, requiring arguments such as an ID
    SpecificEntityQueries,
    /// Queries returning a list of entities, with optional arguments
    ListEntityQueries,
    /// Everything outside the singular/plural convention
    OtherEntities,
}

/// A rule assigning entities to a category
pub trait ClassificationRule: Send + Sync {
    /// The category of the entities this rule matches
    fn category(&self) -> Category;

    /// Whether the rule matches an entity
    fn matches(&self, entity_name: &str, args_required: bool) -> bool;
}

/// Singular entity names whose fields take arguments
#[derive(Debug, Clone, Copy, Default)]
pub struct SingularWithArguments;

impl ClassificationRule for SingularWithArguments {
    fn category(&self) -> Category {
        Category::SpecificEntityQueries
    }

    fn matches(&self, entity_name: &str, args_required: bool) -> bool {
        !entity_name.ends_with(PLURAL_SUFFIX) && args_required
    }
}

/// Plural entity names whose fields take no arguments
#[derive(Debug, Clone, Copy, Default)]
pub struct PluralWithoutArguments;

impl ClassificationRule for PluralWithoutArguments {
    fn category(&self) -> Category {
        Category::ListEntityQueries
    }

    fn matches(&self, entity_name: &str, args_required: bool) -> bool {
        entity_name.ends_with(PLURAL_SUFFIX) && !args_required
    }
}

/// Entities of one category, keyed by name, in schema order
pub type Bucket = IndexMap<String, Vec<FieldInfo>>;

/// The entities of a schema, split by category
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedSchema {
    pub specific_entity_queries: Bucket,
    pub list_entity_queries: Bucket,
    pub other_entities: Bucket,
}

impl ClassifiedSchema {
    pub fn bucket(&self, category: Category) -> &Bucket {
        match category {
            Category::SpecificEntityQueries => &self.specific_entity_queries,
            Category::ListEntityQueries => &self.list_entity_queries,
            Category::OtherEntities => &self.other_entities,
        }
    }

    fn bucket_mut(&mut self, category: Category) -> &mut Bucket {
        match category {
            Category::SpecificEntityQueries => &mut self.specific_entity_queries,
            Category::ListEntityQueries => &mut self.list_entity_queries,
            Category::OtherEntities => &mut self.other_entities,
        }
    }

    /// Whether no entity was classified
    pub fn is_empty(&self) -> bool {
        self.specific_entity_queries.is_empty()
            && self.list_entity_queries.is_empty()
            && self.other_entities.is_empty()
    }
}

/// Classifies types using an ordered list of rules. The first matching rule wins; entities
/// matching no rule are [`Category::OtherEntities`].
pub struct Classifier {
    rules: Vec<Box<dyn ClassificationRule>>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(vec![
            Box::new(SingularWithArguments),
            Box::new(PluralWithoutArguments),
        ])
    }
}

impl Classifier {
    pub fn new(rules: Vec<Box<dyn ClassificationRule>>) -> Self {
        Self { rules }
    }

    /// The category of an entity
    pub fn category(&self, entity_name: &str, args_required: bool) -> Category {
        self.rules
            .iter()
            .find(|rule| rule.matches(entity_name, args_required))
            .map(|rule| rule.category())
            .unwrap_or(Category::OtherEntities)
    }

    /// Classify every type with at least one queryable field.
    ///
    /// Meta types (`__Schema`, `__Type`, ...) are skipped. If a name appears more than once, the
    /// last definition replaces the earlier one in its bucket.
    pub fn classify<'a>(
        &self,
        types: impl IntoIterator<Item = &'a IntrospectedType>,
    ) -> ClassifiedSchema {
        let mut classified = ClassifiedSchema::default();
        for introspected_type in types {
            let entity_name = introspected_type.name.as_str();
            if entity_name.starts_with(META_PREFIX) {
                continue;
            }

            let extraction = extract_fields(introspected_type);
            if extraction.fields.is_empty() {
                continue;
            }

            let category = self.category(entity_name, extraction.args_required);
            debug!(
                entity = entity_name,
                ?category,
                fields = extraction.fields.len(),
                "Classified entity"
            );
            classified
                .bucket_mut(category)
                .insert(entity_name.to_string(), extraction.fields);
        }
        classified
    }
}

/// Classify types with the default naming-convention rules
pub fn classify(types: &[IntrospectedType]) -> ClassifiedSchema {
    Classifier::default().classify(types)
}
