//! The `tag` attribute block shared by schema and external table resources.

use crate::sql::{SchemaObjectIdentifier, TagAssociation};
use serde::{Deserialize, Serialize};

/// One `tag` entry. Database and schema default to the tagged object's own
/// location when the caller passes one.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TagConfig {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub schema: Option<String>,
}

impl TagConfig {
    pub fn identifier(&self, database: &str, schema: &str) -> SchemaObjectIdentifier {
        let db = self.database.as_deref().filter(|s| !s.is_empty()).unwrap_or(database);
        let sc = self.schema.as_deref().filter(|s| !s.is_empty()).unwrap_or(schema);
        SchemaObjectIdentifier::new(db, sc, &self.name)
    }

    pub fn association(&self, database: &str, schema: &str) -> TagAssociation {
        TagAssociation::new(self.identifier(database, schema), &self.value)
    }
}

pub fn associations(tags: &[TagConfig], database: &str, schema: &str) -> Vec<TagAssociation> {
    tags.iter().map(|t| t.association(database, schema)).collect()
}

/// Tags to unset and tags to set when moving from `old` to `new`.
///
/// A tag is keyed by its resolved identifier. Removed tags are unset; added
/// tags and tags whose value changed are set.
pub fn diff(
    old: &[TagConfig],
    new: &[TagConfig],
    database: &str,
    schema: &str,
) -> (Vec<SchemaObjectIdentifier>, Vec<TagAssociation>) {
    let old = associations(old, database, schema);
    let new = associations(new, database, schema);

    let unset = old
        .iter()
        .filter(|o| !new.iter().any(|n| n.name == o.name))
        .map(|o| o.name.clone())
        .collect();
    let set = new
        .iter()
        .filter(|n| !old.iter().any(|o| o.name == n.name && o.value == n.value))
        .cloned()
        .collect();
    (unset, set)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(name: &str, value: &str) -> TagConfig {
        TagConfig {
            name: name.into(),
            value: value.into(),
            ..Default::default()
        }
    }

    #[test]
    fn identifier_defaults_to_object_location() {
        let t = tag("COST", "x");
        assert_eq!(t.identifier("DB", "SC").full_name(), r#""DB"."SC"."COST""#);

        let t = TagConfig {
            database: Some("GOV".into()),
            schema: Some("TAGS".into()),
            ..tag("COST", "x")
        };
        assert_eq!(t.identifier("DB", "SC").full_name(), r#""GOV"."TAGS"."COST""#);
    }

    #[test]
    fn diff_splits_removed_from_added_and_changed() {
        let old = vec![tag("A", "1"), tag("B", "2"), tag("C", "3")];
        let new = vec![tag("B", "2"), tag("C", "30"), tag("D", "4")];
        let (unset, set) = diff(&old, &new, "DB", "SC");

        assert_eq!(unset, vec![SchemaObjectIdentifier::new("DB", "SC", "A")]);
        let names: Vec<_> = set.iter().map(|t| t.name.name().to_string()).collect();
        assert_eq!(names, vec!["C", "D"]);
        assert_eq!(set[0].value, "30");
    }

    #[test]
    fn diff_of_identical_tags_is_empty() {
        let tags = vec![tag("A", "1")];
        let (unset, set) = diff(&tags, &tags, "DB", "SC");
        assert!(unset.is_empty());
        assert!(set.is_empty());
    }
}
