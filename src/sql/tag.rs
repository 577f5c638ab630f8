//! Tag associations shared by objects that carry `WITH TAG` / `SET TAG`.

use crate::error::OptionsError;
use crate::sql::builder::quoted_literal;
use crate::sql::identifier::SchemaObjectIdentifier;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagAssociation {
    pub name: SchemaObjectIdentifier,
    pub value: String,
}

impl TagAssociation {
    pub fn new(name: SchemaObjectIdentifier, value: impl Into<String>) -> Self {
        TagAssociation {
            name,
            value: value.into(),
        }
    }

    fn render(&self) -> String {
        format!("{} = {}", self.name.full_name(), quoted_literal(&self.value))
    }
}

pub fn validate_tags(tags: &[TagAssociation]) -> Result<(), OptionsError> {
    for t in tags {
        t.name
            .validate()
            .map_err(|e| OptionsError::Invalid(format!("tag: {}", e)))?;
    }
    Ok(())
}

pub fn validate_unset_tags(tags: &[SchemaObjectIdentifier]) -> Result<(), OptionsError> {
    for t in tags {
        t.validate()
            .map_err(|e| OptionsError::Invalid(format!("tag: {}", e)))?;
    }
    Ok(())
}

/// `WITH TAG (a = 'x', b = 'y')`, empty when no tags.
pub fn with_tag_clause(tags: &[TagAssociation]) -> String {
    if tags.is_empty() {
        return String::new();
    }
    let items: Vec<String> = tags.iter().map(TagAssociation::render).collect();
    format!("WITH TAG ({})", items.join(", "))
}

/// `SET TAG a = 'x', b = 'y'`.
pub fn set_tag_clause(tags: &[TagAssociation]) -> String {
    let items: Vec<String> = tags.iter().map(TagAssociation::render).collect();
    format!("SET TAG {}", items.join(", "))
}

/// `UNSET TAG a, b`.
pub fn unset_tag_clause(tags: &[SchemaObjectIdentifier]) -> String {
    let items: Vec<String> = tags.iter().map(SchemaObjectIdentifier::full_name).collect();
    format!("UNSET TAG {}", items.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(name: &str, value: &str) -> TagAssociation {
        TagAssociation::new(SchemaObjectIdentifier::new("DB", "SC", name), value)
    }

    #[test]
    fn with_tag_is_empty_without_tags() {
        assert_eq!(with_tag_clause(&[]), "");
    }

    #[test]
    fn renders_set_and_unset() {
        let tags = vec![tag("COST", "eng"), tag("PII", "it's")];
        assert_eq!(
            with_tag_clause(&tags),
            "WITH TAG (\"DB\".\"SC\".\"COST\" = 'eng', \"DB\".\"SC\".\"PII\" = 'it\\'s')"
        );
        assert_eq!(set_tag_clause(&tags[..1]), "SET TAG \"DB\".\"SC\".\"COST\" = 'eng'");
        assert_eq!(
            unset_tag_clause(&[tags[0].name.clone(), tags[1].name.clone()]),
            "UNSET TAG \"DB\".\"SC\".\"COST\", \"DB\".\"SC\".\"PII\""
        );
    }
}
