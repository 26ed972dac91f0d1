// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Recursive resource traversal.
//!
//! The visitor turns one resource into a [`Node`], descending into related
//! resources. With a registry it sideloads: every related node goes into
//! [`Included`] and the relationship keeps only its identifier. Without one
//! it embeds full nodes at every relationship site.

use crate::attr::encode_attribute;
use crate::error::{MarshalError, Result};
use crate::field::FieldValue;
use crate::id::encode_id;
use crate::included::Included;
use crate::node::{validate_links, Linkage, Links, Meta, Node, Relationship};
use crate::resource::Resource;
use crate::tag::{FieldTag, Role};
use tracing::trace;

pub(crate) struct Visitor<'r> {
    included: Option<&'r mut Included>,
    max_depth: usize,
}

impl<'r> Visitor<'r> {
    pub(crate) fn sideloading(included: &'r mut Included, max_depth: usize) -> Self {
        Self {
            included: Some(included),
            max_depth,
        }
    }

    pub(crate) fn embedding(max_depth: usize) -> Self {
        Self {
            included: None,
            max_depth,
        }
    }

    /// Build the node for `model`; a nil model yields no node.
    pub(crate) fn visit(&mut self, model: Option<&dyn Resource>) -> Result<Option<Node>> {
        self.visit_at(model, 0)
    }

    fn visit_at(&mut self, model: Option<&dyn Resource>, depth: usize) -> Result<Option<Node>> {
        let Some(model) = model else {
            return Ok(None);
        };
        if depth > self.max_depth {
            return Err(MarshalError::DepthLimitExceeded {
                max_depth: self.max_depth,
            });
        }

        let mut node = Node::default();
        for field in model.fields() {
            let tag = FieldTag::parse(field.tag)?;
            match tag.role {
                Role::Primary => {
                    node.id = encode_id(field.tag, &field.value)?;
                    node.resource_type = tag.name.to_owned();
                }
                Role::ClientId => {
                    node.client_id = client_id(field.tag, &field.value)?;
                }
                Role::Attribute => {
                    if let Some(value) = encode_attribute(field.tag, &field.value, tag.modifiers)? {
                        node.attributes.insert(tag.name.to_owned(), value);
                    }
                }
                Role::Relation => {
                    if let Some(rel) = self.relationship(model, &tag, field.tag, &field.value, depth)? {
                        node.relationships.insert(tag.name.to_owned(), rel);
                    }
                }
            }
        }

        if let Some(linkable) = model.as_linkable() {
            let links = linkable.jsonapi_links();
            validate_links(&links)?;
            node.links = Some(links);
        }
        if let Some(metable) = model.as_metable() {
            node.meta = Some(metable.jsonapi_meta());
        }

        trace!(
            resource_type = %node.resource_type,
            id = %node.id,
            depth,
            "visited resource"
        );
        Ok(Some(node))
    }

    fn relationship(
        &mut self,
        owner: &dyn Resource,
        tag: &FieldTag<'_>,
        raw_tag: &str,
        value: &FieldValue<'_>,
        depth: usize,
    ) -> Result<Option<Relationship>> {
        let omit_empty = tag.modifiers.omit_empty;
        match value {
            FieldValue::ToOne(None) => {
                if omit_empty {
                    return Ok(None);
                }
                Ok(Some(Relationship::One {
                    data: None,
                    links: None,
                    meta: None,
                }))
            }
            FieldValue::ToOne(Some(target)) => {
                let (links, meta) = relationship_extras(owner, tag.name)?;
                let data = self
                    .visit_at(Some(*target), depth + 1)?
                    .map(|node| self.link(node));
                Ok(Some(Relationship::One { data, links, meta }))
            }
            FieldValue::ToMany(targets) => {
                if omit_empty && targets.is_empty() {
                    return Ok(None);
                }
                let (links, meta) = relationship_extras(owner, tag.name)?;
                let mut data = Vec::with_capacity(targets.len());
                for target in targets {
                    if let Some(node) = self.visit_at(*target, depth + 1)? {
                        data.push(self.link(node));
                    }
                }
                Ok(Some(Relationship::Many { data, links, meta }))
            }
            _ => Err(MarshalError::malformed(
                raw_tag,
                "relation holds a non-relationship value",
            )),
        }
    }

    /// Sideload `node` and reference it, or embed it whole.
    fn link(&mut self, node: Node) -> Linkage {
        match self.included.as_deref_mut() {
            Some(included) => {
                let identifier = node.identifier();
                included.insert(node);
                Linkage::Identifier(identifier)
            }
            None => Linkage::Node(Box::new(node)),
        }
    }
}

fn client_id(tag: &str, value: &FieldValue<'_>) -> Result<Option<String>> {
    match value {
        FieldValue::Str(s) if !s.is_empty() => Ok(Some(s.to_string())),
        FieldValue::Str(_) | FieldValue::Null => Ok(None),
        FieldValue::Some(inner) => client_id(tag, inner),
        other => Err(MarshalError::UnsupportedIdentifierType {
            tag: tag.to_owned(),
            found: other.kind(),
        }),
    }
}

fn relationship_extras(owner: &dyn Resource, name: &str) -> Result<(Option<Links>, Option<Meta>)> {
    let links = owner
        .as_relationship_linkable()
        .and_then(|l| l.jsonapi_relationship_links(name));
    if let Some(links) = &links {
        validate_links(links)?;
    }
    let meta = owner
        .as_relationship_metable()
        .and_then(|m| m.jsonapi_relationship_meta(name));
    Ok((links, meta))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{Field, IntoFieldValue, IntoRelation};
    use serde_json::json;

    struct Tag {
        id: u32,
        label: String,
    }

    impl Resource for Tag {
        fn fields(&self) -> Vec<Field<'_>> {
            vec![
                Field::new("primary,tags", self.id.field_value()),
                Field::new("attr,label", self.label.field_value()),
            ]
        }
    }

    struct Article {
        id: i64,
        tags: Vec<Tag>,
        featured: Option<Tag>,
    }

    impl Resource for Article {
        fn fields(&self) -> Vec<Field<'_>> {
            vec![
                Field::new("primary,articles", self.id.field_value()),
                Field::new("relation,tags", self.tags.relation()),
                Field::new("relation,featured,omitempty", self.featured.relation()),
            ]
        }
    }

    fn article() -> Article {
        Article {
            id: 1,
            tags: vec![
                Tag { id: 1, label: "rust".into() },
                Tag { id: 2, label: "json".into() },
            ],
            featured: None,
        }
    }

    #[test]
    fn nil_model_yields_no_node() {
        let mut visitor = Visitor::embedding(8);
        assert!(visitor.visit(None).unwrap().is_none());
    }

    #[test]
    fn sideloading_replaces_nodes_with_identifiers() {
        let mut included = Included::new();
        let article = article();
        let node = Visitor::sideloading(&mut included, 8)
            .visit(Some(&article))
            .unwrap()
            .unwrap();
        assert_eq!(
            serde_json::to_value(&node.relationships["tags"]).unwrap(),
            json!({"data": [{"type": "tags", "id": "1"}, {"type": "tags", "id": "2"}]})
        );
        assert!(!node.relationships.contains_key("featured"));
        assert_eq!(included.len(), 2);
    }

    #[test]
    fn embedding_keeps_full_nodes() {
        let article = article();
        let node = Visitor::embedding(8).visit(Some(&article)).unwrap().unwrap();
        let data = node.relationships["tags"].data();
        assert!(matches!(data[0], Linkage::Node(n) if n.attributes["label"] == json!("rust")));
    }

    #[test]
    fn depth_bound_applies_below_the_root() {
        let article = article();
        let err = Visitor::embedding(0).visit(Some(&article)).unwrap_err();
        assert!(matches!(err, MarshalError::DepthLimitExceeded { max_depth: 0 }));
    }

    #[test]
    fn client_id_unwraps_optionals_and_skips_empty() {
        assert_eq!(client_id("client-id", &"".field_value()).unwrap(), None);
        assert_eq!(
            client_id("client-id", &Some("abc".to_string()).field_value()).unwrap(),
            Some("abc".to_string())
        );
        assert!(matches!(
            client_id("client-id", &5u8.field_value()),
            Err(MarshalError::UnsupportedIdentifierType { found: "u8", .. })
        ));
    }
}
