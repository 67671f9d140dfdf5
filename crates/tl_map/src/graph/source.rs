use std::sync::Arc;

use tl_reflect::Reflect;
use tl_reflect::ops::ReflectRef;

use super::{Backing, GraphNode, Identity, member_metadata};
use crate::coerce;
use crate::error::{Error, Result};
use crate::metadata::Metadata;
use crate::node::{Node, NodeIter};
use crate::shape::{Classification, TypeShape};

impl GraphNode<'_> {
    /// A child reading `value`, which already went through the shape's
    /// `unwrap`.
    fn child_source<'s>(
        &'s self,
        value: Option<&'s dyn Reflect>,
        shape: Arc<TypeShape>,
        name: String,
        path: String,
        metadata: Metadata,
        ancestors: Vec<Identity>,
    ) -> Box<dyn Node + 's> {
        Box::new(GraphNode {
            options: self.options,
            shape,
            name: Some(name),
            path,
            metadata,
            ancestors,
            backing: Backing::Source(value),
        })
    }

    /// The ancestor chain of this node's children.
    fn lineage(&self, value: &dyn Reflect) -> Vec<Identity> {
        let mut lineage = Vec::with_capacity(self.ancestors.len() + 1);
        lineage.extend_from_slice(&self.ancestors);
        lineage.push(Identity::of(value));
        lineage
    }

    /// Returns `true` if `value` already encloses this node.
    fn is_cyclic(lineage: &[Identity], value: Option<&dyn Reflect>) -> bool {
        value.is_some_and(|v| lineage.contains(&Identity::of(v)))
    }

    pub(super) fn member_children<'s>(&'s self, value: &'s dyn Reflect) -> Result<NodeIter<'s>> {
        let fields = value.as_struct().ok_or_else(|| self.unexpected(value))?;
        let lineage = self.lineage(value);

        let children = self.shape.members().iter().filter_map(move |member| {
            if !member.is_writable() {
                return None;
            }
            let shape = self.options.shapes().get(member.type_info());
            let field = shape.unwrap(fields.field_at(member.index())?);

            if member.is_optional() && !field.is_some_and(|field| self.has_value(field, &shape)) {
                return None;
            }
            if field.is_none() && !self.options.include_null_members() {
                return None;
            }
            let path = format!("{}.{}", self.path, member.external_name());
            if Self::is_cyclic(&lineage, field) {
                log::debug!("skipping self reference at `{path}`");
                return None;
            }

            Some(Ok(self.child_source(
                field,
                shape,
                member.external_name().to_owned(),
                path,
                member_metadata(member),
                lineage.clone(),
            )))
        });
        Ok(Box::new(children))
    }

    /// Whether `value` differs from an empty member: containers need an
    /// item, non-nullable scalars a value other than their type's default.
    fn has_value(&self, value: &dyn Reflect, shape: &TypeShape) -> bool {
        match value.reflect_ref() {
            ReflectRef::List(list) => return !list.is_empty(),
            ReflectRef::Map(map) => return !map.is_empty(),
            _ => {}
        }
        if shape.is_nullable() || shape.classification() != Classification::Simple {
            return true;
        }
        let Some(default) = shape.construct() else {
            return true;
        };
        let text = |value: &dyn Reflect| coerce::to_value(value, shape, self.options).ok();
        match (text(value), text(&*default)) {
            (Some(current), Some(default)) => current != default,
            _ => true,
        }
    }

    pub(super) fn item_children<'s>(&'s self, value: &'s dyn Reflect) -> Result<NodeIter<'s>> {
        let ReflectRef::List(list) = value.reflect_ref() else {
            return Err(self.unexpected(value));
        };
        let item_info = self
            .shape
            .element_info()
            .ok_or_else(|| self.unexpected(value))?;
        let shape = self.options.shapes().get(item_info);
        let name = self.item_name_for(&shape);
        let lineage = self.lineage(value);

        let children = list.iter().enumerate().filter_map(move |(index, item)| {
            let item = shape.unwrap(item);
            let path = format!("{}[{index}]", self.path);
            if Self::is_cyclic(&lineage, item) {
                log::debug!("skipping self reference at `{path}`");
                return None;
            }
            Some(Ok(self.child_source(
                item,
                Arc::clone(&shape),
                name.clone(),
                path,
                Metadata::new(),
                lineage.clone(),
            )))
        });
        Ok(Box::new(children))
    }

    pub(super) fn entry_children<'s>(&'s self, value: &'s dyn Reflect) -> Result<NodeIter<'s>> {
        let ReflectRef::Map(map) = value.reflect_ref() else {
            return Err(self.unexpected(value));
        };
        let (Some(key_info), Some(value_info)) = (self.shape.key_info(), self.shape.value_info())
        else {
            return Err(self.unexpected(value));
        };
        let key_shape = self.options.shapes().get(key_info);
        let shape = self.options.shapes().get(value_info);
        let lineage = self.lineage(value);

        let children = map.iter().filter_map(move |(key, entry)| {
            let key = match key_shape.unwrap(key) {
                Some(key) => coerce::to_value(key, &key_shape, self.options),
                None => Err(Error::ValueCannotBeNull {
                    type_path: key_shape.type_path(),
                }),
            };
            let key = match key {
                Ok(key) => key.to_string(),
                Err(err) => return Some(Err(err)),
            };

            let entry = shape.unwrap(entry);
            let path = format!("{}[\"{key}\"]", self.path);
            if Self::is_cyclic(&lineage, entry) {
                log::debug!("skipping self reference at `{path}`");
                return None;
            }
            Some(Ok(self.child_source(
                entry,
                Arc::clone(&shape),
                key,
                path,
                Metadata::new(),
                lineage.clone(),
            )))
        });
        Ok(Box::new(children))
    }
}
