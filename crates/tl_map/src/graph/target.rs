use std::sync::Arc;

use fixedbitset::FixedBitSet;
use tl_reflect::Reflect;
use tl_reflect::info::TypeInfo;
use tl_reflect::ops::ReflectMut;

use super::{Backing, Building, GraphNode, member_metadata};
use crate::coerce;
use crate::error::{Error, Result};
use crate::metadata::Metadata;
use crate::node::{Configure, Node, names_match};
use crate::options::Options;
use crate::shape::{Classification, TypeShape};
use crate::value::Value;

/// Creates an instance of the underlying type of `shape`, asking the
/// configured factory first.
fn create(shape: &TypeShape, options: &Options) -> Result<Box<dyn Reflect>> {
    let inner = shape.inner_info();
    options
        .factory()
        .and_then(|factory| factory(shape))
        .filter(|value| value.ty_id() == inner.ty_id())
        .or_else(|| shape.construct())
        .ok_or(Error::ObjectCreation {
            type_path: inner.type_path(),
        })
}

impl<'a> GraphNode<'a> {
    fn target_child(
        &self,
        info: &'static TypeInfo,
        name: &str,
        path: String,
        metadata: Metadata,
    ) -> GraphNode<'a> {
        GraphNode {
            options: self.options,
            shape: self.options.shapes().get(info),
            name: Some(name.to_owned()),
            path,
            metadata,
            ancestors: Vec::new(),
            backing: Backing::Target(Building::default()),
        }
    }

    /// Consumes a target node, returning its value as the declared type.
    ///
    /// Returns `None` if nothing was mapped onto the node, and for sources.
    pub fn finish(self) -> Result<Option<Box<dyn Reflect>>> {
        let Backing::Target(building) = self.backing else {
            return Ok(None);
        };
        match building.instance {
            Some(value) => self.shape.wrap(Some(value)).map(Some),
            None if building.null => self.shape.wrap(None).map(Some),
            None => Ok(None),
        }
    }

    /// Like [`finish`](Self::finish), but a node nothing was mapped onto
    /// yields null or a fresh instance.
    pub fn into_instance(self) -> Result<Box<dyn Reflect>> {
        let shape = Arc::clone(&self.shape);
        let options = self.options;
        match self.finish()? {
            Some(value) => Ok(value),
            None if shape.is_nullable() => shape.wrap(None),
            None => shape.wrap(Some(create(&shape, options)?)),
        }
    }

    fn building_mut(&mut self) -> Result<&mut dyn Reflect> {
        let type_path = self.shape.type_path();
        self.instance_mut()
            .ok_or(Error::ObjectCreation { type_path })
    }

    pub(super) fn prepare(&mut self) -> Result<()> {
        let Backing::Target(building) = &mut self.backing else {
            return Ok(());
        };
        if building.instance.is_none() {
            building.instance = Some(create(&self.shape, self.options)?);
        }
        if let Some(instance) = &mut building.instance
            && self.shape.classification() != Classification::Complex
        {
            match instance.reflect_mut() {
                ReflectMut::List(list) => list.clear(),
                ReflectMut::Map(map) => map.clear(),
                _ => {}
            }
        }
        building.null = false;
        building.supplied = FixedBitSet::with_capacity(self.shape.members().len());
        Ok(())
    }

    pub(super) fn check_supplied(&self) -> Result<()> {
        let Backing::Target(building) = &self.backing else {
            return Ok(());
        };
        let names: Vec<String> = self
            .shape
            .members()
            .iter()
            .enumerate()
            .filter(|(position, member)| {
                member.is_required() && member.is_readable() && !building.supplied.contains(*position)
            })
            .map(|(_, member)| member.external_name().to_owned())
            .collect();

        if names.is_empty() {
            Ok(())
        } else {
            Err(Error::MissingNode {
                path: self.path.clone(),
                names,
            })
        }
    }

    pub(super) fn add_member(
        &mut self,
        source: &dyn Node,
        configure: &mut Configure<'_>,
    ) -> Result<()> {
        let Some(name) = source.name() else {
            return Err(Error::UnnamedChild {
                path: self.path.clone(),
            });
        };
        let shape = Arc::clone(&self.shape);
        let Some((position, member)) = shape.member(name, self.options.case_sensitive_names())
        else {
            return Err(Error::UnrecognizedNode {
                path: self.path.clone(),
                name: name.to_owned(),
            });
        };
        if !member.is_readable() {
            log::debug!("`{}.{}` is never read", self.path, member.external_name());
            return Ok(());
        }

        let path = format!("{}.{}", self.path, member.external_name());
        let mut child = self.target_child(
            member.type_info(),
            member.external_name(),
            path,
            member_metadata(member),
        );
        configure(&mut child)?;

        if let Some(value) = child.finish()? {
            let type_path = shape.type_path();
            let field = self
                .building_mut()?
                .as_struct_mut()
                .and_then(|fields| fields.field_at_mut(member.index()))
                .ok_or(Error::ObjectCreation { type_path })?;
            field.set(value).map_err(|value| Error::ValueConversion {
                value: value.reflect_type_path().to_owned(),
                type_path: member.type_info().type_path(),
            })?;
        }

        if let Backing::Target(building) = &mut self.backing {
            building.supplied.grow(position + 1);
            building.supplied.insert(position);
        }
        Ok(())
    }

    pub(super) fn add_item(&mut self, source: &dyn Node, configure: &mut Configure<'_>) -> Result<()> {
        let type_path = self.shape.type_path();
        let item_info = self
            .shape
            .element_info()
            .ok_or(Error::ObjectCreation { type_path })?;
        let item_shape = self.options.shapes().get(item_info);
        let expected = self.item_name_for(&item_shape);

        // Graph items carry the name of their own type, which says nothing
        // about the target.
        if source.format() != super::FORMAT
            && let Some(name) = source.name()
            && !names_match(name, &expected, self.options.case_sensitive_names())
        {
            return Err(Error::UnrecognizedNode {
                path: self.path.clone(),
                name: name.to_owned(),
            });
        }

        let index = self
            .current()
            .and_then(|value| value.reflect_ref().as_list().map(|list| list.len()))
            .unwrap_or(0);
        let path = format!("{}[{index}]", self.path);
        let mut child = self.target_child(item_info, &expected, path, Metadata::new());
        configure(&mut child)?;
        let item = child.into_instance()?;

        let ReflectMut::List(list) = self.building_mut()?.reflect_mut() else {
            return Err(Error::ObjectCreation { type_path });
        };
        list.push(item).map_err(|item| Error::ValueConversion {
            value: item.reflect_type_path().to_owned(),
            type_path: item_info.type_path(),
        })
    }

    pub(super) fn add_entry(&mut self, source: &dyn Node, configure: &mut Configure<'_>) -> Result<()> {
        let type_path = self.shape.type_path();
        let (Some(key_info), Some(value_info)) = (self.shape.key_info(), self.shape.value_info())
        else {
            return Err(Error::ObjectCreation { type_path });
        };
        let Some(name) = source.name() else {
            return Err(Error::UnnamedChild {
                path: self.path.clone(),
            });
        };

        let key_shape = self.options.shapes().get(key_info);
        let key = key_shape.wrap(coerce::coerce(Value::from(name), &key_shape, self.options)?)?;

        let path = format!("{}[\"{name}\"]", self.path);
        let mut child = self.target_child(value_info, name, path, Metadata::new());
        configure(&mut child)?;
        let value = child.into_instance()?;

        let ReflectMut::Map(map) = self.building_mut()?.reflect_mut() else {
            return Err(Error::ObjectCreation { type_path });
        };
        map.insert_boxed(key, value).map_err(|(key, _)| Error::ValueConversion {
            value: key.reflect_type_path().to_owned(),
            type_path: key_info.type_path(),
        })
    }
}
