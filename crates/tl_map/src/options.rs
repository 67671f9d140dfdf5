use core::any::TypeId;
use core::fmt;
use std::sync::Arc;

use serde::Deserialize;
use tl_reflect::Reflect;
use tl_reflect::info::Typed;
use tl_utils::TypeIdMap;

use crate::convention::{MappingRegistry, VisitingRegistry};
use crate::error::BoxError;
use crate::naming::NamingConvention;
use crate::node::{Node, NodeType};
use crate::shape::{ShapeCache, ShapePolicy, TypeShape};
use crate::value::Value;

/// Creates backing instances before the type's own constructor is tried.
pub type ObjectFactory = dyn Fn(&TypeShape) -> Option<Box<dyn Reflect>> + Send + Sync;

// -----------------------------------------------------------------------------
// OptionsConfig

/// The plain settings of [`Options`], loadable from a configuration file.
///
/// Missing keys keep their defaults, unknown keys are an error.
///
/// ```
/// use tl_map::{NamingConvention, OptionsConfig};
///
/// let config: OptionsConfig = ron::from_str(
///     "(case_sensitive_enums: false, member_naming: PascalCase)",
/// ).unwrap();
///
/// assert!(!config.case_sensitive_enums);
/// assert!(config.case_sensitive_names);
/// assert_eq!(config.member_naming, NamingConvention::PascalCase);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OptionsConfig {
    /// Write members whose value is null.
    pub include_null_members: bool,
    /// Fail on document members the target type does not have.
    pub fail_on_unmatched_members: bool,
    /// Fail on sequence items whose name is not the expected item name.
    pub fail_on_unmatched_items: bool,
    pub case_sensitive_names: bool,
    pub case_sensitive_enums: bool,
    pub treat_list_impls_as_objects: bool,
    pub treat_map_impls_as_objects: bool,
    pub member_naming: NamingConvention,
    pub enum_naming: NamingConvention,
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            include_null_members: false,
            fail_on_unmatched_members: false,
            fail_on_unmatched_items: false,
            case_sensitive_names: true,
            case_sensitive_enums: true,
            treat_list_impls_as_objects: false,
            treat_map_impls_as_objects: false,
            member_naming: NamingConvention::AsIs,
            enum_naming: NamingConvention::AsIs,
        }
    }
}

impl OptionsConfig {
    fn policy(&self) -> ShapePolicy {
        ShapePolicy {
            member_naming: self.member_naming,
            treat_list_impls_as_objects: self.treat_list_impls_as_objects,
            treat_map_impls_as_objects: self.treat_map_impls_as_objects,
        }
    }
}

// -----------------------------------------------------------------------------
// Options

struct OptionsInner {
    config: OptionsConfig,
    messages: TypeIdMap<String>,
    factory: Option<Box<ObjectFactory>>,
    readers: MappingRegistry,
    writers: MappingRegistry,
    serialize_visitors: VisitingRegistry,
    deserialize_visitors: VisitingRegistry,
    shapes: ShapeCache,
}

/// Immutable mapping settings, cheap to clone and share between threads.
///
/// Each `Options` owns the [`ShapeCache`] matching its settings, so reuse
/// one value across calls instead of rebuilding it.
///
/// ```
/// use tl_map::{NamingConvention, Options};
///
/// let options = Options::builder()
///     .member_naming(NamingConvention::CamelCase)
///     .fail_on_unmatched_members(true)
///     .build();
///
/// assert!(options.fail_on_unmatched_members());
/// assert!(!options.include_null_members());
/// ```
#[derive(Clone)]
pub struct Options(Arc<OptionsInner>);

impl Default for Options {
    fn default() -> Self {
        OptionsBuilder::new().build()
    }
}

impl Options {
    #[inline]
    pub fn builder() -> OptionsBuilder {
        OptionsBuilder::new()
    }

    #[inline]
    pub fn config(&self) -> &OptionsConfig {
        &self.0.config
    }

    #[inline]
    pub fn include_null_members(&self) -> bool {
        self.0.config.include_null_members
    }

    #[inline]
    pub fn fail_on_unmatched_members(&self) -> bool {
        self.0.config.fail_on_unmatched_members
    }

    #[inline]
    pub fn fail_on_unmatched_items(&self) -> bool {
        self.0.config.fail_on_unmatched_items
    }

    #[inline]
    pub fn case_sensitive_names(&self) -> bool {
        self.0.config.case_sensitive_names
    }

    #[inline]
    pub fn case_sensitive_enums(&self) -> bool {
        self.0.config.case_sensitive_enums
    }

    #[inline]
    pub fn member_naming(&self) -> NamingConvention {
        self.0.config.member_naming
    }

    #[inline]
    pub fn enum_naming(&self) -> NamingConvention {
        self.0.config.enum_naming
    }

    /// The shapes computed under these options.
    #[inline]
    pub fn shapes(&self) -> &ShapeCache {
        &self.0.shapes
    }

    /// The end-user message template registered for a type.
    pub fn friendly_template(&self, type_id: TypeId) -> Option<&str> {
        self.0.messages.get(&type_id).map(String::as_str)
    }

    #[inline]
    pub fn factory(&self) -> Option<&ObjectFactory> {
        self.0.factory.as_deref()
    }

    /// Conventions consulted while deserializing.
    #[inline]
    pub fn readers(&self) -> &MappingRegistry {
        &self.0.readers
    }

    /// Conventions consulted while serializing.
    #[inline]
    pub fn writers(&self) -> &MappingRegistry {
        &self.0.writers
    }

    #[inline]
    pub fn serialize_visitors(&self) -> &VisitingRegistry {
        &self.0.serialize_visitors
    }

    #[inline]
    pub fn deserialize_visitors(&self) -> &VisitingRegistry {
        &self.0.deserialize_visitors
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("config", &self.0.config)
            .field("readers", &self.0.readers)
            .field("writers", &self.0.writers)
            .field("serialize_visitors", &self.0.serialize_visitors)
            .field("deserialize_visitors", &self.0.deserialize_visitors)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// OptionsBuilder

macro_rules! impl_flag_setters {
    ($($(#[$meta:meta])* $name:ident: $ty:ty),+ $(,)?) => {
        $(
            $(#[$meta])*
            #[inline]
            pub fn $name(mut self, value: $ty) -> Self {
                self.config.$name = value;
                self
            }
        )+
    };
}

/// Builds [`Options`].
#[derive(Default)]
pub struct OptionsBuilder {
    config: OptionsConfig,
    messages: TypeIdMap<String>,
    factory: Option<Box<ObjectFactory>>,
    readers: MappingRegistry,
    writers: MappingRegistry,
    serialize_visitors: VisitingRegistry,
    deserialize_visitors: VisitingRegistry,
}

impl From<OptionsConfig> for OptionsBuilder {
    fn from(config: OptionsConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }
}

impl OptionsBuilder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    impl_flag_setters! {
        include_null_members: bool,
        fail_on_unmatched_members: bool,
        fail_on_unmatched_items: bool,
        case_sensitive_names: bool,
        case_sensitive_enums: bool,
        /// Map custom list types that declare members as objects.
        treat_list_impls_as_objects: bool,
        /// Map custom map types that declare members as objects.
        treat_map_impls_as_objects: bool,
        member_naming: NamingConvention,
        enum_naming: NamingConvention,
    }

    /// Overrides the end-user message used when text fails to parse as `T`.
    ///
    /// The template may use `{value}` and `{type}`.
    pub fn friendly_message<T: Typed>(mut self, template: impl Into<String>) -> Self {
        self.messages.insert(T::type_info().ty_id(), template.into());
        self
    }

    /// Sets the factory tried before a type's own constructor.
    pub fn factory<F>(mut self, factory: F) -> Self
    where
        F: Fn(&TypeShape) -> Option<Box<dyn Reflect>> + Send + Sync + 'static,
    {
        self.factory = Some(Box::new(factory));
        self
    }

    // -------------------------------------------------------------------------
    // untyped conventions

    /// Adds a deserialization override for node pairs matching `predicate`.
    pub fn read_node<P, A>(mut self, predicate: P, action: A) -> Self
    where
        P: Fn(&dyn Node, &dyn Node) -> bool + Send + Sync + 'static,
        A: Fn(&dyn Node, &mut dyn Node) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.readers.add(predicate, action);
        self
    }

    /// Like [`read_node`](Self::read_node), consulted after all regular readers.
    pub fn read_fallback<P, A>(mut self, predicate: P, action: A) -> Self
    where
        P: Fn(&dyn Node, &dyn Node) -> bool + Send + Sync + 'static,
        A: Fn(&dyn Node, &mut dyn Node) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.readers.add_fallback(predicate, action);
        self
    }

    /// Adds a serialization override for node pairs matching `predicate`.
    pub fn write_node<P, A>(mut self, predicate: P, action: A) -> Self
    where
        P: Fn(&dyn Node, &dyn Node) -> bool + Send + Sync + 'static,
        A: Fn(&dyn Node, &mut dyn Node) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.writers.add(predicate, action);
        self
    }

    /// Like [`write_node`](Self::write_node), consulted after all regular writers.
    pub fn write_fallback<P, A>(mut self, predicate: P, action: A) -> Self
    where
        P: Fn(&dyn Node, &dyn Node) -> bool + Send + Sync + 'static,
        A: Fn(&dyn Node, &mut dyn Node) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.writers.add_fallback(predicate, action);
        self
    }

    /// Adds a hook run after each serialized node pair matching `predicate`.
    pub fn visit_serialized_node<P, A>(mut self, predicate: P, action: A) -> Self
    where
        P: Fn(&dyn Node, &dyn Node) -> bool + Send + Sync + 'static,
        A: Fn(&dyn Node, &mut dyn Node) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.serialize_visitors.add(predicate, action);
        self
    }

    /// Adds a hook run after each deserialized node pair matching `predicate`.
    pub fn visit_deserialized_node<P, A>(mut self, predicate: P, action: A) -> Self
    where
        P: Fn(&dyn Node, &dyn Node) -> bool + Send + Sync + 'static,
        A: Fn(&dyn Node, &mut dyn Node) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.deserialize_visitors.add(predicate, action);
        self
    }

    // -------------------------------------------------------------------------
    // typed conventions

    /// Reads every `T` (or `Option<T>`) with `read` instead of the default.
    ///
    /// ```
    /// use tl_map::Options;
    ///
    /// let options = Options::builder()
    ///     .read_value::<bool, _>(|value| Ok(value.to_string() == "yes"))
    ///     .build();
    /// assert_eq!(options.readers().len(), 1);
    /// ```
    pub fn read_value<T, F>(self, read: F) -> Self
    where
        T: Reflect + Typed,
        F: Fn(&Value) -> Result<T, BoxError> + Send + Sync + 'static,
    {
        self.read_node(
            |_, target| target.shape().is_some_and(|s| s.inner_info().type_is::<T>()),
            move |source, target| {
                let value = read(&source.value()?)?;
                target.set_instance(Box::new(value))?;
                Ok(())
            },
        )
    }

    /// Writes every `T` with `write` instead of the default.
    pub fn write_value<T, F>(self, write: F) -> Self
    where
        T: Reflect,
        F: Fn(&T) -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        self.write_node(
            |source, _| source.instance().is_some_and(|v| v.is::<T>()),
            move |source, target| {
                let Some(value) = source.instance().and_then(|v| v.downcast_ref::<T>()) else {
                    return Ok(());
                };
                let value = write(value)?;
                if target.node_type() == NodeType::Variable {
                    target.set_node_type(NodeType::Value)?;
                }
                target.set_value(value)?;
                Ok(())
            },
        )
    }

    /// Runs `visit` after every `T` has been written to its target node.
    pub fn visit_serialized<T, F>(self, visit: F) -> Self
    where
        T: Reflect,
        F: Fn(&T, &mut dyn Node) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.visit_serialized_node(
            |source, _| source.instance().is_some_and(|v| v.is::<T>()),
            move |source, target| match source.instance().and_then(|v| v.downcast_ref::<T>()) {
                Some(value) => visit(value, target),
                None => Ok(()),
            },
        )
    }

    /// Runs `visit` on every `T` once it has been read.
    pub fn visit_deserialized<T, F>(self, visit: F) -> Self
    where
        T: Reflect,
        F: Fn(&mut T) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.visit_deserialized_node(
            |_, target| target.instance().is_some_and(|v| v.is::<T>()),
            move |_, target| match target.instance_mut().and_then(|v| v.downcast_mut::<T>()) {
                Some(value) => visit(value),
                None => Ok(()),
            },
        )
    }

    pub fn build(self) -> Options {
        let shapes = ShapeCache::new(self.config.policy());
        Options(Arc::new(OptionsInner {
            config: self.config,
            messages: self.messages,
            factory: self.factory,
            readers: self.readers,
            writers: self.writers,
            serialize_visitors: self.serialize_visitors,
            deserialize_visitors: self.deserialize_visitors,
            shapes,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::{OptionsBuilder, OptionsConfig};
    use crate::NamingConvention;

    #[test]
    fn config_from_ron_keeps_defaults() {
        let config: OptionsConfig = ron::from_str(
            "(
                include_null_members: true,
                fail_on_unmatched_items: true,
                enum_naming: KebabCase,
            )",
        )
        .unwrap();

        let options = OptionsBuilder::from(config).build();
        assert!(options.include_null_members());
        assert!(options.fail_on_unmatched_items());
        assert!(!options.fail_on_unmatched_members());
        assert!(options.case_sensitive_names());
        assert_eq!(options.enum_naming(), NamingConvention::KebabCase);
        assert_eq!(options.shapes().policy().member_naming, NamingConvention::AsIs);
    }

    #[test]
    fn unknown_config_keys_are_rejected() {
        let config = ron::from_str::<OptionsConfig>("(colour: true)");
        assert!(config.is_err());
    }
}
