//! Typed instance → tree.

use core::any::Any;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::access;
use crate::error::MarshalError;
use crate::marshal::{MarshalConfig, effective};
use crate::options::SerializerOptions;
use crate::registry::{BindingRegistry, PropertyBinding};
use crate::value::PropRef;

// -----------------------------------------------------------------------------
// Normalizer

/// Walks typed instances into plain trees through their binding tables.
///
/// The table is looked up by the instance's runtime [`TypeId`](core::any::TypeId);
/// a value whose type was never registered normalizes to an empty tree, not
/// an error. Nested typed fields and sequences re-enter the normalizer,
/// custom-converted fields go through their binding's converter.
///
/// # Examples
///
/// ```
/// use treebind::{BindingRegistry, Normalizer, PropertyBinding, PropRef, TypeBindings};
/// use serde_json::json;
///
/// #[derive(Default)]
/// struct Tag {
///     label: Option<String>,
/// }
///
/// let mut registry = BindingRegistry::new();
/// registry
///     .register(TypeBindings::of::<Tag>().binding(PropertyBinding::new(
///         "label",
///         |t: &Tag| PropRef::opt_scalar(&t.label),
///         |t: &mut Tag, value| {
///             t.label = value.opt_decode()?;
///             Ok(())
///         },
///     )))
///     .unwrap();
///
/// let normalizer = Normalizer::new(registry.into_shared());
/// let tag = Tag { label: Some("beta".to_string()) };
/// assert_eq!(normalizer.serialize(&tag).unwrap(), json!({"label": "beta"}));
/// ```
pub struct Normalizer {
    registry: Arc<BindingRegistry>,
    config: MarshalConfig,
}

impl Normalizer {
    /// A normalizer with the default [`MarshalConfig`].
    #[inline]
    pub fn new(registry: Arc<BindingRegistry>) -> Self {
        Self::with_config(registry, MarshalConfig::default())
    }

    /// A normalizer with an explicit policy.
    #[inline]
    pub fn with_config(registry: Arc<BindingRegistry>, config: MarshalConfig) -> Self {
        Self { registry, config }
    }

    /// The policy this normalizer applies.
    #[inline]
    pub fn config(&self) -> &MarshalConfig {
        &self.config
    }

    /// The binding registry this normalizer reads.
    #[inline]
    pub fn registry(&self) -> &BindingRegistry {
        &self.registry
    }

    /// Normalizes one instance.
    #[inline]
    pub fn serialize<T: Any>(&self, object: &T) -> Result<Value, MarshalError> {
        self.serialize_any(object, &SerializerOptions::default())
    }

    /// Normalizes one instance with per-call options.
    #[inline]
    pub fn serialize_with<T: Any>(
        &self,
        object: &T,
        options: &SerializerOptions,
    ) -> Result<Value, MarshalError> {
        self.serialize_any(object, options)
    }

    /// Normalizes a slice of instances into an array.
    #[inline]
    pub fn serialize_all<T: Any>(&self, objects: &[T]) -> Result<Value, MarshalError> {
        self.serialize_all_with(objects, &SerializerOptions::default())
    }

    /// Normalizes a slice of instances into an array, with options.
    pub fn serialize_all_with<T: Any>(
        &self,
        objects: &[T],
        options: &SerializerOptions,
    ) -> Result<Value, MarshalError> {
        let mut out = Vec::with_capacity(objects.len());
        for object in objects {
            out.push(self.serialize_any(object, options)?);
        }
        Ok(Value::Array(out))
    }

    /// Normalizes a type-erased instance by its runtime type.
    pub fn serialize_any(
        &self,
        object: &dyn Any,
        options: &SerializerOptions,
    ) -> Result<Value, MarshalError> {
        let mut result = Value::Object(Map::new());

        let Some(table) = self.registry.get(object.type_id()) else {
            log::debug!("no bindings registered for the value, producing an empty tree");
            return Ok(result);
        };

        for binding in table.bindings() {
            if binding.read_only {
                continue;
            }
            if !options.selects(&binding.groups) {
                continue;
            }

            let value = binding.get_value(object);
            match value {
                PropRef::Missing
                    if !effective(binding.normalize_undefined, self.config.normalize_undefined) =>
                {
                    continue;
                }
                PropRef::Null if !effective(binding.normalize_null, self.config.normalize_null) => {
                    continue;
                }
                value => {
                    if let Some(marshalled) = self.marshal_prop(binding, value, options)? {
                        log::trace!(
                            "normalized `{}` into `{}`",
                            binding.property_key,
                            binding.field
                        );
                        access::set(&mut result, &binding.field, marshalled);
                    }
                }
            }
        }

        Ok(result)
    }

    /// Normalizes a dynamic sequence into an array.
    ///
    /// The dynamic counterpart of [`serialize_all`](Self::serialize_all):
    /// fails with [`MarshalError::NotAnArray`] unless the value is a list.
    pub fn serialize_seq(
        &self,
        objects: PropRef<'_>,
        options: &SerializerOptions,
    ) -> Result<Value, MarshalError> {
        let PropRef::List(items) = objects else {
            return Err(MarshalError::NotAnArray {
                operation: "serialize_all",
            });
        };

        let mut out = Vec::with_capacity(items.len());
        for item in items {
            out.push(self.serialize_element(item, options)?);
        }
        Ok(Value::Array(out))
    }

    // One surviving property value, dispatched the way its binding declares.
    fn marshal_prop(
        &self,
        binding: &PropertyBinding,
        value: PropRef<'_>,
        options: &SerializerOptions,
    ) -> Result<Option<Value>, MarshalError> {
        if let PropRef::List(items) = value {
            let marshalled = if binding.nested.is_some() {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(self.serialize_element(item, options)?);
                }
                Value::Array(out)
            } else if let Some(factory) = binding.converter {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    let converted = factory().to_tree(item, self, options)?;
                    out.push(converted.unwrap_or(Value::Null));
                }
                Value::Array(out)
            } else {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(self.raw_tree(item, options)?);
                }
                Value::Array(out)
            };
            return Ok(Some(marshalled));
        }

        if binding.nested.is_some() {
            return self.serialize_element(value, options).map(Some);
        }
        if let Some(factory) = binding.converter {
            return factory().to_tree(value, self, options);
        }
        self.raw_tree(value, options).map(Some)
    }

    // An element governed by a nested type: objects recurse, null stays
    // null, anything untyped normalizes to an empty tree.
    fn serialize_element(
        &self,
        item: PropRef<'_>,
        options: &SerializerOptions,
    ) -> Result<Value, MarshalError> {
        match item {
            PropRef::Object(any) => self.serialize_any(any, options),
            PropRef::Null | PropRef::Missing => Ok(Value::Null),
            PropRef::Raw(_) | PropRef::List(_) => Ok(Value::Object(Map::new())),
        }
    }

    // A value written without coercion. Typed objects that still show up
    // here go through the registry, which yields an empty tree when the
    // type was never registered.
    fn raw_tree(
        &self,
        item: PropRef<'_>,
        options: &SerializerOptions,
    ) -> Result<Value, MarshalError> {
        match item {
            PropRef::Raw(value) => Ok(value),
            PropRef::Null | PropRef::Missing => Ok(Value::Null),
            PropRef::Object(any) => self.serialize_any(any, options),
            PropRef::List(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(self.raw_tree(item, options)?);
                }
                Ok(Value::Array(out))
            }
        }
    }
}
