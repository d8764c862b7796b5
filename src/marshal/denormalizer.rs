//! Tree → typed instance.

use core::any::Any;
use std::sync::Arc;

use serde_json::Value;

use crate::access;
use crate::error::MarshalError;
use crate::marshal::{MarshalConfig, effective};
use crate::options::SerializerOptions;
use crate::registry::{BindingRegistry, PropertyBinding, TypeSelector};
use crate::value::PropValue;

// -----------------------------------------------------------------------------
// Denormalizer

/// Walks plain trees back into typed instances.
///
/// A call names its target as a [`TypeSelector`]: one concrete type — whose
/// registered [`SubTypes`](crate::SubTypes) descriptor, if any, redirects
/// through a discriminator field — or an ordered candidate list tried against
/// each candidate's registered predicate. The resolved type is instantiated
/// through its registered default factory and populated binding by binding.
///
/// # Examples
///
/// ```
/// use treebind::{BindingRegistry, Denormalizer, PropertyBinding, PropRef, TypeBindings,
///                TypeToken};
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
/// let denormalizer = Denormalizer::new(registry.into_shared());
/// let tag: Tag = denormalizer
///     .deserialize_as(TypeToken::of::<Tag>(), &json!({"label": "beta"}))
///     .unwrap()
///     .unwrap();
/// assert_eq!(tag.label.as_deref(), Some("beta"));
/// ```
pub struct Denormalizer {
    registry: Arc<BindingRegistry>,
    config: MarshalConfig,
}

impl Denormalizer {
    /// A denormalizer with the default [`MarshalConfig`].
    #[inline]
    pub fn new(registry: Arc<BindingRegistry>) -> Self {
        Self::with_config(registry, MarshalConfig::default())
    }

    /// A denormalizer with an explicit policy.
    #[inline]
    pub fn with_config(registry: Arc<BindingRegistry>, config: MarshalConfig) -> Self {
        Self { registry, config }
    }

    /// The policy this denormalizer applies.
    #[inline]
    pub fn config(&self) -> &MarshalConfig {
        &self.config
    }

    /// The binding registry this denormalizer reads.
    #[inline]
    pub fn registry(&self) -> &BindingRegistry {
        &self.registry
    }

    /// Denormalizes one tree; `Ok(None)` for null input.
    #[inline]
    pub fn deserialize(
        &self,
        selector: impl Into<TypeSelector>,
        data: &Value,
    ) -> Result<Option<Box<dyn Any>>, MarshalError> {
        self.deserialize_with(selector, data, &SerializerOptions::default())
    }

    /// Denormalizes one tree with per-call options.
    #[inline]
    pub fn deserialize_with(
        &self,
        selector: impl Into<TypeSelector>,
        data: &Value,
        options: &SerializerOptions,
    ) -> Result<Option<Box<dyn Any>>, MarshalError> {
        self.deserialize_dyn(&selector.into(), data, options)
    }

    /// Denormalizes one tree into a concrete `T`.
    ///
    /// Resolution yielding anything but `T` is a mismatch error.
    #[inline]
    pub fn deserialize_as<T: Any>(
        &self,
        selector: impl Into<TypeSelector>,
        data: &Value,
    ) -> Result<Option<T>, MarshalError> {
        self.deserialize_as_with(selector, data, &SerializerOptions::default())
    }

    /// Denormalizes one tree into a concrete `T`, with options.
    pub fn deserialize_as_with<T: Any>(
        &self,
        selector: impl Into<TypeSelector>,
        data: &Value,
        options: &SerializerOptions,
    ) -> Result<Option<T>, MarshalError> {
        match self.deserialize_with(selector, data, options)? {
            Some(instance) => match instance.downcast::<T>() {
                Ok(concrete) => Ok(Some(*concrete)),
                Err(_) => Err(MarshalError::Mismatched {
                    expected: core::any::type_name::<T>(),
                }),
            },
            None => Ok(None),
        }
    }

    /// Denormalizes an array element by element.
    ///
    /// Elements whose type resolution fails are dropped; null elements stay
    /// as `None` entries; the relative order of survivors is preserved. Any
    /// other failure aborts the whole batch.
    #[inline]
    pub fn deserialize_all(
        &self,
        selector: impl Into<TypeSelector>,
        data: &Value,
    ) -> Result<Vec<Option<Box<dyn Any>>>, MarshalError> {
        self.deserialize_all_with(selector, data, &SerializerOptions::default())
    }

    /// Denormalizes an array element by element, with options.
    pub fn deserialize_all_with(
        &self,
        selector: impl Into<TypeSelector>,
        data: &Value,
        options: &SerializerOptions,
    ) -> Result<Vec<Option<Box<dyn Any>>>, MarshalError> {
        let selector = selector.into();
        let Value::Array(items) = data else {
            return Err(MarshalError::NotAnArray {
                operation: "deserialize_all",
            });
        };

        let mut out = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            match self.deserialize_dyn(&selector, item, options) {
                Ok(instance) => out.push(instance),
                Err(err) if err.is_resolution_failure() => {
                    log::debug!("dropping element {index}: {err}");
                }
                Err(err) => return Err(err),
            }
        }
        Ok(out)
    }

    /// Denormalizes an array into concrete `T`s.
    #[inline]
    pub fn deserialize_all_as<T: Any>(
        &self,
        selector: impl Into<TypeSelector>,
        data: &Value,
    ) -> Result<Vec<Option<T>>, MarshalError> {
        self.deserialize_all_as_with(selector, data, &SerializerOptions::default())
    }

    /// Denormalizes an array into concrete `T`s, with options.
    pub fn deserialize_all_as_with<T: Any>(
        &self,
        selector: impl Into<TypeSelector>,
        data: &Value,
        options: &SerializerOptions,
    ) -> Result<Vec<Option<T>>, MarshalError> {
        let mut out = Vec::new();
        for instance in self.deserialize_all_with(selector, data, options)? {
            out.push(match instance {
                Some(boxed) => match boxed.downcast::<T>() {
                    Ok(concrete) => Some(*concrete),
                    Err(_) => {
                        return Err(MarshalError::Mismatched {
                            expected: core::any::type_name::<T>(),
                        });
                    }
                },
                None => None,
            });
        }
        Ok(out)
    }

    // The dynamic core: resolve, instantiate, populate.
    fn deserialize_dyn(
        &self,
        selector: &TypeSelector,
        data: &Value,
        options: &SerializerOptions,
    ) -> Result<Option<Box<dyn Any>>, MarshalError> {
        if data.is_null() {
            return Ok(None);
        }

        let token = self.resolve(selector, data)?;
        let Some(table) = self.registry.get(token.id()) else {
            return Err(MarshalError::NoMatchingType {
                context: format!("`{}`", token.name()),
            });
        };

        let mut instance = table.instantiate();
        for binding in table.bindings() {
            if binding.write_only {
                continue;
            }
            if !options.selects(&binding.groups) {
                continue;
            }

            let tree_value = access::get(data, &binding.field);
            match tree_value {
                None if !effective(
                    binding.denormalize_undefined,
                    self.config.denormalize_undefined,
                ) =>
                {
                    continue;
                }
                Some(Value::Null)
                    if !effective(binding.denormalize_null, self.config.denormalize_null) =>
                {
                    continue;
                }
                _ => {}
            }

            let value = self.unmarshal_prop(binding, tree_value, options)?;
            log::trace!(
                "denormalized `{}` from `{}`",
                binding.property_key,
                binding.field
            );
            binding.set_value(instance.as_mut(), value)?;
        }

        Ok(Some(instance))
    }

    // Resolves the concrete type to instantiate for `data`.
    fn resolve(
        &self,
        selector: &TypeSelector,
        data: &Value,
    ) -> Result<crate::registry::TypeToken, MarshalError> {
        match selector {
            TypeSelector::One(token) => {
                let Some(table) = self.registry.get(token.id()) else {
                    return Err(MarshalError::NoMatchingType {
                        context: format!("`{}`", token.name()),
                    });
                };
                let Some(sub_types) = &table.sub_types else {
                    return Ok(*token);
                };

                let tag = access::get(data, sub_types.field()).filter(|tag| !tag.is_null());
                let Some(tag) = tag else {
                    return Err(MarshalError::MissingDiscriminator {
                        field: sub_types.field().to_string(),
                    });
                };

                match tag.as_str().and_then(|tag| sub_types.resolve(tag)) {
                    Some(target) => self.resolve(&target(), data),
                    None => Err(MarshalError::NoMatchingType {
                        context: format!("discriminator value `{tag}` of `{}`", token.name()),
                    }),
                }
            }
            TypeSelector::Candidates(tokens) => {
                for candidate in tokens {
                    let Some(table) = self.registry.get(candidate.id()) else {
                        continue;
                    };
                    let Some(supports) = table.supports else {
                        continue;
                    };
                    if supports(data) {
                        return Ok(*candidate);
                    }
                }
                Err(MarshalError::NoMatchingType {
                    context: selector.describe(),
                })
            }
        }
    }

    // One surviving tree value, dispatched the way its binding declares.
    fn unmarshal_prop(
        &self,
        binding: &PropertyBinding,
        tree_value: Option<&Value>,
        options: &SerializerOptions,
    ) -> Result<PropValue, MarshalError> {
        if let Some(Value::Array(items)) = tree_value {
            if let Some(nested) = binding.nested {
                return self.deserialize_elements(&nested(), items, options);
            }
            if let Some(factory) = binding.converter {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(factory().from_tree(Some(item), self, options)?);
                }
                return Ok(PropValue::List(out));
            }
            return Ok(raw_prop(tree_value));
        }

        if let Some(nested) = binding.nested {
            if let Some(value) = tree_value {
                if !value.is_null() {
                    return match self.deserialize_dyn(&nested(), value, options)? {
                        Some(instance) => Ok(PropValue::Object(instance)),
                        None => Ok(PropValue::Null),
                    };
                }
            }
            // Null/absent nested values pass through untouched.
            return Ok(raw_prop(tree_value));
        }

        if let Some(factory) = binding.converter {
            return factory().from_tree(tree_value, self, options);
        }

        Ok(raw_prop(tree_value))
    }

    // A nested sequence: each element resolves independently, resolution
    // failures drop the element, null elements stay null.
    fn deserialize_elements(
        &self,
        selector: &TypeSelector,
        items: &[Value],
        options: &SerializerOptions,
    ) -> Result<PropValue, MarshalError> {
        let mut out = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            match self.deserialize_dyn(selector, item, options) {
                Ok(Some(instance)) => out.push(PropValue::Object(instance)),
                Ok(None) => out.push(PropValue::Null),
                Err(err) if err.is_resolution_failure() => {
                    log::debug!("dropping element {index}: {err}");
                }
                Err(err) => return Err(err),
            }
        }
        Ok(PropValue::List(out))
    }
}

fn raw_prop(tree_value: Option<&Value>) -> PropValue {
    match tree_value {
        None => PropValue::Missing,
        Some(Value::Null) => PropValue::Null,
        Some(value) => PropValue::Raw(value.clone()),
    }
}
