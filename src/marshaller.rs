//! The serialize/deserialize facade.

use core::any::Any;

use serde_json::Value;

use crate::error::{BuildError, MarshalError};
use crate::marshal::{Denormalizer, Normalizer};
use crate::options::SerializerOptions;
use crate::registry::TypeSelector;
use crate::value::PropRef;

// -----------------------------------------------------------------------------
// Marshaller

/// One [`Normalizer`] and one [`Denormalizer`] behind a single surface.
///
/// Every call is pure delegation with options forwarding; the facade adds no
/// logic of its own. Use [`Marshaller::builder`] when the collaborators are
/// wired up optionally — construction fails if either is absent.
///
/// # Examples
///
/// ```
/// use treebind::{BindingRegistry, Denormalizer, Marshaller, Normalizer};
///
/// let registry = BindingRegistry::new().into_shared();
/// let marshaller = Marshaller::builder()
///     .normalizer(Normalizer::new(registry.clone()))
///     .denormalizer(Denormalizer::new(registry))
///     .build()
///     .unwrap();
/// # let _ = marshaller;
/// ```
pub struct Marshaller {
    normalizer: Normalizer,
    denormalizer: Denormalizer,
}

impl Marshaller {
    /// Composes a facade from both collaborators.
    #[inline]
    pub fn new(normalizer: Normalizer, denormalizer: Denormalizer) -> Self {
        Self {
            normalizer,
            denormalizer,
        }
    }

    /// Starts an empty builder.
    #[inline]
    pub fn builder() -> MarshallerBuilder {
        MarshallerBuilder::default()
    }

    /// The composed normalizer.
    #[inline]
    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// The composed denormalizer.
    #[inline]
    pub fn denormalizer(&self) -> &Denormalizer {
        &self.denormalizer
    }

    /// See [`Normalizer::serialize`].
    #[inline]
    pub fn serialize<T: Any>(&self, object: &T) -> Result<Value, MarshalError> {
        self.normalizer.serialize(object)
    }

    /// See [`Normalizer::serialize_with`].
    #[inline]
    pub fn serialize_with<T: Any>(
        &self,
        object: &T,
        options: &SerializerOptions,
    ) -> Result<Value, MarshalError> {
        self.normalizer.serialize_with(object, options)
    }

    /// See [`Normalizer::serialize_any`].
    #[inline]
    pub fn serialize_any(
        &self,
        object: &dyn Any,
        options: &SerializerOptions,
    ) -> Result<Value, MarshalError> {
        self.normalizer.serialize_any(object, options)
    }

    /// See [`Normalizer::serialize_all`].
    #[inline]
    pub fn serialize_all<T: Any>(&self, objects: &[T]) -> Result<Value, MarshalError> {
        self.normalizer.serialize_all(objects)
    }

    /// See [`Normalizer::serialize_all_with`].
    #[inline]
    pub fn serialize_all_with<T: Any>(
        &self,
        objects: &[T],
        options: &SerializerOptions,
    ) -> Result<Value, MarshalError> {
        self.normalizer.serialize_all_with(objects, options)
    }

    /// See [`Normalizer::serialize_seq`].
    #[inline]
    pub fn serialize_seq(
        &self,
        objects: PropRef<'_>,
        options: &SerializerOptions,
    ) -> Result<Value, MarshalError> {
        self.normalizer.serialize_seq(objects, options)
    }

    /// See [`Denormalizer::deserialize`].
    #[inline]
    pub fn deserialize(
        &self,
        selector: impl Into<TypeSelector>,
        data: &Value,
    ) -> Result<Option<Box<dyn Any>>, MarshalError> {
        self.denormalizer.deserialize(selector, data)
    }

    /// See [`Denormalizer::deserialize_with`].
    #[inline]
    pub fn deserialize_with(
        &self,
        selector: impl Into<TypeSelector>,
        data: &Value,
        options: &SerializerOptions,
    ) -> Result<Option<Box<dyn Any>>, MarshalError> {
        self.denormalizer.deserialize_with(selector, data, options)
    }

    /// See [`Denormalizer::deserialize_as`].
    #[inline]
    pub fn deserialize_as<T: Any>(
        &self,
        selector: impl Into<TypeSelector>,
        data: &Value,
    ) -> Result<Option<T>, MarshalError> {
        self.denormalizer.deserialize_as(selector, data)
    }

    /// See [`Denormalizer::deserialize_as_with`].
    #[inline]
    pub fn deserialize_as_with<T: Any>(
        &self,
        selector: impl Into<TypeSelector>,
        data: &Value,
        options: &SerializerOptions,
    ) -> Result<Option<T>, MarshalError> {
        self.denormalizer.deserialize_as_with(selector, data, options)
    }

    /// See [`Denormalizer::deserialize_all`].
    #[inline]
    pub fn deserialize_all(
        &self,
        selector: impl Into<TypeSelector>,
        data: &Value,
    ) -> Result<Vec<Option<Box<dyn Any>>>, MarshalError> {
        self.denormalizer.deserialize_all(selector, data)
    }

    /// See [`Denormalizer::deserialize_all_with`].
    #[inline]
    pub fn deserialize_all_with(
        &self,
        selector: impl Into<TypeSelector>,
        data: &Value,
        options: &SerializerOptions,
    ) -> Result<Vec<Option<Box<dyn Any>>>, MarshalError> {
        self.denormalizer.deserialize_all_with(selector, data, options)
    }

    /// See [`Denormalizer::deserialize_all_as`].
    #[inline]
    pub fn deserialize_all_as<T: Any>(
        &self,
        selector: impl Into<TypeSelector>,
        data: &Value,
    ) -> Result<Vec<Option<T>>, MarshalError> {
        self.denormalizer.deserialize_all_as(selector, data)
    }

    /// See [`Denormalizer::deserialize_all_as_with`].
    #[inline]
    pub fn deserialize_all_as_with<T: Any>(
        &self,
        selector: impl Into<TypeSelector>,
        data: &Value,
        options: &SerializerOptions,
    ) -> Result<Vec<Option<T>>, MarshalError> {
        self.denormalizer
            .deserialize_all_as_with(selector, data, options)
    }
}

// -----------------------------------------------------------------------------
// MarshallerBuilder

/// Assembles a [`Marshaller`], failing fast when a collaborator is absent.
#[derive(Default)]
pub struct MarshallerBuilder {
    normalizer: Option<Normalizer>,
    denormalizer: Option<Denormalizer>,
}

impl MarshallerBuilder {
    /// Supplies the normalizer.
    pub fn normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = Some(normalizer);
        self
    }

    /// Supplies the denormalizer.
    pub fn denormalizer(mut self, denormalizer: Denormalizer) -> Self {
        self.denormalizer = Some(denormalizer);
        self
    }

    /// Builds the facade.
    pub fn build(self) -> Result<Marshaller, BuildError> {
        let Some(normalizer) = self.normalizer else {
            return Err(BuildError::MissingNormalizer);
        };
        let Some(denormalizer) = self.denormalizer else {
            return Err(BuildError::MissingDenormalizer);
        };
        Ok(Marshaller {
            normalizer,
            denormalizer,
        })
    }
}
