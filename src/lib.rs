//! Binding-table driven marshalling between typed values and JSON-like trees.
//!
//! Each participating type registers a [`TypeBindings`] table: an ordered list
//! of [`PropertyBinding`]s describing how one in-memory property maps onto one
//! field of a [`serde_json::Value`] tree, plus an optional polymorphic
//! descriptor. The [`Normalizer`] walks an instance through its table to
//! produce a tree; the [`Denormalizer`] resolves a concrete type for a tree
//! (directly, through a discriminator field, or through candidate
//! predicates), instantiates it and populates it back.
//!
//! Tables are looked up by [`TypeId`](core::any::TypeId) at runtime, so a
//! heterogeneous collection marshals every element by its concrete type.
//!
//! # Example
//!
//! ```
//! use treebind::{BindingRegistry, Normalizer, PropertyBinding, PropRef, TypeBindings};
//! use serde_json::json;
//!
//! #[derive(Default)]
//! struct City {
//!     name: Option<String>,
//! }
//!
//! let mut registry = BindingRegistry::new();
//! registry
//!     .register(
//!         TypeBindings::of::<City>().binding(PropertyBinding::new(
//!             "name",
//!             |c: &City| PropRef::opt_scalar(&c.name),
//!             |c: &mut City, value| {
//!                 c.name = value.opt_decode()?;
//!                 Ok(())
//!             },
//!         )),
//!     )
//!     .unwrap();
//!
//! let normalizer = Normalizer::new(registry.into_shared());
//! let city = City { name: Some("Reims".to_string()) };
//! assert_eq!(normalizer.serialize(&city).unwrap(), json!({"name": "Reims"}));
//! ```

// -----------------------------------------------------------------------------
// Modules

pub mod access;
pub mod convert;
pub mod error;
pub mod marshal;
pub mod options;
pub mod registry;
pub mod value;

mod marshaller;

#[cfg(test)]
mod tests;

// -----------------------------------------------------------------------------
// Top-level exports

pub use crate::convert::{Converter, ConverterFactory};
pub use crate::error::{BuildError, MarshalError, RegistrationError};
pub use crate::marshal::{Denormalizer, MarshalConfig, Normalizer};
pub use crate::marshaller::{Marshaller, MarshallerBuilder};
pub use crate::options::SerializerOptions;
pub use crate::registry::{
    BindingRegistry, PropertyBinding, SubTypes, TypeBindings, TypeRef, TypeSelector, TypeToken,
};
pub use crate::value::{PropRef, PropValue};

#[cfg(feature = "auto_register")]
pub use crate::registry::BindingProvider;

// -----------------------------------------------------------------------------
// Macro exports

#[cfg(feature = "auto_register")]
#[doc(hidden)]
pub mod __macro_exports {
    pub use inventory;
}
