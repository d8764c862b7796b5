//! Binding tables and the type-identity registry that stores them.
//!
//! The registry is the engine's only source of metadata: per type, an ordered
//! list of [`PropertyBinding`]s plus optional polymorphic dispatch metadata.
//! Tables are built once — imperatively through
//! [`BindingRegistry::register`], or collected from
//! [`submit_bindings!`](crate::submit_bindings) submissions — and frozen into
//! an [`Arc`] before any engine is constructed. No mutation occurs during
//! marshalling.

use core::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::RegistrationError;

mod binding;
mod sub_types;
mod type_bindings;

pub use binding::PropertyBinding;
pub use sub_types::SubTypes;
pub use type_bindings::{TypeBindings, TypeRef, TypeSelector, TypeToken};

// -----------------------------------------------------------------------------
// BindingRegistry

/// The central store of binding tables, keyed by type identity.
///
/// # Examples
///
/// ```
/// use treebind::{BindingRegistry, TypeBindings, TypeToken};
///
/// #[derive(Default)]
/// struct Address;
///
/// let mut registry = BindingRegistry::new();
/// registry.register(TypeBindings::of::<Address>()).unwrap();
/// assert!(registry.contains(TypeToken::of::<Address>().id()));
///
/// let shared = registry.into_shared();
/// ```
#[derive(Default)]
pub struct BindingRegistry {
    table: HashMap<TypeId, TypeBindings>,
}

impl BindingRegistry {
    /// Creates an empty registry.
    #[inline]
    pub fn new() -> Self {
        Self {
            table: HashMap::new(),
        }
    }

    /// Registers a type's binding table.
    ///
    /// Fails when any binding declares both a nested type and a custom
    /// converter. Re-registering a type replaces its previous table (and
    /// logs a warning).
    pub fn register(&mut self, bindings: TypeBindings) -> Result<(), RegistrationError> {
        let token = bindings.token();
        for binding in bindings.bindings() {
            if binding.nested.is_some() && binding.converter.is_some() {
                return Err(RegistrationError::ConflictingCoercion {
                    type_name: token.name(),
                    property: binding.property_key(),
                });
            }
        }

        if self.table.insert(token.id(), bindings).is_some() {
            log::warn!(
                "bindings for `{}` re-registered, previous table replaced",
                token.name()
            );
        }
        Ok(())
    }

    /// Whether a table is registered for the given type identity.
    #[inline]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.table.contains_key(&type_id)
    }

    /// Returns the table registered for the given type identity.
    #[inline]
    pub fn get(&self, type_id: TypeId) -> Option<&TypeBindings> {
        self.table.get(&type_id)
    }

    /// Iterates over the registered tables, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &TypeBindings> {
        self.table.values()
    }

    /// Freezes the registry for sharing with engines.
    ///
    /// Engines hold the registry behind an [`Arc`]; once frozen it is
    /// read-only, so marshalling needs no synchronization.
    #[inline]
    pub fn into_shared(self) -> Arc<BindingRegistry> {
        Arc::new(self)
    }
}

// -----------------------------------------------------------------------------
// Distributed registration

/// A binding-table source submitted through [`submit_bindings!`](crate::submit_bindings).
#[cfg(feature = "auto_register")]
pub struct BindingProvider {
    provide: fn() -> TypeBindings,
}

#[cfg(feature = "auto_register")]
impl BindingProvider {
    /// Wraps a table-producing function for submission.
    pub const fn new(provide: fn() -> TypeBindings) -> Self {
        Self { provide }
    }
}

#[cfg(feature = "auto_register")]
inventory::collect!(BindingProvider);

#[cfg(feature = "auto_register")]
impl BindingRegistry {
    /// Creates a registry holding every submitted table.
    pub fn with_submitted() -> Result<Self, RegistrationError> {
        let mut registry = Self::new();
        registry.register_submitted()?;
        Ok(registry)
    }

    /// Registers every table submitted via [`submit_bindings!`](crate::submit_bindings).
    ///
    /// Submission order across the crate graph is arbitrary; tables are
    /// independent so the order does not matter.
    pub fn register_submitted(&mut self) -> Result<(), RegistrationError> {
        for provider in inventory::iter::<BindingProvider> {
            self.register((provider.provide)())?;
        }
        Ok(())
    }
}

/// Submits a binding-table source for distributed registration.
///
/// The argument is a `fn() -> TypeBindings`. Every submission in the final
/// binary is picked up by [`BindingRegistry::with_submitted`] /
/// [`BindingRegistry::register_submitted`], which is how types spread across
/// modules or crates attach their metadata without a central registration
/// site.
#[cfg(feature = "auto_register")]
#[macro_export]
macro_rules! submit_bindings {
    ($provider:expr) => {
        $crate::__macro_exports::inventory::submit! {
            $crate::registry::BindingProvider::new($provider)
        }
    };
}
