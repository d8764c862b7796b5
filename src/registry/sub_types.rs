//! Discriminator-based polymorphic dispatch descriptors.

use std::collections::HashMap;

use crate::access::TreePath;
use crate::registry::TypeRef;

// -----------------------------------------------------------------------------
// SubTypes

/// Maps the value of a discriminator field to concrete types.
///
/// Attached to the type a caller deserializes *through* (typically an
/// abstract base): the engine reads the discriminator field from the input
/// tree and instantiates the mapped type instead. A missing or null
/// discriminator is an error; an unmapped value fails resolution — there is
/// no default-type fallback.
///
/// # Examples
///
/// ```
/// use treebind::{SubTypes, TypeSelector};
///
/// #[derive(Default)]
/// struct Car;
/// #[derive(Default)]
/// struct Truck;
///
/// let sub_types = SubTypes::on("type")
///     .variant("CAR", || TypeSelector::of::<Car>())
///     .variant("TRUCK", || TypeSelector::of::<Truck>());
/// ```
pub struct SubTypes {
    field: TreePath,
    types: HashMap<&'static str, TypeRef>,
}

impl SubTypes {
    /// Starts a descriptor dispatching on `field`.
    pub fn on(field: &str) -> Self {
        Self {
            field: TreePath::parse(field),
            types: HashMap::new(),
        }
    }

    /// Maps one discriminator value to its concrete type.
    pub fn variant(mut self, tag: &'static str, target: TypeRef) -> Self {
        self.types.insert(tag, target);
        self
    }

    /// The discriminator field path.
    #[inline]
    pub fn field(&self) -> &TreePath {
        &self.field
    }

    #[inline]
    pub(crate) fn resolve(&self, tag: &str) -> Option<TypeRef> {
        self.types.get(tag).copied()
    }
}
