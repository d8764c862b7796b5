//! Per-type binding tables and lazy type references.

use core::any::{Any, TypeId};

use serde_json::Value;

use crate::registry::{PropertyBinding, SubTypes};

// -----------------------------------------------------------------------------
// TypeToken

/// A lightweight handle naming a registered type.
///
/// Carries the [`TypeId`] used for table lookups plus the type name for
/// diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeToken {
    id: TypeId,
    name: &'static str,
}

impl TypeToken {
    /// The token of `T`.
    #[inline]
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: core::any::type_name::<T>(),
        }
    }

    /// The type identity used for registry lookups.
    #[inline]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// The type name, for diagnostics only.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

// -----------------------------------------------------------------------------
// TypeRef / TypeSelector

/// A lazy type reference.
///
/// Bindings and discriminator maps store a function instead of a resolved
/// token so that mutually recursive types can reference each other without
/// initialization-order problems.
pub type TypeRef = fn() -> TypeSelector;

/// What a deserialization call may target: one concrete type, or an ordered
/// list of candidates tried against their registered predicates.
#[derive(Debug, Clone)]
pub enum TypeSelector {
    /// A single concrete type.
    One(TypeToken),
    /// An ordered candidate list; the first whose predicate accepts the
    /// input tree wins.
    Candidates(Vec<TypeToken>),
}

impl TypeSelector {
    /// Selects the single type `T`.
    #[inline]
    pub fn of<T: Any>() -> Self {
        TypeSelector::One(TypeToken::of::<T>())
    }

    /// Selects the first matching candidate out of `tokens`.
    #[inline]
    pub fn candidates<I>(tokens: I) -> Self
    where
        I: IntoIterator<Item = TypeToken>,
    {
        TypeSelector::Candidates(tokens.into_iter().collect())
    }

    // Human-readable form for error contexts.
    pub(crate) fn describe(&self) -> String {
        match self {
            TypeSelector::One(token) => format!("`{}`", token.name()),
            TypeSelector::Candidates(tokens) => {
                let names: Vec<&str> = tokens.iter().map(TypeToken::name).collect();
                format!("candidates [{}]", names.join(", "))
            }
        }
    }
}

impl From<TypeToken> for TypeSelector {
    #[inline]
    fn from(token: TypeToken) -> Self {
        TypeSelector::One(token)
    }
}

impl From<Vec<TypeToken>> for TypeSelector {
    #[inline]
    fn from(tokens: Vec<TypeToken>) -> Self {
        TypeSelector::Candidates(tokens)
    }
}

impl From<&[TypeToken]> for TypeSelector {
    #[inline]
    fn from(tokens: &[TypeToken]) -> Self {
        TypeSelector::Candidates(tokens.to_vec())
    }
}

impl<const N: usize> From<[TypeToken; N]> for TypeSelector {
    #[inline]
    fn from(tokens: [TypeToken; N]) -> Self {
        TypeSelector::Candidates(tokens.to_vec())
    }
}

// -----------------------------------------------------------------------------
// TypeBindings

/// The binding table of one type.
///
/// Holds the ordered [`PropertyBinding`] list, the default-construction
/// factory used to instantiate the type during denormalization, and the
/// optional polymorphic metadata: a [`SubTypes`] discriminator descriptor
/// and/or a candidate predicate consulted when the type appears in a
/// candidate list.
///
/// # Examples
///
/// ```
/// use treebind::{PropertyBinding, PropRef, TypeBindings};
///
/// #[derive(Default)]
/// struct Car {
///     name: Option<String>,
/// }
///
/// let table = TypeBindings::of::<Car>()
///     .supports(|data| data.get("type").and_then(|t| t.as_str()) == Some("CAR"))
///     .binding(PropertyBinding::new(
///         "name",
///         |c: &Car| PropRef::opt_scalar(&c.name),
///         |c: &mut Car, value| {
///             c.name = value.opt_decode()?;
///             Ok(())
///         },
///     ));
/// ```
pub struct TypeBindings {
    pub(crate) token: TypeToken,
    pub(crate) instantiate: fn() -> Box<dyn Any>,
    pub(crate) bindings: Vec<PropertyBinding>,
    pub(crate) sub_types: Option<SubTypes>,
    pub(crate) supports: Option<fn(&Value) -> bool>,
}

impl TypeBindings {
    /// Starts a table for `T`, instantiated through its [`Default`].
    pub fn of<T: Any + Default>() -> Self {
        Self {
            token: TypeToken::of::<T>(),
            instantiate: || Box::<T>::default(),
            bindings: Vec::new(),
            sub_types: None,
            supports: None,
        }
    }

    /// Appends one property binding; order is preserved.
    pub fn binding(mut self, binding: PropertyBinding) -> Self {
        self.bindings.push(binding);
        self
    }

    /// Attaches a discriminator descriptor consulted when this type is the
    /// direct target of a deserialization call.
    pub fn sub_types(mut self, sub_types: SubTypes) -> Self {
        self.sub_types = Some(sub_types);
        self
    }

    /// Attaches the predicate consulted when this type appears in a
    /// candidate list.
    pub fn supports(mut self, predicate: fn(&Value) -> bool) -> Self {
        self.supports = Some(predicate);
        self
    }

    /// The token this table is registered under.
    #[inline]
    pub fn token(&self) -> TypeToken {
        self.token
    }

    /// The ordered property bindings.
    #[inline]
    pub fn bindings(&self) -> &[PropertyBinding] {
        &self.bindings
    }

    #[inline]
    pub(crate) fn instantiate(&self) -> Box<dyn Any> {
        (self.instantiate)()
    }
}
