//! Dynamic property values exchanged between accessors and the engines.
//!
//! Accessors read properties out of an instance as a [`PropRef`] and accept
//! assignments as a [`PropValue`]. Both distinguish an unset property
//! (`Missing`, the tree-side "absent key") from an explicit `Null`, carry
//! already-tree-shaped values as [`Value`], and carry nested typed values as
//! type-erased objects resolved against the binding registry at runtime.

use core::any::Any;
use core::fmt;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::MarshalError;

// -----------------------------------------------------------------------------
// PropRef

/// A property value read out of an instance during normalization.
pub enum PropRef<'a> {
    /// The property is unset.
    Missing,
    /// The property is explicitly null.
    Null,
    /// A value that is already tree-shaped.
    Raw(Value),
    /// A nested typed value, normalized through its own binding table.
    Object(&'a dyn Any),
    /// A sequence of property values.
    List(Vec<PropRef<'a>>),
}

impl<'a> PropRef<'a> {
    /// Wraps a plain scalar (or any ready-made tree value).
    #[inline]
    pub fn scalar(value: impl Into<Value>) -> PropRef<'static> {
        PropRef::Raw(value.into())
    }

    /// Reads an optional scalar property: `None` becomes [`PropRef::Missing`].
    pub fn opt_scalar<V: Clone + Into<Value>>(value: &Option<V>) -> PropRef<'static> {
        match value {
            Some(v) => PropRef::Raw(v.clone().into()),
            None => PropRef::Missing,
        }
    }

    /// Wraps a nested typed value.
    #[inline]
    pub fn object<T: Any>(value: &'a T) -> Self {
        PropRef::Object(value)
    }

    /// Wraps a sequence of nested typed values.
    pub fn object_list<T: Any, I>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a T>,
    {
        PropRef::List(values.into_iter().map(PropRef::object).collect())
    }

    /// Wraps a sequence of already type-erased values.
    pub fn any_list<I>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a dyn Any>,
    {
        PropRef::List(values.into_iter().map(PropRef::Object).collect())
    }

    /// Wraps a sequence of plain scalars.
    pub fn scalar_list<V, I>(values: I) -> PropRef<'static>
    where
        V: Into<Value>,
        I: IntoIterator<Item = V>,
    {
        PropRef::List(values.into_iter().map(PropRef::scalar).collect())
    }

    /// Borrows the typed value behind [`PropRef::Object`].
    ///
    /// Converters use this to recover their concrete input type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&'a T> {
        match self {
            PropRef::Object(any) => {
                let any: &'a dyn Any = *any;
                any.downcast_ref::<T>()
            }
            _ => None,
        }
    }

    /// Whether the property was unset.
    #[inline]
    pub fn is_missing(&self) -> bool {
        matches!(self, PropRef::Missing)
    }

    /// Whether the property was explicitly null.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, PropRef::Null)
    }
}

impl fmt::Debug for PropRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropRef::Missing => f.write_str("Missing"),
            PropRef::Null => f.write_str("Null"),
            PropRef::Raw(value) => f.debug_tuple("Raw").field(value).finish(),
            PropRef::Object(_) => f.write_str("Object(..)"),
            PropRef::List(items) => f.debug_tuple("List").field(items).finish(),
        }
    }
}

// -----------------------------------------------------------------------------
// PropValue

/// A property value assigned onto an instance during denormalization.
pub enum PropValue {
    /// The source field was absent; the target keeps its current value
    /// unless the setter decides otherwise.
    Missing,
    /// The source field was explicitly null.
    Null,
    /// A raw tree value, assigned unchanged.
    Raw(Value),
    /// A denormalized nested object.
    Object(Box<dyn Any>),
    /// A sequence of assigned values.
    List(Vec<PropValue>),
}

impl PropValue {
    /// Decodes a raw tree value into a typed scalar.
    ///
    /// `Missing` and `Null` decode through `Value::Null`, so `Option<V>`
    /// targets accept them as `None`.
    pub fn decode<V: DeserializeOwned>(self) -> Result<V, MarshalError> {
        let value = match self {
            PropValue::Raw(value) => value,
            PropValue::Null | PropValue::Missing => Value::Null,
            PropValue::Object(_) | PropValue::List(_) => return Err(mismatched::<V>()),
        };
        serde_json::from_value(value).map_err(|_| mismatched::<V>())
    }

    /// [`decode`](Self::decode) into `None` for `Missing`/`Null`.
    pub fn opt_decode<V: DeserializeOwned>(self) -> Result<Option<V>, MarshalError> {
        match self {
            PropValue::Missing | PropValue::Null => Ok(None),
            other => other.decode().map(Some),
        }
    }

    /// Takes the typed object behind [`PropValue::Object`].
    pub fn downcast<T: Any>(self) -> Result<T, MarshalError> {
        match self {
            PropValue::Object(boxed) => match boxed.downcast::<T>() {
                Ok(value) => Ok(*value),
                Err(_) => Err(mismatched::<T>()),
            },
            _ => Err(mismatched::<T>()),
        }
    }

    /// [`downcast`](Self::downcast) into `None` for `Missing`/`Null`.
    pub fn opt_downcast<T: Any>(self) -> Result<Option<T>, MarshalError> {
        match self {
            PropValue::Missing | PropValue::Null => Ok(None),
            other => other.downcast().map(Some),
        }
    }

    /// Takes a list of typed objects, `None` for `Missing`/`Null`.
    ///
    /// Null elements inside the list are rejected as a mismatch; use
    /// [`into_list`](Self::into_list) when they must be preserved.
    pub fn opt_downcast_list<T: Any>(self) -> Result<Option<Vec<T>>, MarshalError> {
        match self {
            PropValue::Missing | PropValue::Null => Ok(None),
            PropValue::List(items) => items
                .into_iter()
                .map(PropValue::downcast)
                .collect::<Result<Vec<T>, _>>()
                .map(Some),
            _ => Err(mismatched::<Vec<T>>()),
        }
    }

    /// Takes the type-erased object behind [`PropValue::Object`].
    pub fn into_any(self) -> Result<Box<dyn Any>, MarshalError> {
        match self {
            PropValue::Object(boxed) => Ok(boxed),
            _ => Err(mismatched::<Box<dyn Any>>()),
        }
    }

    /// Takes the elements behind [`PropValue::List`].
    pub fn into_list(self) -> Result<Vec<PropValue>, MarshalError> {
        match self {
            PropValue::List(items) => Ok(items),
            _ => Err(mismatched::<Vec<PropValue>>()),
        }
    }

    /// Whether the source field was absent.
    #[inline]
    pub fn is_missing(&self) -> bool {
        matches!(self, PropValue::Missing)
    }

    /// Whether the source field was explicitly null.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, PropValue::Null)
    }
}

impl fmt::Debug for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Missing => f.write_str("Missing"),
            PropValue::Null => f.write_str("Null"),
            PropValue::Raw(value) => f.debug_tuple("Raw").field(value).finish(),
            PropValue::Object(_) => f.write_str("Object(..)"),
            PropValue::List(items) => f.debug_tuple("List").field(items).finish(),
        }
    }
}

fn mismatched<T: ?Sized>() -> MarshalError {
    MarshalError::Mismatched {
        expected: core::any::type_name::<T>(),
    }
}
