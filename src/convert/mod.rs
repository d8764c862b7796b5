//! The custom converter contract.
//!
//! A [`Converter`] handles a field that neither the built-in raw handling nor
//! a nested binding table covers: timestamps rendered as strings, wrapped
//! value objects, composite encodings. Both engines pass themselves to the
//! converter so it may re-enter the engine for composite conversions.
//!
//! Converters are stateless strategy objects: the binding stores a
//! [`ConverterFactory`] and a fresh instance is created per field per call.

use serde_json::Value;

use crate::error::MarshalError;
use crate::marshal::{Denormalizer, Normalizer};
use crate::options::SerializerOptions;
use crate::value::{PropRef, PropValue};

// -----------------------------------------------------------------------------
// Converter

/// Factory producing a fresh converter per field per call.
pub type ConverterFactory = fn() -> Box<dyn Converter>;

/// Bidirectional conversion between a property value and its tree form.
///
/// The engine never guards converter invocation beyond the null/undefined
/// policy filters: a converter may receive a [`PropRef::Null`],
/// [`PropRef::Missing`] or absent input and decides for itself how to handle
/// it.
///
/// # Examples
///
/// ```
/// use serde_json::Value;
/// use treebind::{Converter, Denormalizer, MarshalError, Normalizer, PropRef, PropValue,
///                SerializerOptions};
///
/// #[derive(Debug, Clone, PartialEq, Default)]
/// struct Timestamp(String);
///
/// struct TimestampConverter;
///
/// impl Converter for TimestampConverter {
///     fn to_tree(
///         &self,
///         value: PropRef<'_>,
///         _serializer: &Normalizer,
///         _options: &SerializerOptions,
///     ) -> Result<Option<Value>, MarshalError> {
///         match value.downcast_ref::<Timestamp>() {
///             Some(ts) => Ok(Some(Value::String(ts.0.clone()))),
///             None => Ok(None),
///         }
///     }
///
///     fn from_tree(
///         &self,
///         value: Option<&Value>,
///         _deserializer: &Denormalizer,
///         _options: &SerializerOptions,
///     ) -> Result<PropValue, MarshalError> {
///         match value.and_then(Value::as_str) {
///             Some(text) => Ok(PropValue::Object(Box::new(Timestamp(text.to_string())))),
///             None => Ok(PropValue::Missing),
///         }
///     }
/// }
/// ```
pub trait Converter {
    /// Converts a property value into its tree form.
    ///
    /// Returning `Ok(None)` omits the field from the output tree entirely;
    /// inside a sequence an omitted element becomes `null`.
    fn to_tree(
        &self,
        value: PropRef<'_>,
        serializer: &Normalizer,
        options: &SerializerOptions,
    ) -> Result<Option<Value>, MarshalError>;

    /// Converts a tree value back into a property value.
    ///
    /// `value` is `None` when the field is absent from the tree. Returning
    /// [`PropValue::Missing`] hands the decision back to the setter, which
    /// typically leaves the target's default untouched.
    fn from_tree(
        &self,
        value: Option<&Value>,
        deserializer: &Denormalizer,
        options: &SerializerOptions,
    ) -> Result<PropValue, MarshalError>;
}
