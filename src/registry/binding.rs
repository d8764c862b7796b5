//! Per-property declarative bindings.

use core::any::Any;

use crate::access::TreePath;
use crate::convert::ConverterFactory;
use crate::error::MarshalError;
use crate::registry::TypeRef;
use crate::value::{PropRef, PropValue};

pub(crate) type GetFn = Box<dyn for<'a> Fn(&'a dyn Any) -> PropRef<'a> + Send + Sync>;
pub(crate) type SetFn = Box<dyn Fn(&mut dyn Any, PropValue) -> Result<(), MarshalError> + Send + Sync>;

// -----------------------------------------------------------------------------
// PropertyBinding

/// Declarative mapping from one in-memory property to one tree field.
///
/// A binding names the property, the (possibly nested) tree field it lands
/// on, at most one coercion (a nested type reference or a custom converter),
/// visibility restrictions, group tags, per-field null/undefined policy
/// overrides, and the pair of accessors that read and write the property on a
/// type-erased instance.
///
/// The accessors are supplied through [`PropertyBinding::new`], which hides
/// the `dyn Any` downcasts behind typed closures.
///
/// # Examples
///
/// ```
/// use treebind::{PropertyBinding, PropRef};
///
/// #[derive(Default)]
/// struct Address {
///     city: Option<String>,
/// }
///
/// let binding = PropertyBinding::new(
///     "city",
///     |a: &Address| PropRef::opt_scalar(&a.city),
///     |a: &mut Address, value| {
///         a.city = value.opt_decode()?;
///         Ok(())
///     },
/// )
/// .field("address.city")
/// .group("WithAddress");
///
/// assert_eq!(binding.property_key(), "city");
/// ```
pub struct PropertyBinding {
    pub(crate) property_key: &'static str,
    pub(crate) field: TreePath,
    pub(crate) nested: Option<TypeRef>,
    pub(crate) converter: Option<ConverterFactory>,
    pub(crate) read_only: bool,
    pub(crate) write_only: bool,
    pub(crate) groups: Vec<&'static str>,
    pub(crate) normalize_null: Option<bool>,
    pub(crate) normalize_undefined: Option<bool>,
    pub(crate) denormalize_null: Option<bool>,
    pub(crate) denormalize_undefined: Option<bool>,
    get: GetFn,
    set: SetFn,
}

impl PropertyBinding {
    /// Declares a binding for `property_key` with its typed accessors.
    ///
    /// The tree field defaults to the property key itself; use
    /// [`field`](Self::field) to rename or nest it.
    pub fn new<T, G, S>(property_key: &'static str, get: G, set: S) -> Self
    where
        T: Any,
        G: for<'a> Fn(&'a T) -> PropRef<'a> + Send + Sync + 'static,
        S: Fn(&mut T, PropValue) -> Result<(), MarshalError> + Send + Sync + 'static,
    {
        let get: GetFn = Box::new(move |any: &dyn Any| -> PropRef<'_> {
            match any.downcast_ref::<T>() {
                Some(instance) => get(instance),
                None => PropRef::Missing,
            }
        });
        let set: SetFn = Box::new(move |any: &mut dyn Any, value: PropValue| {
            match any.downcast_mut::<T>() {
                Some(instance) => set(instance, value),
                None => Err(MarshalError::Mismatched {
                    expected: core::any::type_name::<T>(),
                }),
            }
        });

        Self {
            property_key,
            field: TreePath::parse(property_key),
            nested: None,
            converter: None,
            read_only: false,
            write_only: false,
            groups: Vec::new(),
            normalize_null: None,
            normalize_undefined: None,
            denormalize_null: None,
            denormalize_undefined: None,
            get,
            set,
        }
    }

    /// Renames the tree field; dotted/bracketed paths nest the value.
    ///
    /// An empty path keeps the default (the property key).
    pub fn field(mut self, path: &str) -> Self {
        if !path.is_empty() {
            self.field = TreePath::parse(path);
        }
        self
    }

    /// Declares the value as a nested typed object (or sequence of them).
    ///
    /// Mutually exclusive with [`converter`](Self::converter); declaring both
    /// fails when the table is registered.
    pub fn nested(mut self, nested: TypeRef) -> Self {
        self.nested = Some(nested);
        self
    }

    /// Delegates the value to a custom converter.
    ///
    /// Mutually exclusive with [`nested`](Self::nested); declaring both fails
    /// when the table is registered.
    pub fn converter(mut self, factory: ConverterFactory) -> Self {
        self.converter = Some(factory);
        self
    }

    /// Suppresses this binding during normalization.
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Suppresses this binding during denormalization.
    pub fn write_only(mut self) -> Self {
        self.write_only = true;
        self
    }

    /// Adds one group tag.
    pub fn group(mut self, tag: &'static str) -> Self {
        self.groups.push(tag);
        self
    }

    /// Adds a set of group tags.
    pub fn groups<I>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = &'static str>,
    {
        self.groups.extend(tags);
        self
    }

    /// Overrides the global null policy for normalization.
    pub fn normalize_null(mut self, enabled: bool) -> Self {
        self.normalize_null = Some(enabled);
        self
    }

    /// Overrides the global undefined policy for normalization.
    pub fn normalize_undefined(mut self, enabled: bool) -> Self {
        self.normalize_undefined = Some(enabled);
        self
    }

    /// Overrides the global null policy for denormalization.
    pub fn denormalize_null(mut self, enabled: bool) -> Self {
        self.denormalize_null = Some(enabled);
        self
    }

    /// Overrides the global undefined policy for denormalization.
    pub fn denormalize_undefined(mut self, enabled: bool) -> Self {
        self.denormalize_undefined = Some(enabled);
        self
    }

    /// The in-memory property identifier.
    #[inline]
    pub fn property_key(&self) -> &'static str {
        self.property_key
    }

    /// The tree field this binding reads and writes.
    #[inline]
    pub fn field_path(&self) -> &TreePath {
        &self.field
    }

    #[inline]
    pub(crate) fn get_value<'a>(&self, instance: &'a dyn Any) -> PropRef<'a> {
        (self.get)(instance)
    }

    #[inline]
    pub(crate) fn set_value(
        &self,
        instance: &mut dyn Any,
        value: PropValue,
    ) -> Result<(), MarshalError> {
        (self.set)(instance, value)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::PropertyBinding;
    use crate::access::TreePath;
    use crate::value::{PropRef, PropValue};

    #[derive(Default)]
    struct Sample {
        name: Option<String>,
    }

    fn name_binding() -> PropertyBinding {
        PropertyBinding::new(
            "name",
            |s: &Sample| PropRef::opt_scalar(&s.name),
            |s: &mut Sample, value| {
                s.name = value.opt_decode()?;
                Ok(())
            },
        )
    }

    #[test]
    fn field_defaults_to_the_property_key() {
        let binding = name_binding();
        assert_eq!(binding.field_path(), &TreePath::parse("name"));
    }

    #[test]
    fn field_can_be_renamed_but_not_blanked() {
        let binding = name_binding().field("complex.path");
        assert_eq!(binding.field_path(), &TreePath::parse("complex.path"));

        let binding = name_binding().field("");
        assert_eq!(binding.field_path(), &TreePath::parse("name"));
    }

    #[test]
    fn accessors_round_trip_through_dyn_any() {
        let binding = name_binding();
        let mut sample = Sample::default();

        binding
            .set_value(&mut sample, PropValue::Raw(json!("test")))
            .unwrap();
        assert_eq!(sample.name.as_deref(), Some("test"));

        assert!(matches!(
            binding.get_value(&sample),
            PropRef::Raw(value) if value == json!("test")
        ));
    }

    #[test]
    fn accessors_reject_foreign_instances() {
        let binding = name_binding();
        let mut other = 3_u32;

        assert!(binding.get_value(&other).is_missing());
        assert!(
            binding
                .set_value(&mut other, PropValue::Raw(json!("x")))
                .is_err()
        );
    }
}
