//! Error types surfaced by registration, facade construction and marshalling.

use thiserror::Error;

// -----------------------------------------------------------------------------
// BuildError

/// Raised while assembling a [`Marshaller`](crate::Marshaller) from parts.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum BuildError {
    #[error("you must provide a normalizer")]
    MissingNormalizer,

    #[error("you must provide a denormalizer")]
    MissingDenormalizer,
}

// -----------------------------------------------------------------------------
// RegistrationError

/// Raised when a binding table is rejected by the
/// [`BindingRegistry`](crate::BindingRegistry).
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum RegistrationError {
    #[error(
        "type `{type_name}` declares both a nested type and a custom converter for property `{property}`"
    )]
    ConflictingCoercion {
        type_name: &'static str,
        property: &'static str,
    },
}

// -----------------------------------------------------------------------------
// MarshalError

/// Raised while normalizing or denormalizing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MarshalError {
    /// A batch operation received something other than an array.
    #[error("`{operation}` expects an array")]
    NotAnArray { operation: &'static str },

    /// No concrete type could be resolved for the input tree.
    #[error("no type to instantiate for {context}")]
    NoMatchingType { context: String },

    /// A polymorphic descriptor requires a discriminator the tree lacks.
    #[error("discriminator field `{field}` is missing or null")]
    MissingDiscriminator { field: String },

    /// An accessor received a value it cannot apply to its property.
    #[error("attempted to assign an incompatible value (expected `{expected}`)")]
    Mismatched { expected: &'static str },

    /// A custom converter failed.
    #[error("conversion failed: {0}")]
    Conversion(String),
}

impl MarshalError {
    /// Whether this is a per-element type-resolution failure.
    ///
    /// Batch deserialization tolerates these by dropping the element;
    /// everything else aborts the batch.
    #[inline]
    pub fn is_resolution_failure(&self) -> bool {
        matches!(
            self,
            Self::NoMatchingType { .. } | Self::MissingDiscriminator { .. }
        )
    }
}
