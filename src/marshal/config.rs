//! Global null/undefined propagation policy.

// -----------------------------------------------------------------------------
// MarshalConfig

/// Engine-wide null/undefined propagation policy.
///
/// All four flags default to `false`: null and unset source values are
/// dropped from normalized output and are not assigned onto denormalized
/// targets, preserving the target's own default. A binding-level override
/// always wins over these globals, independently per flag and direction.
///
/// The value is supplied at engine construction and never changes afterward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MarshalConfig {
    /// Emit explicitly-null properties during normalization.
    pub normalize_null: bool,
    /// Emit unset properties (as `null`) during normalization.
    pub normalize_undefined: bool,
    /// Assign explicitly-null tree fields during denormalization.
    pub denormalize_null: bool,
    /// Assign absent tree fields during denormalization.
    pub denormalize_undefined: bool,
}

impl MarshalConfig {
    /// The default policy: drop nulls and unset values in both directions.
    #[inline]
    pub const fn new() -> Self {
        Self {
            normalize_null: false,
            normalize_undefined: false,
            denormalize_null: false,
            denormalize_undefined: false,
        }
    }
}

// Binding-level override wins; otherwise the global flag applies.
#[inline]
pub(crate) fn effective(override_flag: Option<bool>, global: bool) -> bool {
    override_flag.unwrap_or(global)
}
