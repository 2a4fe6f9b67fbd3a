//! Store variants.
//!
//! A variant is a zero-sized marker type that names itself (the tag written
//! at save time) and declares the secondary tables it carries.

/// Capability hook implemented by each store variant.
///
/// # Example
///
/// ```
/// use tabstore_core::StoreKind;
///
/// #[derive(Debug, Clone, Copy, Default)]
/// pub struct Photometry;
///
/// impl StoreKind for Photometry {
///     const TYPE_TAG: &'static str = "Photometry";
///     const SECONDARY_TABLES: &'static [&'static str] = &["bands", "zeropoints"];
/// }
/// ```
pub trait StoreKind {
    /// Identifier stored with the primary table and checked on load.
    const TYPE_TAG: &'static str;

    /// Slot name of the required primary table.
    const PRIMARY_TABLE: &'static str = "data";

    /// Additional tables this variant requires, in save order.
    const SECONDARY_TABLES: &'static [&'static str] = &[];

    /// Whether `name` is declared as a secondary table.
    fn declares(name: &str) -> bool {
        Self::SECONDARY_TABLES.contains(&name)
    }
}

/// The plain variant: a primary table and properties, nothing else.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Basic;

impl StoreKind for Basic {
    const TYPE_TAG: &'static str = "Basic";
}
