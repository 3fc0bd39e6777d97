//! Catalog item identifier.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Opaque identifier of a catalog movie.
///
/// The backend never resolves these against the catalog; it only stores and
/// returns them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
#[schema(value_type = i64, example = 603)]
pub struct CatalogItemId(i64);

impl CatalogItemId {
    /// Wrap a raw catalog identifier.
    #[rustfmt::skip]
    pub fn new(value: i64) -> Self { Self(value) }

    /// The raw identifier value.
    #[rustfmt::skip]
    pub fn value(self) -> i64 { self.0 }
}

impl From<i64> for CatalogItemId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<CatalogItemId> for i64 {
    fn from(value: CatalogItemId) -> Self {
        value.0
    }
}

impl std::fmt::Display for CatalogItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
