//! Review data model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::catalog::CatalogItemId;
use super::handle::Handle;

/// Minimum allowed star rating.
pub const RATING_MIN: u8 = 1;
/// Maximum allowed star rating.
pub const RATING_MAX: u8 = 5;

/// Validation errors for review component values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewValidationError {
    RatingOutOfRange { min: u8, max: u8 },
}

impl fmt::Display for ReviewValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RatingOutOfRange { min, max } => {
                write!(f, "rating must be between {min} and {max}")
            }
        }
    }
}

impl std::error::Error for ReviewValidationError {}

/// Star rating bounded to [`RATING_MIN`]..=[`RATING_MAX`].
///
/// # Examples
/// ```
/// use backend::domain::Rating;
///
/// let rating = Rating::new(4).unwrap();
/// assert_eq!(rating.value(), 4);
/// assert!(Rating::new(6).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "u8", into = "u8")]
#[schema(value_type = u8, minimum = 1, maximum = 5, example = 4)]
pub struct Rating(u8);

impl Rating {
    /// Validate and construct a [`Rating`].
    pub fn new(value: u8) -> Result<Self, ReviewValidationError> {
        if !(RATING_MIN..=RATING_MAX).contains(&value) {
            return Err(ReviewValidationError::RatingOutOfRange {
                min: RATING_MIN,
                max: RATING_MAX,
            });
        }
        Ok(Self(value))
    }

    /// The raw star count.
    #[rustfmt::skip]
    pub fn value(self) -> u8 { self.0 }
}

impl From<Rating> for u8 {
    fn from(value: Rating) -> Self {
        value.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = ReviewValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Immutable review of a catalog item.
///
/// ## Invariants
/// - Never updated or deleted once created.
/// - `comment` is trimmed at construction; a blank comment becomes `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    id: Uuid,
    #[schema(value_type = String, example = "alice_90")]
    reviewer: Handle,
    item: CatalogItemId,
    rating: Rating,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    comment: Option<String>,
    #[schema(value_type = String, example = "2024-05-01T12:00:00Z")]
    created_at: DateTime<Utc>,
}

impl Review {
    /// Create a review with a fresh identifier.
    pub fn new(
        reviewer: Handle,
        item: CatalogItemId,
        rating: Rating,
        comment: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        let comment = comment
            .map(|text| text.trim().to_owned())
            .filter(|text| !text.is_empty());
        Self {
            id: Uuid::new_v4(),
            reviewer,
            item,
            rating,
            comment,
            created_at,
        }
    }

    /// Stable review identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Handle of the account that wrote the review.
    pub fn reviewer(&self) -> &Handle {
        &self.reviewer
    }

    /// Catalog item the review is about.
    pub fn item(&self) -> CatalogItemId {
        self.item
    }

    /// Star rating.
    pub fn rating(&self) -> Rating {
        self.rating
    }

    /// Optional free-text comment.
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Instant the review was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
