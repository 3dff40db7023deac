//! Product reviews. Append-only: there is no edit or delete.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ProductId, ReviewId, UserId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub rating: f64,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Review {
    #[must_use]
    pub fn from_new(id: ReviewId, created_at: DateTime<Utc>, new: NewReview) -> Self {
        Self {
            id,
            user_id: new.user_id,
            product_id: new.product_id,
            rating: new.rating,
            comment: new.comment,
            created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewReview {
    pub user_id: UserId,
    pub product_id: ProductId,
    pub rating: f64,
    pub comment: Option<String>,
}
