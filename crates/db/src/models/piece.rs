//! Piece entity model, request DTOs, and create/update reconciliation.

use kyarafit_core::dates::parse_optional_date;
use kyarafit_core::error::CoreError;
use kyarafit_core::fields::{
    normalize_tags, validate_amount, validate_name, validate_opt_max_len, validate_url,
    MAX_DESCRIPTION_LEN,
};
use kyarafit_core::patch::{self, double_option, set_value};
use kyarafit_core::piece::MAX_CATEGORY_LEN;
use kyarafit_core::search::non_blank;
use kyarafit_core::types::{Date, RecordId, Timestamp, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A piece row from the `pieces` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Piece {
    pub id: RecordId,
    pub user_id: UserId,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub thumbnail_url: Option<String>,
    /// Free text; see `kyarafit_core::piece::SUGGESTED_CATEGORIES`.
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub source_link: Option<String>,
    pub purchase_date: Option<Date>,
    pub price: Option<f64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Payload for `POST /pieces`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePieceRequest {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub source_link: Option<String>,
    pub purchase_date: Option<String>,
    pub price: Option<f64>,
}

impl CreatePieceRequest {
    /// Validate the payload and produce a new record owned by `user_id`.
    pub fn into_piece(self, user_id: &str, now: Timestamp) -> Result<Piece, CoreError> {
        validate_name(&self.name)?;
        validate_details(
            self.description.as_deref(),
            self.category.as_deref(),
            self.image_url.as_deref(),
            self.thumbnail_url.as_deref(),
            self.source_link.as_deref(),
        )?;
        validate_amount("price", self.price)?;

        Ok(Piece {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            name: self.name,
            description: self.description,
            image_url: self.image_url,
            thumbnail_url: self.thumbnail_url,
            category: self.category,
            tags: normalize_tags(self.tags.unwrap_or_default()),
            source_link: self.source_link,
            purchase_date: parse_optional_date("purchase_date", self.purchase_date.as_deref())?,
            price: self.price,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Payload for `PUT /pieces/{id}`. Same presence rules as builds.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePieceRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub image_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub thumbnail_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub category: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub source_link: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub purchase_date: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub price: Option<Option<f64>>,
}

impl UpdatePieceRequest {
    /// Merge this payload into `existing`, returning the updated record.
    pub fn apply_to(self, mut existing: Piece, now: Timestamp) -> Result<Piece, CoreError> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        validate_details(
            set_value(&self.description).map(String::as_str),
            set_value(&self.category).map(String::as_str),
            set_value(&self.image_url).map(String::as_str),
            set_value(&self.thumbnail_url).map(String::as_str),
            set_value(&self.source_link).map(String::as_str),
        )?;
        validate_amount("price", set_value(&self.price).copied())?;

        let mut purchase_date = existing.purchase_date;
        patch::apply_date("purchase_date", self.purchase_date, &mut purchase_date)?;

        if let Some(name) = self.name {
            existing.name = name;
        }
        if let Some(tags) = self.tags {
            existing.tags = normalize_tags(tags);
        }
        patch::apply(self.description, &mut existing.description);
        patch::apply(self.image_url, &mut existing.image_url);
        patch::apply(self.thumbnail_url, &mut existing.thumbnail_url);
        patch::apply(self.category, &mut existing.category);
        patch::apply(self.source_link, &mut existing.source_link);
        patch::apply(self.price, &mut existing.price);
        existing.purchase_date = purchase_date;
        existing.updated_at = now;

        Ok(existing)
    }
}

fn validate_details(
    description: Option<&str>,
    category: Option<&str>,
    image_url: Option<&str>,
    thumbnail_url: Option<&str>,
    source_link: Option<&str>,
) -> Result<(), CoreError> {
    validate_opt_max_len("description", description, MAX_DESCRIPTION_LEN)?;
    validate_opt_max_len("category", category, MAX_CATEGORY_LEN)?;
    validate_url("image_url", image_url)?;
    validate_url("thumbnail_url", thumbnail_url)?;
    validate_url("source_link", source_link)
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

/// Query parameters for `GET /pieces`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PieceListParams {
    pub search: Option<String>,
    pub category: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// The single narrowing applied to a piece listing.
#[derive(Debug, Clone, PartialEq)]
pub enum PieceFilter {
    All,
    Search(String),
    Category(String),
}

impl PieceListParams {
    /// Search wins over category when both are given.
    pub fn filter(&self) -> PieceFilter {
        if let Some(term) = non_blank(self.search.as_deref()) {
            PieceFilter::Search(term.to_string())
        } else if let Some(category) = non_blank(self.category.as_deref()) {
            PieceFilter::Category(category.to_string())
        } else {
            PieceFilter::All
        }
    }
}

/// Response body for `GET /pieces/categories`.
#[derive(Debug, Clone, Serialize)]
pub struct PieceCategories {
    /// Fixed list offered for UI convenience.
    pub suggested: Vec<&'static str>,
    /// Distinct categories the caller has actually used.
    pub used: Vec<String>,
}
