//! Menu products.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use cafe_core::catalog::filter_products;
use cafe_core::validation::{validate_product_draft, validate_search_query};
use cafe_core::{Product, ProductCategory, ProductDraft, ProductFilter};

use crate::auth::StaffUser;
use crate::error::{AppError, AppResult};
use crate::routes::cafes::require_cafe;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    pub cafe_id: Option<String>,
    pub category: Option<String>,
    pub search: Option<String>,
}

/// `GET /products?cafeId=&category=&search=`
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> AppResult<Json<Vec<Product>>> {
    let cafe_id = query
        .cafe_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("cafeId is required".to_string()))?;
    let category = query
        .category
        .filter(|c| !c.is_empty())
        .map(|c| c.parse::<ProductCategory>())
        .transpose()?;
    let search = match query.search {
        Some(raw) => validate_search_query(&raw)?,
        None => String::new(),
    };

    require_cafe(&state, &cafe_id).await?;
    let products = state.db.products().list_by_cafe(&cafe_id, category).await?;
    if search.is_empty() {
        return Ok(Json(products));
    }

    let filter = ProductFilter {
        query: search,
        category,
        available_only: false,
    };
    Ok(Json(filter_products(&products, &filter)))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Product>> {
    state
        .db
        .products()
        .get_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("Product {id}")))
}

pub async fn create(
    State(state): State<AppState>,
    StaffUser(claims): StaffUser,
    Json(draft): Json<ProductDraft>,
) -> AppResult<(StatusCode, Json<Product>)> {
    validate_product_draft(&draft)?;
    require_cafe(&state, &draft.cafe_id).await?;

    let product = draft.into_product(Uuid::new_v4().to_string(), Utc::now());
    state.db.products().insert(&product).await?;

    info!(id = %product.id, cafe_id = %product.cafe_id, by = %claims.sub, "Product created");
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update(
    State(state): State<AppState>,
    StaffUser(claims): StaffUser,
    Path(id): Path<String>,
    Json(draft): Json<ProductDraft>,
) -> AppResult<Json<Product>> {
    validate_product_draft(&draft)?;
    let existing = state
        .db
        .products()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {id}")))?;
    if draft.cafe_id != existing.cafe_id {
        return Err(AppError::BadRequest(
            "A product cannot move to another cafe".to_string(),
        ));
    }

    let product = draft.apply_to(&existing, Utc::now());
    state.db.products().update(&product).await?;

    info!(id = %product.id, by = %claims.sub, "Product updated");
    Ok(Json(product))
}

pub async fn delete(
    State(state): State<AppState>,
    StaffUser(claims): StaffUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.db.products().delete(&id).await?;
    info!(id = %id, by = %claims.sub, "Product deleted");
    Ok(StatusCode::NO_CONTENT)
}
