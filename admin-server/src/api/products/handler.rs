//! Product API Handlers

use axum::Json;
use axum::extract::{Extension, Multipart, Path, Query, State};
use serde::Serialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{ApprovalTag, ApprovalToggle, Product, ProductCreate, ProductUpdate};
use shared::query::{PaginatedResponse, ProductQuery};
use validator::Validate;

use crate::api::AppResult;
use crate::auth::CurrentUser;
use crate::auth::permissions::approval_permission;
use crate::catalog::images::{process_product_image, product_image_key};
use crate::catalog::{is_published, toggle_approval as toggle};
use crate::db::{categories, producers, products};
use crate::state::ServerState;
use crate::storage::{UploadObject, object_key};

async fn load(state: &ServerState, id: i64) -> AppResult<Product> {
    products::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))
}

/// Reject references to a missing category or producer up front
async fn check_references(
    state: &ServerState,
    category_id: Option<i64>,
    producer_id: Option<i64>,
) -> AppResult<()> {
    if let Some(id) = category_id
        && categories::find_by_id(&state.pool, id).await?.is_none()
    {
        return Err(AppError::new(ErrorCode::CategoryNotFound).with_detail("category_id", id));
    }
    if let Some(id) = producer_id
        && producers::find_by_id(&state.pool, id).await?.is_none()
    {
        return Err(AppError::new(ErrorCode::ProducerNotFound).with_detail("producer_id", id));
    }
    Ok(())
}

/// GET /api/products - filtered, sorted and paginated
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ProductQuery>,
) -> AppResult<Json<PaginatedResponse<Product>>> {
    let all = products::find_all(&state.pool).await?;
    Ok(Json(query.select(&all)))
}

/// GET /api/products/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Product>> {
    Ok(Json(load(&state, id).await?))
}

/// POST /api/products
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<Product>> {
    payload.validate()?;
    tracing::info!(user_id = %current_user.id, sku = %payload.sku, "Creating product");

    check_references(&state, Some(payload.category_id), Some(payload.producer_id)).await?;
    Ok(Json(products::create(&state.pool, &payload).await?))
}

/// PUT /api/products/{id}
pub async fn update(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<Product>> {
    payload.validate()?;
    tracing::info!(user_id = %current_user.id, product_id = %id, "Updating product");

    check_references(&state, payload.category_id, payload.producer_id).await?;
    Ok(Json(products::update(&state.pool, id, &payload).await?))
}

/// DELETE /api/products/{id}
///
/// Stored images are removed best-effort after the row is gone.
pub async fn delete(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    tracing::info!(user_id = %current_user.id, product_id = %id, "Deleting product");

    let product = load(&state, id).await?;
    let deleted = products::delete(&state.pool, id).await?;

    for key in &product.images {
        if let Err(e) = state.storage.delete(key).await {
            tracing::warn!(product_id = %id, key = %key, error = %e, "Failed to delete product image");
        }
    }
    Ok(Json(deleted))
}

#[derive(Serialize)]
pub struct ApprovalResponse {
    pub product: Product,
    pub published: bool,
}

/// POST /api/products/{id}/authorize - toggle one approval tag
pub async fn toggle_approval(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<ApprovalToggle>,
) -> AppResult<Json<ApprovalResponse>> {
    let tag: ApprovalTag = payload.tag.parse().map_err(|msg: String| {
        AppError::with_message(ErrorCode::InvalidApprovalTag, msg).with_detail("tag", payload.tag.as_str())
    })?;
    state
        .policy
        .authorize(&current_user, approval_permission(tag))?;

    let product = load(&state, id).await?;
    let approval = toggle(&product.approval, tag);
    let product = products::set_approval(&state.pool, id, approval).await?;

    tracing::info!(
        user_id = %current_user.id,
        product_id = %id,
        tag = %tag,
        approved = product.has_approval(tag),
        "Product approval toggled"
    );

    let published = is_published(&product);
    Ok(Json(ApprovalResponse { product, published }))
}

#[derive(Serialize)]
pub struct UploadedImage {
    pub original_name: String,
    pub key: String,
}

#[derive(Serialize)]
pub struct FailedUpload {
    pub original_name: String,
    pub error: String,
}

/// Per-file outcome of an image upload; stored files are kept when others fail
#[derive(Serialize)]
pub struct UploadReport {
    pub product: Product,
    pub uploaded: Vec<UploadedImage>,
    pub failed: Vec<FailedUpload>,
}

/// POST /api/products/{id}/images - multipart, one or more `file` fields
pub async fn upload_images(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    mut multipart: Multipart,
) -> AppResult<Json<UploadReport>> {
    load(&state, id).await?;

    let mut files: Vec<(String, Vec<u8>)> = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Invalid multipart request: {e}")))?
    {
        if !matches!(field.name(), Some("file") | Some("files")) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?;
        files.push((filename, data.to_vec()));
    }
    if files.is_empty() {
        return Err(AppError::new(ErrorCode::NoFileProvided));
    }

    let mut failed = Vec::new();
    let mut batch = Vec::new();
    let mut names = Vec::new();
    for (filename, data) in files {
        let name = filename.clone();
        let processed =
            tokio::task::spawn_blocking(move || process_product_image(&data, &filename))
                .await
                .map_err(|e| AppError::internal(format!("Image task failed: {e}")))?;
        match processed {
            Ok(jpeg) => {
                batch.push(UploadObject {
                    key: product_image_key(id),
                    body: jpeg,
                    content_type: Some("image/jpeg".to_string()),
                });
                names.push(name);
            }
            Err(e) => failed.push(FailedUpload {
                original_name: name,
                error: e.message,
            }),
        }
    }

    let mut uploaded = Vec::new();
    for (original_name, result) in names.into_iter().zip(state.storage.upload_all(batch).await) {
        match result {
            Ok(key) => uploaded.push(UploadedImage { original_name, key }),
            Err(e) => {
                tracing::warn!(product_id = %id, error = %e, "Image upload failed");
                failed.push(FailedUpload {
                    original_name,
                    error: AppError::from(e).message,
                });
            }
        }
    }

    let keys: Vec<String> = uploaded.iter().map(|u| u.key.clone()).collect();
    let product = if keys.is_empty() {
        load(&state, id).await?
    } else {
        products::add_images(&state.pool, id, keys).await?
    };

    tracing::info!(
        user_id = %current_user.id,
        product_id = %id,
        uploaded = uploaded.len(),
        failed = failed.len(),
        "Product images uploaded"
    );

    Ok(Json(UploadReport {
        product,
        uploaded,
        failed,
    }))
}

/// DELETE /api/products/{id}/images/{name}
pub async fn delete_image(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path((id, name)): Path<(i64, String)>,
) -> AppResult<Json<Product>> {
    if name.is_empty() || name.contains("..") || name.contains('/') || name.contains('\\') {
        return Err(AppError::validation("Invalid image name"));
    }

    let product = load(&state, id).await?;
    let key = object_key(&format!("products/{id}"), &name);
    if !product.images.contains(&key) {
        return Err(AppError::not_found(format!("Image {name}")));
    }

    state.storage.delete(&key).await?;
    let product = products::remove_image(&state.pool, id, &key).await?;

    tracing::info!(user_id = %current_user.id, product_id = %id, key = %key, "Product image deleted");
    Ok(Json(product))
}
