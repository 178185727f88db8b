//! Catalog editor routes.

use askama::Template;
use axum::{
    Router,
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tracing::instrument;

use bazaar_core::{ProductId, ProductImageId};

use crate::{
    db::{ProductRepository, RepositoryError},
    error::{AppError, Result, render},
    filters,
    forms::{
        MAX_ADDITIONAL_IMAGES, MAX_BODY_BYTES, ProductForm, ProductFormError, ProductUpload,
        read_product_upload,
    },
    middleware::{RequireAdminAuth, RequireEditor},
    models::{CurrentAdmin, ProductRecord, ProductSummary},
    state::AppState,
};

/// Build the `/products` router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index).post(create))
        .route("/new", get(new_page))
        .route("/{id}", post(update))
        .route("/{id}/edit", get(edit_page))
        .route("/{id}/delete", post(delete))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
}

#[derive(Template)]
#[template(path = "products/index.html")]
pub struct ProductsTemplate {
    pub current_admin: Option<CurrentAdmin>,
    pub products: Vec<ProductSummary>,
    pub can_edit: bool,
    pub notice: Option<&'static str>,
}

#[derive(Template)]
#[template(path = "products/form.html")]
pub struct ProductFormTemplate {
    pub current_admin: Option<CurrentAdmin>,
    pub title: String,
    pub action: String,
    pub form: ProductForm,
    pub error: Option<String>,
    pub is_edit: bool,
    pub main_image_id: Option<ProductImageId>,
    pub additional_image_ids: Vec<ProductImageId>,
    pub remaining_slots: usize,
}

impl ProductFormTemplate {
    fn for_new(admin: CurrentAdmin, form: ProductForm, error: Option<String>) -> Self {
        Self {
            current_admin: Some(admin),
            title: "New product".to_string(),
            action: "/products".to_string(),
            form,
            error,
            is_edit: false,
            main_image_id: None,
            additional_image_ids: Vec::new(),
            remaining_slots: MAX_ADDITIONAL_IMAGES,
        }
    }

    fn for_edit(
        admin: CurrentAdmin,
        record: &ProductRecord,
        form: ProductForm,
        error: Option<String>,
    ) -> Self {
        Self {
            current_admin: Some(admin),
            title: format!("Edit {}", record.input.name),
            action: format!("/products/{}", record.id),
            form,
            error,
            is_edit: true,
            main_image_id: record.main_image_id,
            additional_image_ids: record.additional_image_ids.clone(),
            remaining_slots: MAX_ADDITIONAL_IMAGES
                .saturating_sub(record.additional_image_ids.len()),
        }
    }
}

/// Query parameters for flash notices.
#[derive(Debug, Deserialize)]
pub struct NoticeQuery {
    pub notice: Option<String>,
}

fn notice_message(code: &str) -> Option<&'static str> {
    match code {
        "created" => Some("Product created."),
        "updated" => Some("Product updated."),
        "deleted" => Some("Product deleted."),
        _ => None,
    }
}

/// Message shown when a save fails on a duplicate SKU.
fn sku_taken(sku: &str) -> String {
    format!("A product with SKU \"{}\" already exists.", sku.trim())
}

fn rerender(template: &ProductFormTemplate) -> Result<Response> {
    Ok((StatusCode::UNPROCESSABLE_ENTITY, render(template)?).into_response())
}

async fn load(state: &AppState, id: ProductId) -> Result<ProductRecord> {
    ProductRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))
}

async fn read_upload(multipart: Multipart) -> Result<ProductUpload> {
    read_product_upload(multipart)
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))
}

/// GET /products
#[instrument(skip(state, admin))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Query(query): Query<NoticeQuery>,
) -> Result<Html<String>> {
    let products = ProductRepository::new(state.pool()).list().await?;
    let can_edit = admin.can_edit();

    render(&ProductsTemplate {
        current_admin: Some(admin),
        products,
        can_edit,
        notice: query.notice.as_deref().and_then(notice_message),
    })
}

/// GET /products/new
pub async fn new_page(RequireEditor(admin): RequireEditor) -> Result<Html<String>> {
    render(&ProductFormTemplate::for_new(
        admin,
        ProductForm::new_product(),
        None,
    ))
}

/// POST /products
#[instrument(skip(state, admin, multipart), fields(admin_id = %admin.id))]
pub async fn create(
    State(state): State<AppState>,
    RequireEditor(admin): RequireEditor,
    multipart: Multipart,
) -> Result<Response> {
    let upload = read_upload(multipart).await?;

    let (input, main_image) = match upload.validate_new() {
        Ok(valid) => valid,
        Err(e) => {
            tracing::debug!(error = %e, "Product form rejected");
            return rerender(&ProductFormTemplate::for_new(
                admin,
                upload.form.clone(),
                Some(e.to_string()),
            ));
        }
    };

    match ProductRepository::new(state.pool())
        .create(&input, Some(main_image), &upload.additional_images)
        .await
    {
        Ok(id) => {
            tracing::info!(product_id = %id, sku = %input.sku, "Product created");
            Ok(Redirect::to("/products?notice=created").into_response())
        }
        Err(RepositoryError::Conflict(_)) => rerender(&ProductFormTemplate::for_new(
            admin,
            upload.form.clone(),
            Some(sku_taken(&input.sku)),
        )),
        Err(e) => Err(e.into()),
    }
}

/// GET /products/{id}/edit
#[instrument(skip(state, admin))]
pub async fn edit_page(
    State(state): State<AppState>,
    RequireEditor(admin): RequireEditor,
    Path(id): Path<ProductId>,
) -> Result<Html<String>> {
    let record = load(&state, id).await?;
    let form = ProductForm::from_input(&record.input);

    render(&ProductFormTemplate::for_edit(admin, &record, form, None))
}

/// POST /products/{id}
#[instrument(skip(state, admin, multipart), fields(admin_id = %admin.id))]
pub async fn update(
    State(state): State<AppState>,
    RequireEditor(admin): RequireEditor,
    Path(id): Path<ProductId>,
    multipart: Multipart,
) -> Result<Response> {
    let record = load(&state, id).await?;
    let upload = read_upload(multipart).await?;

    let input = match upload.validate_existing(record.additional_image_ids.len()) {
        Ok(input) => input,
        Err(e) => {
            tracing::debug!(error = %e, "Product form rejected");
            return rerender(&ProductFormTemplate::for_edit(
                admin,
                &record,
                upload.form.clone(),
                Some(e.to_string()),
            ));
        }
    };

    match ProductRepository::new(state.pool())
        .update(
            id,
            &input,
            upload.main_image.as_ref(),
            &upload.additional_images,
        )
        .await
    {
        Ok(true) => {
            tracing::info!(
                product_id = %id,
                new_main_image = upload.main_image.is_some(),
                added_images = upload.additional_images.len(),
                "Product updated"
            );
            Ok(Redirect::to("/products?notice=updated").into_response())
        }
        Ok(false) => Err(AppError::NotFound("Product".to_string())),
        Err(RepositoryError::Conflict(_)) => rerender(&ProductFormTemplate::for_edit(
            admin,
            &record,
            upload.form.clone(),
            Some(sku_taken(&input.sku)),
        )),
        Err(e) => Err(e.into()),
    }
}

/// POST /products/{id}/delete
#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn delete(
    State(state): State<AppState>,
    RequireEditor(admin): RequireEditor,
    Path(id): Path<ProductId>,
) -> Result<Redirect> {
    if !ProductRepository::new(state.pool()).delete(id).await? {
        return Err(AppError::NotFound("Product".to_string()));
    }

    tracing::info!(product_id = %id, "Product deleted");
    Ok(Redirect::to("/products?notice=deleted"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notices() {
        assert_eq!(notice_message("created"), Some("Product created."));
        assert_eq!(notice_message("<script>"), None);
    }

    #[test]
    fn test_sku_message() {
        assert_eq!(
            sku_taken(" FAB-001 "),
            "A product with SKU \"FAB-001\" already exists."
        );
    }

    #[test]
    fn test_form_error_shown_to_admin() {
        let err = ProductFormError::TooManyImages {
            max: MAX_ADDITIONAL_IMAGES,
        };
        assert_eq!(err.to_string(), "at most 5 additional images are allowed");
    }
}
