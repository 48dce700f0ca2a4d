//! Service API routes.
//!
//! Service images are filed under a folder picked from the service's
//! category; see [`showroom_common::CategoryFolders`].

use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;
use showroom_common::paths::StoragePath;
use showroom_common::EntityKind;
use showroom_db::models::{NewService, Service, ServicePatch};
use showroom_db::queries::services;

use super::error::{ApiError, OrRespond};
use super::form::UploadForm;
use super::{parse_id, AppContext, Deleted};

/// Create service routes, mounted at `/services`.
pub fn service_routes() -> Router<AppContext> {
    Router::new()
        .route("/", get(list_services).post(create_service))
        .route("/:id", put(update_service).delete(delete_service))
}

#[derive(Debug, Deserialize)]
pub struct DeleteServiceRequest {
    pub image_url: Option<String>,
}

const CREATE_REQUIRED: &str = "Category, title, and image are required";
const UPDATE_REQUIRED: &str = "Category and title are required";

fn service_path(ctx: &AppContext, category: &str, title: &str) -> StoragePath {
    StoragePath::service(ctx.categories.folder_for(category), title)
}

async fn create_service(
    State(ctx): State<AppContext>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Service>, ApiError> {
    let mut form = UploadForm::read(multipart, "image", CREATE_REQUIRED).await?;

    let category = form.text("category").map(str::to_string);
    let title = form.text("title").map(str::to_string);
    let (Some(category), Some(title), Some(image)) = (category, title, form.take_file()) else {
        return Err(ApiError::bad_request(CREATE_REQUIRED));
    };

    let image_url = ctx
        .images
        .publish(&service_path(&ctx, &category, &title), image.to_vec())
        .await
        .or_respond("Image upload failed")?;

    let conn = ctx.conn("Failed to add service")?;
    let service = services::insert_service(
        &conn,
        &NewService {
            category,
            title,
            image_url,
        },
    )
    .or_respond("Failed to add service")?;

    tracing::info!(id = service.id, category = %service.category, "Created service");
    Ok(Json(service))
}

async fn list_services(State(ctx): State<AppContext>) -> Result<Json<Vec<Service>>, ApiError> {
    let conn = ctx.conn("Failed to fetch services")?;
    let services = services::list_services(&conn).or_respond("Failed to fetch services")?;
    Ok(Json(services))
}

async fn delete_service(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    body: Option<Json<DeleteServiceRequest>>,
) -> Result<Json<Deleted>, ApiError> {
    let id = parse_id(&id)?;
    let Some(image_url) = body.and_then(|Json(b)| b.image_url).filter(|u| !u.is_empty()) else {
        return Err(ApiError::bad_request("Image URL required"));
    };

    let path = ctx.images.resolve(&image_url).or_respond("Invalid image URL")?;
    ctx.images
        .remove(&path)
        .await
        .or_respond("Failed to delete image")?;

    let conn = ctx.conn("Failed to delete service")?;
    let existed = services::delete_service(&conn, id).or_respond("Failed to delete service")?;
    tracing::info!(id, existed, "Deleted service");

    Ok(Json(Deleted::new(EntityKind::Service)))
}

/// Update category and title; with a file, also move the image to the
/// path the new category and title produce.
async fn update_service(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Service>, ApiError> {
    let id = parse_id(&id)?;
    let mut form = UploadForm::read(multipart, "image", UPDATE_REQUIRED).await?;

    let category = form.text("category").map(str::to_string);
    let title = form.text("title").map(str::to_string);
    let (Some(category), Some(title)) = (category, title) else {
        return Err(ApiError::bad_request(UPDATE_REQUIRED));
    };

    let image_url = match form.take_file() {
        Some(image) => {
            let existing = {
                let conn = ctx.conn("Failed to update service")?;
                services::get_service(&conn, id).or_respond("Failed to update service")?
            };
            let existing = existing.ok_or_else(|| ApiError::not_found("Service not found"))?;

            let webp = ctx
                .images
                .encode(image.to_vec())
                .await
                .or_respond("Image upload failed")?;

            if let Some(old_url) = existing.image_url.as_deref() {
                ctx.images.discard(old_url).await;
            }

            let url = ctx
                .images
                .publish_encoded(&service_path(&ctx, &category, &title), webp)
                .await
                .or_respond("Image upload failed")?;
            Some(url)
        }
        None => None,
    };

    let conn = ctx.conn("Failed to update service")?;
    let patch = ServicePatch {
        category,
        title,
        image_url,
    };
    let service = services::update_service(&conn, id, &patch)
        .or_respond("Failed to update service")?
        .ok_or_else(|| ApiError::not_found("Service not found"))?;

    tracing::info!(id, "Updated service");
    Ok(Json(service))
}
