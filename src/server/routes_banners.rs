//! Banner API routes.
//!
//! Banners are a title plus one image. They can be created, listed and
//! deleted; there is no update.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    routing::{delete, get},
    Json, Router,
};
use serde::Deserialize;
use showroom_common::paths::StoragePath;
use showroom_common::EntityKind;
use showroom_db::models::{Banner, NewBanner};
use showroom_db::queries::banners;

use super::error::{ApiError, OrRespond};
use super::form::UploadForm;
use super::{parse_id, AppContext, Deleted};

const TITLE_AND_IMAGE_REQUIRED: &str = "Title and image required";

/// Create banner routes, mounted at `/banners`.
pub fn banner_routes() -> Router<AppContext> {
    Router::new()
        .route("/", get(list_banners).post(create_banner))
        .route("/:id", delete(delete_banner))
}

#[derive(Debug, Deserialize)]
pub struct DeleteBannerRequest {
    pub image_url: Option<String>,
}

/// Upload a banner image and insert the banner.
async fn create_banner(
    State(ctx): State<AppContext>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Banner>, ApiError> {
    let mut form = UploadForm::read(multipart, "image", TITLE_AND_IMAGE_REQUIRED).await?;

    let title = form.text("title").map(str::to_string);
    let (Some(title), Some(image)) = (title, form.take_file()) else {
        return Err(ApiError::bad_request(TITLE_AND_IMAGE_REQUIRED));
    };

    let path = StoragePath::banner(&title);
    let image_url = ctx
        .images
        .publish(&path, image.to_vec())
        .await
        .or_respond("Image upload failed")?;

    let conn = ctx.conn("Failed to add banner")?;
    let banner = banners::insert_banner(&conn, &NewBanner { title, image_url })
        .or_respond("Failed to add banner")?;

    tracing::info!(id = banner.id, "Created banner");
    Ok(Json(banner))
}

/// List banners, newest first.
async fn list_banners(State(ctx): State<AppContext>) -> Result<Json<Vec<Banner>>, ApiError> {
    let conn = ctx.conn("Failed to fetch banners")?;
    let banners = banners::list_banners(&conn).or_respond("Failed to fetch banners")?;
    Ok(Json(banners))
}

/// Remove the banner's image, then its row.
async fn delete_banner(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    body: Option<Json<DeleteBannerRequest>>,
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

    let conn = ctx.conn("Failed to delete banner")?;
    let existed = banners::delete_banner(&conn, id).or_respond("Failed to delete banner")?;
    tracing::info!(id, existed, "Deleted banner");

    Ok(Json(Deleted::new(EntityKind::Banner)))
}
