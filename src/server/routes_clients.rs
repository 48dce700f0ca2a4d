//! Client API routes.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;
use showroom_common::paths::StoragePath;
use showroom_common::EntityKind;
use showroom_db::models::{Client, ClientPatch, NewClient};
use showroom_db::queries::clients;

use super::error::{ApiError, OrRespond};
use super::form::UploadForm;
use super::{parse_id, AppContext, Deleted};

/// Create client routes, mounted at `/clients`.
pub fn client_routes() -> Router<AppContext> {
    Router::new()
        .route("/", get(list_clients).post(create_client))
        .route("/:id", put(update_client).delete(delete_client))
}

const CREATE_REQUIRED: &str = "Name, website, and logo are required";
const UPDATE_REQUIRED: &str = "Name and website are required";

#[derive(Debug, Deserialize)]
pub struct DeleteClientRequest {
    pub logo_url: Option<String>,
}

async fn create_client(
    State(ctx): State<AppContext>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Client>, ApiError> {
    let mut form = UploadForm::read(multipart, "logo", CREATE_REQUIRED).await?;

    let name = form.text("name").map(str::to_string);
    let website = form.text("website").map(str::to_string);
    let (Some(name), Some(website), Some(logo)) = (name, website, form.take_file()) else {
        return Err(ApiError::bad_request(CREATE_REQUIRED));
    };

    let logo_url = ctx
        .images
        .publish(&StoragePath::client(&name), logo.to_vec())
        .await
        .or_respond("Logo upload failed")?;

    let conn = ctx.conn("Failed to add client")?;
    let client = clients::insert_client(
        &conn,
        &NewClient {
            name,
            website,
            logo_url,
        },
    )
    .or_respond("Failed to add client")?;

    tracing::info!(id = client.id, "Created client");
    Ok(Json(client))
}

async fn list_clients(State(ctx): State<AppContext>) -> Result<Json<Vec<Client>>, ApiError> {
    let conn = ctx.conn("Failed to fetch clients")?;
    let clients = clients::list_clients(&conn).or_respond("Failed to fetch clients")?;
    Ok(Json(clients))
}

async fn delete_client(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    body: Option<Json<DeleteClientRequest>>,
) -> Result<Json<Deleted>, ApiError> {
    let id = parse_id(&id)?;
    let Some(logo_url) = body.and_then(|Json(b)| b.logo_url).filter(|u| !u.is_empty()) else {
        return Err(ApiError::bad_request("Logo URL required"));
    };

    let path = ctx.images.resolve(&logo_url).or_respond("Invalid logo URL")?;
    ctx.images
        .remove(&path)
        .await
        .or_respond("Failed to delete logo")?;

    let conn = ctx.conn("Failed to delete client")?;
    let existed = clients::delete_client(&conn, id).or_respond("Failed to delete client")?;
    tracing::info!(id, existed, "Deleted client");

    Ok(Json(Deleted::new(EntityKind::Client)))
}

/// Update name and website. A new logo replaces the stored one.
async fn update_client(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Client>, ApiError> {
    let id = parse_id(&id)?;
    let mut form = UploadForm::read(multipart, "logo", UPDATE_REQUIRED).await?;

    let name = form.text("name").map(str::to_string);
    let website = form.text("website").map(str::to_string);
    let (Some(name), Some(website)) = (name, website) else {
        return Err(ApiError::bad_request(UPDATE_REQUIRED));
    };

    let logo_url = match form.take_file() {
        Some(logo) => {
            let existing = {
                let conn = ctx.conn("Failed to update client")?;
                clients::get_client(&conn, id).or_respond("Failed to update client")?
            };
            let existing = existing.ok_or_else(|| ApiError::not_found("Client not found"))?;

            let webp = ctx
                .images
                .encode(logo.to_vec())
                .await
                .or_respond("Logo upload failed")?;

            if let Some(old_url) = existing.logo_url.as_deref() {
                ctx.images.discard(old_url).await;
            }

            let url = ctx
                .images
                .publish_encoded(&StoragePath::client(&name), webp)
                .await
                .or_respond("Logo upload failed")?;
            Some(url)
        }
        None => None,
    };

    let conn = ctx.conn("Failed to update client")?;
    let patch = ClientPatch {
        name,
        website,
        logo_url,
    };
    let client = clients::update_client(&conn, id, &patch)
        .or_respond("Failed to update client")?
        .ok_or_else(|| ApiError::not_found("Client not found"))?;

    tracing::info!(id, "Updated client");
    Ok(Json(client))
}
