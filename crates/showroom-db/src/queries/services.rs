//! Service database queries.

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};
use showroom_common::{Error, Result};

use crate::models::{timestamp_from_sql, timestamp_to_sql, NewService, Service, ServicePatch};

/// Expects columns in order: id, category, title, image_url, created_at.
fn parse_service_row(row: &rusqlite::Row) -> rusqlite::Result<Service> {
    Ok(Service {
        id: row.get(0)?,
        category: row.get(1)?,
        title: row.get(2)?,
        image_url: row.get(3)?,
        created_at: timestamp_from_sql(4, &row.get::<_, String>(4)?)?,
    })
}

/// Insert a service and return the stored row.
pub fn insert_service(conn: &Connection, service: &NewService) -> Result<Service> {
    let created_at = Utc::now();

    conn.execute(
        "INSERT INTO services (category, title, image_url, created_at)
         VALUES (:category, :title, :image_url, :created_at)",
        rusqlite::named_params! {
            ":category": &service.category,
            ":title": &service.title,
            ":image_url": &service.image_url,
            ":created_at": timestamp_to_sql(&created_at),
        },
    )
    .map_err(|e| Error::database(e.to_string()))?;

    let id = conn.last_insert_rowid();
    get_service(conn, id)?
        .ok_or_else(|| Error::database(format!("service {} vanished after insert", id)))
}

/// Get a service by ID.
pub fn get_service(conn: &Connection, id: i64) -> Result<Option<Service>> {
    conn.query_row(
        "SELECT id, category, title, image_url, created_at FROM services WHERE id = :id",
        rusqlite::named_params! { ":id": id },
        parse_service_row,
    )
    .optional()
    .map_err(|e| Error::database(e.to_string()))
}

/// List all services, newest first.
pub fn list_services(conn: &Connection) -> Result<Vec<Service>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, category, title, image_url, created_at
             FROM services
             ORDER BY created_at DESC, id DESC",
        )
        .map_err(|e| Error::database(e.to_string()))?;

    let services = stmt
        .query_map([], parse_service_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(services)
}

/// Update a service's category and title, and its image URL when one is given.
///
/// Returns `Ok(None)` if no service had that ID.
pub fn update_service(
    conn: &Connection,
    id: i64,
    patch: &ServicePatch,
) -> Result<Option<Service>> {
    let affected = conn
        .execute(
            "UPDATE services
             SET category = :category,
                 title = :title,
                 image_url = COALESCE(:image_url, image_url)
             WHERE id = :id",
            rusqlite::named_params! {
                ":id": id,
                ":category": &patch.category,
                ":title": &patch.title,
                ":image_url": &patch.image_url,
            },
        )
        .map_err(|e| Error::database(e.to_string()))?;

    if affected == 0 {
        return Ok(None);
    }
    get_service(conn, id)
}

/// Delete a service by ID. Returns whether a row was deleted.
pub fn delete_service(conn: &Connection, id: i64) -> Result<bool> {
    let affected = conn
        .execute(
            "DELETE FROM services WHERE id = :id",
            rusqlite::named_params! { ":id": id },
        )
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(affected > 0)
}
