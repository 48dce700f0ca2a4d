//! Client database queries.

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};
use showroom_common::{Error, Result};

use crate::models::{timestamp_from_sql, timestamp_to_sql, Client, ClientPatch, NewClient};

/// Expects columns in order: id, name, website, logo_url, created_at.
fn parse_client_row(row: &rusqlite::Row) -> rusqlite::Result<Client> {
    Ok(Client {
        id: row.get(0)?,
        name: row.get(1)?,
        website: row.get(2)?,
        logo_url: row.get(3)?,
        created_at: timestamp_from_sql(4, &row.get::<_, String>(4)?)?,
    })
}

/// Insert a client and return the stored row.
pub fn insert_client(conn: &Connection, client: &NewClient) -> Result<Client> {
    let created_at = Utc::now();

    conn.execute(
        "INSERT INTO clients (name, website, logo_url, created_at)
         VALUES (:name, :website, :logo_url, :created_at)",
        rusqlite::named_params! {
            ":name": &client.name,
            ":website": &client.website,
            ":logo_url": &client.logo_url,
            ":created_at": timestamp_to_sql(&created_at),
        },
    )
    .map_err(|e| Error::database(e.to_string()))?;

    let id = conn.last_insert_rowid();
    get_client(conn, id)?
        .ok_or_else(|| Error::database(format!("client {} vanished after insert", id)))
}

/// Get a client by ID.
pub fn get_client(conn: &Connection, id: i64) -> Result<Option<Client>> {
    conn.query_row(
        "SELECT id, name, website, logo_url, created_at FROM clients WHERE id = :id",
        rusqlite::named_params! { ":id": id },
        parse_client_row,
    )
    .optional()
    .map_err(|e| Error::database(e.to_string()))
}

/// List all clients, newest first.
pub fn list_clients(conn: &Connection) -> Result<Vec<Client>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, name, website, logo_url, created_at
             FROM clients
             ORDER BY created_at DESC, id DESC",
        )
        .map_err(|e| Error::database(e.to_string()))?;

    let clients = stmt
        .query_map([], parse_client_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(clients)
}

/// Update a client's name and website, and its logo URL when one is given.
///
/// # Returns
///
/// * `Ok(Some(Client))` - The row after the update
/// * `Ok(None)` - If no client had that ID
pub fn update_client(conn: &Connection, id: i64, patch: &ClientPatch) -> Result<Option<Client>> {
    let affected = conn
        .execute(
            "UPDATE clients
             SET name = :name,
                 website = :website,
                 logo_url = COALESCE(:logo_url, logo_url)
             WHERE id = :id",
            rusqlite::named_params! {
                ":id": id,
                ":name": &patch.name,
                ":website": &patch.website,
                ":logo_url": &patch.logo_url,
            },
        )
        .map_err(|e| Error::database(e.to_string()))?;

    if affected == 0 {
        return Ok(None);
    }
    get_client(conn, id)
}

/// Delete a client by ID. Returns whether a row was deleted.
pub fn delete_client(conn: &Connection, id: i64) -> Result<bool> {
    let affected = conn
        .execute(
            "DELETE FROM clients WHERE id = :id",
            rusqlite::named_params! { ":id": id },
        )
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(affected > 0)
}
