//! Banner database queries.

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};
use showroom_common::{Error, Result};

use crate::models::{timestamp_from_sql, timestamp_to_sql, Banner, NewBanner};

/// Expects columns in order: id, title, image_url, created_at.
fn parse_banner_row(row: &rusqlite::Row) -> rusqlite::Result<Banner> {
    Ok(Banner {
        id: row.get(0)?,
        title: row.get(1)?,
        image_url: row.get(2)?,
        created_at: timestamp_from_sql(3, &row.get::<_, String>(3)?)?,
    })
}

/// Insert a banner and return the stored row.
pub fn insert_banner(conn: &Connection, banner: &NewBanner) -> Result<Banner> {
    let created_at = Utc::now();

    conn.execute(
        "INSERT INTO banners (title, image_url, created_at)
         VALUES (:title, :image_url, :created_at)",
        rusqlite::named_params! {
            ":title": &banner.title,
            ":image_url": &banner.image_url,
            ":created_at": timestamp_to_sql(&created_at),
        },
    )
    .map_err(|e| Error::database(e.to_string()))?;

    let id = conn.last_insert_rowid();
    get_banner(conn, id)?
        .ok_or_else(|| Error::database(format!("banner {} vanished after insert", id)))
}

/// Get a banner by ID.
pub fn get_banner(conn: &Connection, id: i64) -> Result<Option<Banner>> {
    conn.query_row(
        "SELECT id, title, image_url, created_at FROM banners WHERE id = :id",
        rusqlite::named_params! { ":id": id },
        parse_banner_row,
    )
    .optional()
    .map_err(|e| Error::database(e.to_string()))
}

/// List all banners, newest first.
pub fn list_banners(conn: &Connection) -> Result<Vec<Banner>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, title, image_url, created_at
             FROM banners
             ORDER BY created_at DESC, id DESC",
        )
        .map_err(|e| Error::database(e.to_string()))?;

    let banners = stmt
        .query_map([], parse_banner_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(banners)
}

/// Delete a banner by ID.
///
/// # Returns
///
/// * `Ok(true)` - If a row was deleted
/// * `Ok(false)` - If no banner had that ID
pub fn delete_banner(conn: &Connection, id: i64) -> Result<bool> {
    let affected = conn
        .execute(
            "DELETE FROM banners WHERE id = :id",
            rusqlite::named_params! { ":id": id },
        )
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{get_conn, init_memory_pool};

    fn new_banner(title: &str) -> NewBanner {
        NewBanner {
            title: title.to_string(),
            image_url: format!(
                "https://host/storage/v1/object/public/gsl/banners/{}.webp",
                title.to_lowercase()
            ),
        }
    }

    #[test]
    fn test_insert_and_get() {
        let pool = init_memory_pool().unwrap();
        let conn = get_conn(&pool).unwrap();

        let banner = insert_banner(&conn, &new_banner("Spring")).unwrap();
        assert!(banner.id > 0);
        assert_eq!(banner.title, "Spring");

        let fetched = get_banner(&conn, banner.id).unwrap().unwrap();
        assert_eq!(fetched, banner);
    }

    #[test]
    fn test_get_missing() {
        let pool = init_memory_pool().unwrap();
        let conn = get_conn(&pool).unwrap();
        assert!(get_banner(&conn, 42).unwrap().is_none());
    }

    #[test]
    fn test_list_newest_first() {
        let pool = init_memory_pool().unwrap();
        let conn = get_conn(&pool).unwrap();

        let first = insert_banner(&conn, &new_banner("First")).unwrap();
        let second = insert_banner(&conn, &new_banner("Second")).unwrap();
        let third = insert_banner(&conn, &new_banner("Third")).unwrap();

        let ids: Vec<i64> = list_banners(&conn).unwrap().iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![third.id, second.id, first.id]);
    }

    #[test]
    fn test_list_empty() {
        let pool = init_memory_pool().unwrap();
        let conn = get_conn(&pool).unwrap();
        assert!(list_banners(&conn).unwrap().is_empty());
    }

    #[test]
    fn test_delete() {
        let pool = init_memory_pool().unwrap();
        let conn = get_conn(&pool).unwrap();

        let banner = insert_banner(&conn, &new_banner("Gone")).unwrap();
        assert!(delete_banner(&conn, banner.id).unwrap());
        assert!(get_banner(&conn, banner.id).unwrap().is_none());

        // Deleting again matches nothing
        assert!(!delete_banner(&conn, banner.id).unwrap());
    }
}
