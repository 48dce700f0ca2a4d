//! Showroom-DB: record repository for banners, clients and services.
//!
//! SQLite through rusqlite with r2d2 connection pooling.
//!
//! # Modules
//!
//! - `migrations` - Embedded schema migrations
//! - `pool` - Connection pool management
//! - `models` - Row types and insert/update payloads
//! - `queries` - Per-table insert, list, get, update and delete
//!
//! # Example
//!
//! ```
//! use showroom_db::pool::{init_memory_pool, get_conn};
//! use showroom_db::models::NewBanner;
//! use showroom_db::queries::banners;
//!
//! let pool = init_memory_pool().unwrap();
//! let conn = get_conn(&pool).unwrap();
//!
//! let banner = banners::insert_banner(&conn, &NewBanner {
//!     title: "Spring Sale".into(),
//!     image_url: "https://host/storage/v1/object/public/gsl/banners/spring_sale.webp".into(),
//! }).unwrap();
//! assert_eq!(banners::list_banners(&conn).unwrap().len(), 1);
//! # let _ = banner;
//! ```

pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;
