//! Showroom-Common: shared types and pure helpers.
//!
//! This crate holds everything the server and database crates agree on:
//!
//! - **Error Handling**: the [`Error`] taxonomy and its HTTP status mapping
//! - **Entity Kinds**: banners, clients and services, plus the category to
//!   folder table used for service images
//! - **Path Utilities**: filename sanitizing, storage path construction and
//!   the reverse mapping from a public URL back to a bucket path
//!
//! # Examples
//!
//! ```
//! use showroom_common::paths::{resolve_object_path, StoragePath};
//! use showroom_common::CategoryFolders;
//!
//! let folders = CategoryFolders::default();
//! let path = StoragePath::service(folders.folder_for("Knit Showroom"), "Rack A");
//! assert_eq!(path.as_str(), "services/ks/rack_a.webp");
//!
//! let url = "https://host/storage/v1/object/public/gsl/services/ks/rack_a.webp";
//! assert_eq!(resolve_object_path(url, "gsl").unwrap(), path.as_str());
//! ```

pub mod error;
pub mod paths;
pub mod types;

pub use error::{Error, Result};
pub use types::*;
