//! Schema importers: restricted SQL DDL and tolerant JSON exports.

pub mod ddl;
pub mod error;
pub mod importer;
pub mod normalize;
pub mod options;

pub use ddl::parse_ddl;
pub use error::{ImportError, Result};
pub use importer::{DdlImporter, ImportFormat, Importer, JsonImporter, importer_for};
pub use normalize::{normalize_schema, normalize_schema_str};
pub use options::ImportOptions;

pub use modelforge_core::ImportedSchema;
