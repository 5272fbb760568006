use modelforge_core::ImportedSchema;

use crate::error::Result;
use crate::options::ImportOptions;
use crate::{ddl, normalize};

/// Supported import inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    Sql,
    Json,
}

/// Trait implemented by sources that turn raw text into canonical entities.
pub trait Importer {
    /// Returns the format identifier (e.g. `sql`).
    fn format(&self) -> &'static str;

    /// Parse the input and return the entities and relations it describes.
    fn import(&self, input: &str) -> Result<ImportedSchema>;
}

/// `CREATE TABLE` scripts. Yields no relations.
#[derive(Debug, Default, Clone)]
pub struct DdlImporter;

impl Importer for DdlImporter {
    fn format(&self) -> &'static str {
        "sql"
    }

    fn import(&self, input: &str) -> Result<ImportedSchema> {
        Ok(ImportedSchema {
            entities: ddl::parse_ddl(input)?,
            relations: Vec::new(),
        })
    }
}

/// JSON schema exports in any of the tolerated shapes.
#[derive(Debug, Default, Clone)]
pub struct JsonImporter {
    pub options: ImportOptions,
}

impl Importer for JsonImporter {
    fn format(&self) -> &'static str {
        "json"
    }

    fn import(&self, input: &str) -> Result<ImportedSchema> {
        normalize::normalize_schema_str(input, &self.options)
    }
}

pub fn importer_for(format: ImportFormat, options: ImportOptions) -> Box<dyn Importer> {
    match format {
        ImportFormat::Sql => Box::new(DdlImporter),
        ImportFormat::Json => Box::new(JsonImporter { options }),
    }
}
