//! Core data models for schema documentation.
//!
//! A [`SchemaDocument`] is the platform-scoped root of everything the
//! renderers read: database information, tables (with their columns,
//! indexes and constraints), views and routines. Documents are built once
//! (from sample data or a loaded file) and never mutated afterwards.
//!
//! The serde representation is the on-disk document format. Field names
//! follow the catalog-style keys used by schema exports (`table_name`,
//! `column_name`, `is_nullable`, ...), which the JSON export passes
//! through unchanged.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// Database platforms with built-in sample documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    PostgreSQL,
    Oracle,
    SqlServer,
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::PostgreSQL => write!(f, "PostgreSQL"),
            Platform::Oracle => write!(f, "Oracle"),
            Platform::SqlServer => write!(f, "SQL Server"),
        }
    }
}

impl std::str::FromStr for Platform {
    type Err = crate::SchemaDocError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized: String = value
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "postgresql" | "postgres" | "pg" => Ok(Platform::PostgreSQL),
            "oracle" => Ok(Platform::Oracle),
            "sqlserver" | "mssql" => Ok(Platform::SqlServer),
            _ => Err(crate::SchemaDocError::configuration(format!(
                "Unknown platform '{}'. Supported platforms: PostgreSQL, Oracle, SQL Server",
                value
            ))),
        }
    }
}

impl Platform {
    /// All platforms, in presentation order
    pub const ALL: [Platform; 3] = [Platform::PostgreSQL, Platform::Oracle, Platform::SqlServer];

    /// Default listener port for the platform
    pub fn default_port(self) -> u16 {
        match self {
            Platform::PostgreSQL => 5432,
            Platform::Oracle => 1521,
            Platform::SqlServer => 1433,
        }
    }
}

/// Database-level information shown in every overview section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseInfo {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub last_backup: Option<String>,
}

impl DatabaseInfo {
    /// Creates database info with only a name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            size: None,
            created: None,
            last_backup: None,
        }
    }
}

/// Table column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    #[serde(rename = "column_name")]
    pub name: String,
    pub data_type: String,
    #[serde(rename = "is_nullable")]
    pub nullable: bool,
    #[serde(default)]
    pub default: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Table index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Index {
    #[serde(rename = "index_name")]
    pub name: String,
    pub columns: Vec<String>,
    pub index_type: String,
    pub is_unique: bool,
}

/// Kinds of table constraints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstraintKind {
    #[serde(rename = "PRIMARY KEY")]
    PrimaryKey,
    #[serde(rename = "UNIQUE")]
    Unique,
    #[serde(rename = "CHECK")]
    Check,
    #[serde(rename = "FOREIGN KEY")]
    ForeignKey,
}

impl std::fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConstraintKind::PrimaryKey => write!(f, "PRIMARY KEY"),
            ConstraintKind::Unique => write!(f, "UNIQUE"),
            ConstraintKind::Check => write!(f, "CHECK"),
            ConstraintKind::ForeignKey => write!(f, "FOREIGN KEY"),
        }
    }
}

/// Table constraint.
///
/// `definition_or_reference` holds the check expression for CHECK
/// constraints and the referenced target (e.g. `customers(customer_id)`)
/// for foreign keys. On disk it is written as `references` for foreign
/// keys and `definition` otherwise; either key is accepted when reading.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Constraint {
    #[serde(rename = "constraint_name")]
    pub name: String,
    #[serde(rename = "constraint_type")]
    pub kind: ConstraintKind,
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(rename = "definition", alias = "references", default)]
    pub definition_or_reference: Option<String>,
}

impl Serialize for Constraint {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let field_count = if self.definition_or_reference.is_some() { 4 } else { 3 };
        let mut state = serializer.serialize_struct("Constraint", field_count)?;
        state.serialize_field("constraint_name", &self.name)?;
        state.serialize_field("constraint_type", &self.kind)?;
        state.serialize_field("columns", &self.columns)?;
        if let Some(value) = &self.definition_or_reference {
            let key = if self.kind == ConstraintKind::ForeignKey {
                "references"
            } else {
                "definition"
            };
            state.serialize_field(key, value)?;
        }
        state.end()
    }
}

impl Constraint {
    /// Name of the referenced table for foreign keys.
    ///
    /// Accepts `table(col)`, `schema.table(col)` and bare `table`.
    pub fn referenced_table(&self) -> Option<&str> {
        if self.kind != ConstraintKind::ForeignKey {
            return None;
        }
        let target = self.definition_or_reference.as_deref()?;
        let table = target.split('(').next().unwrap_or(target).trim();
        let table = table.rsplit('.').next().unwrap_or(table).trim();
        if table.is_empty() { None } else { Some(table) }
    }
}

/// Database table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    #[serde(rename = "table_name")]
    pub name: String,
    pub schema: String,
    #[serde(rename = "table_type")]
    pub kind: String,
    pub row_count: u64,
    pub size_mb: f64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub indexes: Vec<Index>,
    #[serde(default)]
    pub constraints: Vec<Constraint>,
}

impl Table {
    /// Looks up a column by exact name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// Database view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct View {
    #[serde(rename = "view_name")]
    pub name: String,
    pub schema: String,
    pub definition: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Routine kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutineKind {
    Function,
    Procedure,
}

impl std::fmt::Display for RoutineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoutineKind::Function => write!(f, "Function"),
            RoutineKind::Procedure => write!(f, "Procedure"),
        }
    }
}

/// Stored function or procedure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Routine {
    #[serde(rename = "routine_name", alias = "function_name", alias = "procedure_name")]
    pub name: String,
    pub schema: String,
    #[serde(rename = "routine_type")]
    pub kind: RoutineKind,
    #[serde(default)]
    pub parameters: String,
    #[serde(default)]
    pub return_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Complete, platform-scoped schema document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDocument {
    #[serde(rename = "platform")]
    pub platform_name: String,
    pub database_info: DatabaseInfo,
    #[serde(default)]
    pub tables: Vec<Table>,
    #[serde(default)]
    pub views: Vec<View>,
    #[serde(default)]
    pub routines: Vec<Routine>,
}

impl SchemaDocument {
    /// Creates an empty document for a platform
    pub fn new(platform_name: impl Into<String>, database_info: DatabaseInfo) -> Self {
        Self {
            platform_name: platform_name.into(),
            database_info,
            tables: Vec::new(),
            views: Vec::new(),
            routines: Vec::new(),
        }
    }

    /// Lowercased platform name used as the stem of exported file names
    pub fn file_stem(&self) -> String {
        self.platform_name
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_")
            .to_lowercase()
    }

    /// Looks up a table by exact name
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Stored functions, in document order
    pub fn functions(&self) -> impl Iterator<Item = &Routine> {
        self.routines
            .iter()
            .filter(|r| r.kind == RoutineKind::Function)
    }

    /// Stored procedures, in document order
    pub fn procedures(&self) -> impl Iterator<Item = &Routine> {
        self.routines
            .iter()
            .filter(|r| r.kind == RoutineKind::Procedure)
    }

    /// Sum of row counts across all tables
    pub fn total_rows(&self) -> u64 {
        self.tables
            .iter()
            .fold(0u64, |acc, t| acc.saturating_add(t.row_count))
    }

    /// Sum of table sizes in megabytes
    pub fn total_size_mb(&self) -> f64 {
        self.tables.iter().map(|t| t.size_mb).sum()
    }

    /// Number of columns across all tables
    pub fn total_columns(&self) -> usize {
        self.tables.iter().map(|t| t.columns.len()).sum()
    }

    /// Number of indexes across all tables
    pub fn total_indexes(&self) -> usize {
        self.tables.iter().map(|t| t.indexes.len()).sum()
    }

    /// Gets the total number of documented objects (tables, views, routines)
    pub fn object_count(&self) -> usize {
        self.tables.len() + self.views.len() + self.routines.len()
    }
}

#[cfg(test)]
#[path = "models_tests.rs"]
mod tests;
