//! Cross-platform schema comparison.
//!
//! Tables and columns are paired by normalized name (case and
//! underscores ignored), so `customer_id`, `CUSTOMER_ID` and `CustomerID`
//! all match. Each paired column is classified by how its data type
//! carries over to the other platform.

use schemadoc_core::{Result, SchemaDocError, SchemaDocument, Table};
use serde::Serialize;

use crate::render::format;

/// Object counts and totals for one document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformStats {
    pub platform: String,
    pub tables: usize,
    pub views: usize,
    pub functions: usize,
    pub procedures: usize,
    pub total_rows: u64,
    pub total_size_mb: f64,
}

impl PlatformStats {
    pub fn from_document(doc: &SchemaDocument) -> Self {
        Self {
            platform: doc.platform_name.clone(),
            tables: doc.tables.len(),
            views: doc.views.len(),
            functions: doc.functions().count(),
            procedures: doc.procedures().count(),
            total_rows: doc.total_rows(),
            total_size_mb: doc.total_size_mb(),
        }
    }
}

/// Broad grouping of column data types across platforms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TypeFamily {
    Integer,
    Numeric,
    Text,
    Temporal,
    Boolean,
    Json,
    Binary,
    Other,
}

impl TypeFamily {
    /// Classifies a declared type such as `VARCHAR(50)` or `INT IDENTITY(1,1)`.
    pub fn of(data_type: &str) -> Self {
        let upper = data_type.trim().to_ascii_uppercase();
        let base = upper
            .split(|c: char| c == '(' || c.is_whitespace())
            .next()
            .unwrap_or_default();
        let args = upper
            .split_once('(')
            .and_then(|(_, rest)| rest.split_once(')'))
            .map(|(inner, _)| inner);

        match base {
            "SERIAL" | "BIGSERIAL" | "SMALLSERIAL" | "INT" | "INTEGER" | "BIGINT" | "SMALLINT"
            | "TINYINT" => TypeFamily::Integer,
            "NUMBER" => match args.and_then(|a| a.split_once(',')) {
                Some((_, scale)) if scale.trim() != "0" => TypeFamily::Numeric,
                _ => TypeFamily::Integer,
            },
            "DECIMAL" | "NUMERIC" | "FLOAT" | "REAL" | "DOUBLE" | "MONEY" | "SMALLMONEY" => {
                TypeFamily::Numeric
            }
            "VARCHAR" | "VARCHAR2" | "NVARCHAR" | "NVARCHAR2" | "CHAR" | "NCHAR" | "TEXT"
            | "NTEXT" | "CLOB" | "NCLOB" => TypeFamily::Text,
            "DATE" | "TIME" | "TIMESTAMP" | "TIMESTAMPTZ" | "DATETIME" | "DATETIME2"
            | "SMALLDATETIME" | "DATETIMEOFFSET" => TypeFamily::Temporal,
            "BOOLEAN" | "BOOL" | "BIT" => TypeFamily::Boolean,
            "JSON" | "JSONB" => TypeFamily::Json,
            "BYTEA" | "BLOB" | "BINARY" | "VARBINARY" | "RAW" | "IMAGE" => TypeFamily::Binary,
            _ => TypeFamily::Other,
        }
    }
}

/// How a column type carries over between platforms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Compatibility {
    /// Same declared type
    Identical,
    /// Different spelling within one type family
    SameFamily,
    RequiresConversion,
}

impl Compatibility {
    pub fn classify(source_type: &str, target_type: &str) -> Self {
        if normalize_type(source_type) == normalize_type(target_type) {
            return Compatibility::Identical;
        }
        let family = TypeFamily::of(source_type);
        if family != TypeFamily::Other && family == TypeFamily::of(target_type) {
            Compatibility::SameFamily
        } else {
            Compatibility::RequiresConversion
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Compatibility::Identical => "Identical",
            Compatibility::SameFamily => "Compatible",
            Compatibility::RequiresConversion => "Requires conversion",
        }
    }
}

fn normalize_type(data_type: &str) -> String {
    data_type
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_uppercase()
}

/// Lowercase with underscores removed
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnMapping {
    pub source_column: String,
    pub source_type: String,
    pub target_column: String,
    pub target_type: String,
    pub compatibility: Compatibility,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableMapping {
    pub source_table: String,
    pub target_table: String,
    pub columns: Vec<ColumnMapping>,
    /// Source columns with no counterpart in the target table
    pub source_only: Vec<String>,
    pub target_only: Vec<String>,
}

impl TableMapping {
    fn between(source: &Table, target: &Table) -> Self {
        let mut columns = Vec::new();
        let mut source_only = Vec::new();

        for column in &source.columns {
            let key = normalize_name(&column.name);
            match target
                .columns
                .iter()
                .find(|c| normalize_name(&c.name) == key)
            {
                Some(other) => columns.push(ColumnMapping {
                    source_column: column.name.clone(),
                    source_type: column.data_type.clone(),
                    target_column: other.name.clone(),
                    target_type: other.data_type.clone(),
                    compatibility: Compatibility::classify(&column.data_type, &other.data_type),
                }),
                None => source_only.push(column.name.clone()),
            }
        }

        let target_only = target
            .columns
            .iter()
            .filter(|c| !columns.iter().any(|m| m.target_column == c.name))
            .map(|c| c.name.clone())
            .collect();

        Self {
            source_table: source.name.clone(),
            target_table: target.name.clone(),
            columns,
            source_only,
            target_only,
        }
    }

    /// Number of paired columns needing conversion
    pub fn conversions(&self) -> usize {
        self.columns
            .iter()
            .filter(|c| c.compatibility == Compatibility::RequiresConversion)
            .count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    pub source: PlatformStats,
    pub target: PlatformStats,
    pub tables: Vec<TableMapping>,
    pub source_only_tables: Vec<String>,
    pub target_only_tables: Vec<String>,
}

impl ComparisonReport {
    pub fn to_markdown(&self) -> String {
        let (a, b) = (&self.source.platform, &self.target.platform);
        let mut out = format!("# Cross-Platform Comparison: {} vs {}\n\n", a, b);

        out.push_str("## Schema Statistics\n\n");
        out.push_str(&format!("| Metric | {} | {} |\n|--------|------|------|\n", a, b));
        let stats = [
            ("Tables", self.source.tables.to_string(), self.target.tables.to_string()),
            ("Views", self.source.views.to_string(), self.target.views.to_string()),
            ("Functions", self.source.functions.to_string(), self.target.functions.to_string()),
            ("Procedures", self.source.procedures.to_string(), self.target.procedures.to_string()),
            (
                "Total Rows",
                format::thousands(self.source.total_rows),
                format::thousands(self.target.total_rows),
            ),
            (
                "Total Size",
                format::megabytes(self.source.total_size_mb),
                format::megabytes(self.target.total_size_mb),
            ),
        ];
        for (metric, left, right) in stats {
            out.push_str(&format!("| {} | {} | {} |\n", metric, left, right));
        }

        out.push_str("\n## Data Type Mappings\n");
        for table in &self.tables {
            out.push_str(&format!(
                "\n### {} -> {}\n\n| Column | {} Type | {} Type | Compatibility |\n|--------|------|------|---------------|\n",
                table.source_table, table.target_table, a, b
            ));
            for column in &table.columns {
                out.push_str(&format!(
                    "| {} | {} | {} | {} |\n",
                    column.source_column,
                    column.source_type,
                    column.target_type,
                    column.compatibility.label()
                ));
            }
            if !table.source_only.is_empty() {
                out.push_str(&format!("\nOnly in {}: {}\n", a, table.source_only.join(", ")));
            }
            if !table.target_only.is_empty() {
                out.push_str(&format!("\nOnly in {}: {}\n", b, table.target_only.join(", ")));
            }
        }

        if !self.source_only_tables.is_empty() || !self.target_only_tables.is_empty() {
            out.push_str("\n## Unmatched Tables\n\n");
            for name in &self.source_only_tables {
                out.push_str(&format!("- {} (only in {})\n", name, a));
            }
            for name in &self.target_only_tables {
                out.push_str(&format!("- {} (only in {})\n", name, b));
            }
        }
        out
    }
}

/// Compares two documents from different platforms.
///
/// # Errors
/// Returns a configuration error when both documents are from the same platform.
pub fn compare(source: &SchemaDocument, target: &SchemaDocument) -> Result<ComparisonReport> {
    if source
        .platform_name
        .eq_ignore_ascii_case(&target.platform_name)
    {
        return Err(SchemaDocError::configuration(format!(
            "Cannot compare {} with itself; choose two different platforms",
            source.platform_name
        )));
    }

    let mut tables = Vec::new();
    let mut source_only_tables = Vec::new();
    for table in &source.tables {
        let key = normalize_name(&table.name);
        match target.tables.iter().find(|t| normalize_name(&t.name) == key) {
            Some(other) => tables.push(TableMapping::between(table, other)),
            None => source_only_tables.push(table.name.clone()),
        }
    }
    let target_only_tables = target
        .tables
        .iter()
        .filter(|t| !tables.iter().any(|m| m.target_table == t.name))
        .map(|t| t.name.clone())
        .collect();

    tracing::info!(
        "Compared {} with {}: {} matched tables",
        source.platform_name,
        target.platform_name,
        tables.len()
    );

    Ok(ComparisonReport {
        source: PlatformStats::from_document(source),
        target: PlatformStats::from_document(target),
        tables,
        source_only_tables,
        target_only_tables,
    })
}
