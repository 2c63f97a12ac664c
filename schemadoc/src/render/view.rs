//! Display-ready projection of a schema document.
//!
//! HTML and Markdown show the same values in the same order, so both
//! templates read from this one projection. Every string here is final;
//! templates do no formatting of their own.

use chrono::{DateTime, Local};
use schemadoc_core::{Column, Constraint, Index, Routine, SchemaDocument, Table, View};

use super::format;

pub(crate) struct DocumentView {
    pub title: String,
    pub generated_at: String,
    pub database_name: String,
    pub version: String,
    pub size: String,
    pub table_count: usize,
    pub view_count: usize,
    pub tables: Vec<TableView>,
    pub views: Vec<ViewView>,
    pub routines: Vec<RoutineView>,
}

pub(crate) struct TableView {
    pub name: String,
    pub description: String,
    pub schema: String,
    pub kind: String,
    pub rows: String,
    pub size: String,
    pub columns: Vec<ColumnView>,
    pub indexes: Vec<IndexView>,
    pub constraints: Vec<ConstraintView>,
}

pub(crate) struct ColumnView {
    pub name: String,
    pub data_type: String,
    pub nullable: String,
    pub default: String,
    pub description: String,
}

pub(crate) struct IndexView {
    pub name: String,
    pub columns: String,
    pub index_type: String,
    pub unique: String,
}

pub(crate) struct ConstraintView {
    pub name: String,
    pub kind: String,
    pub columns: String,
    pub definition: String,
}

pub(crate) struct ViewView {
    pub name: String,
    pub schema: String,
    pub description: String,
    pub definition: String,
}

pub(crate) struct RoutineView {
    pub kind: String,
    pub name: String,
    pub schema: String,
    pub parameters: String,
    /// Empty for procedures
    pub return_type: String,
    pub description: String,
}

impl DocumentView {
    pub fn new(doc: &SchemaDocument, at: &DateTime<Local>) -> Self {
        let info = &doc.database_info;
        Self {
            title: doc.platform_name.clone(),
            generated_at: format::timestamp(at),
            database_name: info.name.clone(),
            version: format::or_na(info.version.as_deref()),
            size: format::or_na(info.size.as_deref()),
            table_count: doc.tables.len(),
            view_count: doc.views.len(),
            tables: doc.tables.iter().map(TableView::from).collect(),
            views: doc.views.iter().map(ViewView::from).collect(),
            routines: doc.routines.iter().map(RoutineView::from).collect(),
        }
    }
}

impl From<&Table> for TableView {
    fn from(table: &Table) -> Self {
        Self {
            name: table.name.clone(),
            description: format::description_or_default(table.description.as_deref()),
            schema: table.schema.clone(),
            kind: table.kind.clone(),
            rows: format::thousands(table.row_count),
            size: format::megabytes(table.size_mb),
            columns: table.columns.iter().map(ColumnView::from).collect(),
            indexes: table.indexes.iter().map(IndexView::from).collect(),
            constraints: table.constraints.iter().map(ConstraintView::from).collect(),
        }
    }
}

impl From<&Column> for ColumnView {
    fn from(column: &Column) -> Self {
        Self {
            name: column.name.clone(),
            data_type: column.data_type.clone(),
            nullable: format::yes_no(column.nullable).to_string(),
            default: column.default.clone().unwrap_or_default(),
            description: column.description.clone().unwrap_or_default(),
        }
    }
}

impl From<&Index> for IndexView {
    fn from(index: &Index) -> Self {
        Self {
            name: index.name.clone(),
            columns: index.columns.join(", "),
            index_type: index.index_type.clone(),
            unique: format::yes_no(index.is_unique).to_string(),
        }
    }
}

impl From<&Constraint> for ConstraintView {
    fn from(constraint: &Constraint) -> Self {
        Self {
            name: constraint.name.clone(),
            kind: constraint.kind.to_string(),
            columns: constraint.columns.join(", "),
            definition: constraint.definition_or_reference.clone().unwrap_or_default(),
        }
    }
}

impl From<&View> for ViewView {
    fn from(view: &View) -> Self {
        Self {
            name: view.name.clone(),
            schema: view.schema.clone(),
            description: format::description_or_default(view.description.as_deref()),
            definition: view.definition.clone(),
        }
    }
}

impl From<&Routine> for RoutineView {
    fn from(routine: &Routine) -> Self {
        Self {
            kind: routine.kind.to_string(),
            name: routine.name.clone(),
            schema: routine.schema.clone(),
            parameters: routine.parameters.clone(),
            return_type: routine.return_type.clone().unwrap_or_default(),
            description: format::description_or_default(routine.description.as_deref()),
        }
    }
}
