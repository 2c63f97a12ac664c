//! Logical content of the PDF, independent of page geometry.
//!
//! The story is a flat list of blocks. Layout turns it into positioned
//! text on pages; keeping the two apart lets tests inspect content
//! without decoding PDF bytes.

use chrono::{DateTime, Local};
use schemadoc_core::{DocumentationOptions, Routine, SchemaDocument, Table, View};

use super::truncate::{self, truncate};
use crate::render::format;

const INCH_MM: f32 = 25.4;

/// Tables per group; a page break follows each full group.
pub const TABLES_PER_PAGE: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Title(String),
    Heading(String),
    SubHeading(String),
    /// Small heading above a table
    Minor(String),
    Paragraph(String),
    /// Monospaced text, wrapped but otherwise verbatim
    Code(String),
    Table {
        header: Vec<String>,
        rows: Vec<Vec<String>>,
        widths_mm: Vec<f32>,
    },
    Spacer(f32),
    PageBreak,
}

fn widths(inches: &[f32]) -> Vec<f32> {
    inches.iter().map(|w| w * INCH_MM).collect()
}

fn row<const N: usize>(cells: [&str; N]) -> Vec<String> {
    cells.iter().map(|c| (*c).to_string()).collect()
}

fn table(header: &[&str], rows: Vec<Vec<String>>, inches: &[f32]) -> Block {
    Block::Table {
        header: header.iter().map(|h| (*h).to_string()).collect(),
        rows,
        widths_mm: widths(inches),
    }
}

/// Section numbers shared by the table of contents and the body
struct Sections {
    options: usize,
    overview: usize,
    tables: usize,
    views: Option<usize>,
    routines: Option<usize>,
}

impl Sections {
    fn for_document(doc: &SchemaDocument) -> Self {
        let views = (!doc.views.is_empty()).then_some(4);
        let routines = (!doc.routines.is_empty()).then(|| views.map_or(4, |n| n + 1));
        Self {
            options: 1,
            overview: 2,
            tables: 3,
            views,
            routines,
        }
    }
}

/// Builds the story for a document.
pub fn build_story(
    doc: &SchemaDocument,
    options: &DocumentationOptions,
    at: &DateTime<Local>,
) -> Vec<Block> {
    let sections = Sections::for_document(doc);
    let mut story = Vec::new();

    cover(&mut story, doc, options, at);
    contents(&mut story, doc, &sections);
    options_section(&mut story, options, sections.options);
    overview(&mut story, doc, sections.overview);

    story.push(Block::Heading(format!("{}. Tables Documentation", sections.tables)));
    for (i, t) in doc.tables.iter().enumerate() {
        table_section(&mut story, t, sections.tables, i + 1);
        if (i + 1) % TABLES_PER_PAGE == 0 {
            story.push(Block::PageBreak);
        }
    }

    if let Some(number) = sections.views {
        story.push(Block::PageBreak);
        story.push(Block::Heading(format!("{}. Views Documentation", number)));
        for view in &doc.views {
            view_section(&mut story, view);
        }
    }

    if let Some(number) = sections.routines {
        story.push(Block::PageBreak);
        story.push(Block::Heading(format!("{}. Functions & Procedures", number)));
        for routine in doc.functions().chain(doc.procedures()) {
            routine_section(&mut story, routine);
        }
    }

    story
}

fn cover(
    story: &mut Vec<Block>,
    doc: &SchemaDocument,
    options: &DocumentationOptions,
    at: &DateTime<Local>,
) {
    story.push(Block::Spacer(2.0 * INCH_MM));
    story.push(Block::Title(format!("{} Database", doc.platform_name)));
    story.push(Block::Title("Complete Schema Documentation".to_string()));
    story.push(Block::Spacer(INCH_MM));
    story.push(Block::Paragraph(format!("Generated on {}", at.format("%B %d, %Y"))));
    story.push(Block::Paragraph(format!("Time: {}", at.format("%I:%M %p"))));
    story.push(Block::Spacer(0.5 * INCH_MM));
    story.push(Block::Heading("Documentation Options".to_string()));
    for entry in options.entries() {
        story.push(Block::Paragraph(format!("- {}: {}", entry.label, entry.status())));
    }
    story.push(Block::PageBreak);
}

fn contents(story: &mut Vec<Block>, doc: &SchemaDocument, sections: &Sections) {
    story.push(Block::Heading("Table of Contents".to_string()));
    story.push(Block::Paragraph(format!("{}. Documentation Options", sections.options)));
    story.push(Block::Paragraph(format!("{}. Database Overview", sections.overview)));
    story.push(Block::Paragraph(format!("{}. Tables Documentation", sections.tables)));
    for (i, t) in doc.tables.iter().enumerate() {
        story.push(Block::Paragraph(format!("   {}.{} {}", sections.tables, i + 1, t.name)));
    }
    if let Some(number) = sections.views {
        story.push(Block::Paragraph(format!("{}. Views Documentation", number)));
    }
    if let Some(number) = sections.routines {
        story.push(Block::Paragraph(format!("{}. Functions & Procedures", number)));
    }
    story.push(Block::PageBreak);
}

fn options_section(story: &mut Vec<Block>, options: &DocumentationOptions, number: usize) {
    story.push(Block::Heading(format!("{}. Documentation Options", number)));
    story.push(Block::Paragraph(
        "This documentation was generated with the following configuration:".to_string(),
    ));
    story.push(Block::Spacer(4.0));
    let rows = options
        .entries()
        .iter()
        .map(|e| row([e.label, e.status(), e.description]))
        .collect();
    story.push(table(&["Option", "Status", "Description"], rows, &[2.2, 1.0, 2.3]));
    story.push(Block::PageBreak);
}

fn overview(story: &mut Vec<Block>, doc: &SchemaDocument, number: usize) {
    let info = &doc.database_info;
    story.push(Block::Heading(format!("{}. Database Overview", number)));

    let rows = vec![
        row(["Database Name", &info.name]),
        row(["Database Version", &format::or_na(info.version.as_deref())]),
        row(["Total Size", &format::or_na(info.size.as_deref())]),
        row(["Created Date", &format::or_na(info.created.as_deref())]),
        row(["Last Backup", &format::or_na(info.last_backup.as_deref())]),
        row(["Total Tables", &doc.tables.len().to_string()]),
        row(["Total Views", &doc.views.len().to_string()]),
        row(["Total Functions", &doc.functions().count().to_string()]),
        row(["Total Procedures", &doc.procedures().count().to_string()]),
    ];
    story.push(table(&["Property", "Value"], rows, &[2.5, 3.0]));
    story.push(Block::Spacer(8.5));

    let stats = vec![
        row(["Total Records", &format::thousands(doc.total_rows()), "Across all tables"]),
        row(["Total Size", &format::megabytes(doc.total_size_mb()), "Data + indexes"]),
        row(["Total Columns", &doc.total_columns().to_string(), "All table columns"]),
        row(["Total Indexes", &doc.total_indexes().to_string(), "Performance optimization"]),
    ];
    story.push(table(&["Metric", "Count", "Details"], stats, &[2.0, 1.5, 2.0]));
    story.push(Block::PageBreak);
}

fn table_section(story: &mut Vec<Block>, t: &Table, section: usize, number: usize) {
    story.push(Block::SubHeading(format!("{}.{} Table: {}", section, number, t.name)));
    story.push(Block::Paragraph(format!(
        "Description: {}",
        format::description_or_default(t.description.as_deref())
    )));
    story.push(Block::Spacer(4.0));

    let meta = vec![
        row(["Schema", &t.schema]),
        row(["Table Type", &t.kind]),
        row(["Row Count", &format::thousands(t.row_count)]),
        row(["Size (MB)", &format!("{:.1}", t.size_mb)]),
        row(["Column Count", &t.columns.len().to_string()]),
        row(["Index Count", &t.indexes.len().to_string()]),
        row(["Constraint Count", &t.constraints.len().to_string()]),
    ];
    story.push(table(&["Property", "Value"], meta, &[2.2, 3.3]));
    story.push(Block::Spacer(5.6));

    if !t.columns.is_empty() {
        story.push(Block::Minor("Columns".to_string()));
        let rows = t
            .columns
            .iter()
            .map(|c| {
                row([
                    &truncate(&c.name, truncate::COLUMN_NAME),
                    &truncate(&c.data_type, truncate::COLUMN_TYPE),
                    format::yes_no(c.nullable),
                    &truncate(c.default.as_deref().unwrap_or_default(), truncate::COLUMN_DEFAULT),
                    &truncate(
                        c.description.as_deref().unwrap_or_default(),
                        truncate::COLUMN_DESCRIPTION,
                    ),
                ])
            })
            .collect();
        story.push(table(
            &["Column Name", "Data Type", "Nullable", "Default", "Description"],
            rows,
            &[1.1, 1.1, 0.7, 1.1, 1.5],
        ));
        story.push(Block::Spacer(5.6));
    }

    if !t.indexes.is_empty() {
        story.push(Block::Minor("Indexes".to_string()));
        let rows = t
            .indexes
            .iter()
            .map(|i| {
                row([
                    &truncate(&i.name, truncate::INDEX_NAME),
                    &truncate(&i.columns.join(", "), truncate::INDEX_COLUMNS),
                    &i.index_type,
                    format::yes_no(i.is_unique),
                ])
            })
            .collect();
        story.push(table(
            &["Index Name", "Columns", "Type", "Unique"],
            rows,
            &[1.4, 2.0, 1.0, 0.6],
        ));
        story.push(Block::Spacer(5.6));
    }

    if !t.constraints.is_empty() {
        story.push(Block::Minor("Constraints".to_string()));
        let rows = t
            .constraints
            .iter()
            .map(|c| {
                row([
                    &truncate(&c.name, truncate::CONSTRAINT_NAME),
                    &c.kind.to_string(),
                    &truncate(&c.columns.join(", "), truncate::CONSTRAINT_COLUMNS),
                    &truncate(
                        c.definition_or_reference.as_deref().unwrap_or_default(),
                        truncate::CONSTRAINT_DEFINITION,
                    ),
                ])
            })
            .collect();
        story.push(table(
            &["Constraint Name", "Type", "Columns", "Definition"],
            rows,
            &[1.2, 0.9, 1.1, 2.3],
        ));
    }

    story.push(Block::Spacer(8.5));
}

fn view_section(story: &mut Vec<Block>, view: &View) {
    story.push(Block::SubHeading(format!("View: {}", view.name)));
    story.push(Block::Paragraph(format!("Schema: {}", view.schema)));
    story.push(Block::Paragraph(format!(
        "Description: {}",
        format::description_or_default(view.description.as_deref())
    )));
    story.push(Block::Spacer(4.0));
    if !view.definition.is_empty() {
        story.push(Block::Minor("Definition:".to_string()));
        story.push(Block::Code(
            truncate(&view.definition, truncate::VIEW_DEFINITION).into_owned(),
        ));
    }
    story.push(Block::Spacer(7.0));
}

fn routine_section(story: &mut Vec<Block>, routine: &Routine) {
    story.push(Block::SubHeading(format!("{}: {}", routine.kind, routine.name)));
    story.push(Block::Paragraph(format!("Schema: {}", routine.schema)));
    if let Some(return_type) = &routine.return_type {
        story.push(Block::Paragraph(format!("Return Type: {}", return_type)));
    }
    story.push(Block::Paragraph(format!("Parameters: {}", routine.parameters)));
    story.push(Block::Paragraph(format!(
        "Description: {}",
        format::description_or_default(routine.description.as_deref())
    )));
    story.push(Block::Spacer(5.6));
}
