use chrono::{DateTime, Local};
use printpdf::lopdf::{self, Object, StringFormat};
use printpdf::{BuiltinFont, IndirectFontRef, Mm, OffsetDateTime, PdfDocument};
use schemadoc_core::{Result, SchemaDocError};
use sha2::{Digest, Sha256};

use super::PdfBackend;
use super::layout::{FontKind, PAGE_HEIGHT_MM, PAGE_WIDTH_MM, Page};

const LAYER: &str = "Layer 1";

/// Writes pages with the standard PDF base fonts via `printpdf`.
///
/// The base fonts only carry Latin-1 glyphs; other characters are
/// drawn as placeholders and reported with a warning.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrintPdfBackend;

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    mono: IndirectFontRef,
}

impl Fonts {
    fn get(&self, kind: FontKind) -> &IndirectFontRef {
        match kind {
            FontKind::Regular => &self.regular,
            FontKind::Bold => &self.bold,
            FontKind::Mono => &self.mono,
        }
    }
}

fn pdf_error(message: impl std::fmt::Display) -> SchemaDocError {
    SchemaDocError::rendering_unavailable("PDF", message.to_string())
}

/// Stable file identifier derived from the title and generation time.
fn document_id(title: &str, generated_at: &DateTime<Local>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(title.as_bytes());
    hasher.update([0x1f_u8]);
    hasher.update(generated_at.to_rfc3339().as_bytes());
    let digest = hasher.finalize();
    hex::encode_upper(&digest[..16])
}

/// Number of text items containing characters outside Latin-1.
fn items_outside_latin1(pages: &[Page]) -> usize {
    pages
        .iter()
        .flat_map(|page| &page.items)
        .filter(|item| item.text.chars().any(|c| u32::from(c) > 0xFF))
        .count()
}

/// Replaces the random trailer `/ID` written by `printpdf`.
fn stamp_document_id(bytes: &[u8], id: &str) -> Result<Vec<u8>> {
    let mut document = lopdf::Document::load_mem(bytes).map_err(pdf_error)?;
    let id = Object::String(id.as_bytes().to_vec(), StringFormat::Literal);
    document.trailer.set("ID", Object::Array(vec![id.clone(), id]));

    let mut out = Vec::with_capacity(bytes.len());
    document.save_to(&mut out).map_err(pdf_error)?;
    Ok(out)
}

impl PdfBackend for PrintPdfBackend {
    fn name(&self) -> &str {
        "printpdf"
    }

    fn render(
        &self,
        title: &str,
        generated_at: &DateTime<Local>,
        pages: &[Page],
    ) -> Result<Vec<u8>> {
        let unsupported = items_outside_latin1(pages);
        if unsupported > 0 {
            tracing::warn!(
                "{} PDF text items contain characters outside Latin-1; the base fonts cannot draw them",
                unsupported
            );
        }

        let stamp =
            OffsetDateTime::from_unix_timestamp(generated_at.timestamp()).map_err(pdf_error)?;
        let (doc, first_page, first_layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), LAYER);
        let doc = doc
            .with_creation_date(stamp)
            .with_mod_date(stamp)
            .with_metadata_date(stamp);

        let font = |builtin: BuiltinFont| {
            doc.add_builtin_font(builtin)
                .map_err(|e| pdf_error(format!("font setup failed: {}", e)))
        };
        let fonts = Fonts {
            regular: font(BuiltinFont::Helvetica)?,
            bold: font(BuiltinFont::HelveticaBold)?,
            mono: font(BuiltinFont::Courier)?,
        };

        for (i, page) in pages.iter().enumerate() {
            let (page_index, layer_index) = if i == 0 {
                (first_page, first_layer)
            } else {
                doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), LAYER)
            };
            let layer = doc.get_page(page_index).get_layer(layer_index);
            for item in &page.items {
                layer.use_text(
                    item.text.as_str(),
                    item.size_pt,
                    Mm(item.x_mm),
                    Mm(item.y_mm),
                    fonts.get(item.font),
                );
            }
        }

        let bytes = doc.save_to_bytes().map_err(pdf_error)?;
        stamp_document_id(&bytes, &document_id(title, generated_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::pdf::TextItem;

    fn page_with(text: &str) -> Page {
        Page {
            items: vec![TextItem {
                text: text.to_string(),
                font: FontKind::Regular,
                size_pt: 10.0,
                x_mm: 20.0,
                y_mm: 200.0,
            }],
        }
    }

    fn fixed_time() -> DateTime<Local> {
        DateTime::parse_from_rfc3339("2024-07-28T10:30:00+00:00")
            .expect("valid timestamp")
            .with_timezone(&Local)
    }

    #[test]
    fn test_document_id_is_stable() {
        let at = fixed_time();
        let id = document_id("Oracle Database Documentation", &at);

        assert_eq!(id.len(), 32);
        assert_eq!(id, document_id("Oracle Database Documentation", &at));
        assert_ne!(id, document_id("SQL Server Database Documentation", &at));
    }

    #[test]
    fn test_items_outside_latin1() {
        let pages = [page_with("Café"), page_with("顧客"), page_with("orders 📦")];
        assert_eq!(items_outside_latin1(&pages), 2);
    }

    #[test]
    fn test_render_is_byte_identical_for_fixed_time() {
        let at = fixed_time();
        let pages = [page_with("customers"), page_with("orders")];

        let first = PrintPdfBackend.render("Docs", &at, &pages).expect("first");
        let second = PrintPdfBackend.render("Docs", &at, &pages).expect("second");
        assert!(first.starts_with(b"%PDF"));
        assert_eq!(first, second);

        let text = String::from_utf8_lossy(&first);
        assert!(text.contains(&document_id("Docs", &at)));
        assert!(text.contains("D:20240728"));
    }

    #[test]
    fn test_render_accepts_text_outside_latin1() {
        let bytes = PrintPdfBackend
            .render("Docs", &fixed_time(), &[page_with("顧客 table")])
            .expect("render");
        assert!(bytes.starts_with(b"%PDF"));
    }
}
