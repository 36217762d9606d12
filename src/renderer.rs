//! PDF assembly and page rendering
//!
//! ## Architecture
//!
//! [`DocumentWriter`] owns the `pdf_writer::Pdf` of one assembly attempt:
//! object numbering, the page tree, the two Helvetica faces, the logo and
//! per-page resources. [`PageRenderer`] draws the fixed report template for
//! one [`PagePlan`] onto a [`PdfCanvas`] and hands the finished content
//! stream to the writer.
//!
//! ## Page template
//!
//! ```text
//! header   REPORTE DE SUPERVISIÓN EFECTIVA ............ [logo]
//!          ==================================================
//! banner   [ section title                               ]
//! body     description, then free text / photo grid / placeholder
//! footer   default line, or the section note
//! ```
//!
//! All drawing coordinates are top-left based; the canvas flips them.

use image::{DynamicImage, GenericImageView};
use log::{debug, warn};
use pdf_writer::{Filter, Finish, Name, Pdf, Rect as PdfRect, Ref, TextStr};

use crate::canvas::PdfCanvas;
use crate::font_metrics::Font;
use crate::image_utils::{add_image_to_pdf, add_jpeg_to_pdf, encode_jpeg, recompress, ImageProcessor};
use crate::model::ReportDocument;
use crate::planner::{PageKind, PagePlan};
use crate::quality::section_quality;
use crate::text_layout::LineBreaker;
use crate::types::{Color, Orientation, PageSize, Rect};

pub const MARGIN_HORIZONTAL: f64 = 56.69;
pub const MARGIN_TOP: f64 = 30.0;
pub const MARGIN_BOTTOM: f64 = 20.0;
/// Height kept clear above the bottom margin for the footer
pub const FOOTER_SPACE: f64 = 40.0;

pub const HEADER_TITLE: &str = "REPORTE DE SUPERVISIÓN EFECTIVA";
pub const PLACEHOLDER_TEXT: &str = "Sin contenido capturado";
const CAPTION_PREFIX: &str = "Descripción: ";
const NOTE_PREFIX: &str = "Nota: ";

pub const CFE_GREEN: Color = Color::from_rgb24(0x00A651);
pub const CFE_BLUE: Color = Color::from_rgb24(0x0066CC);
const DARK_GRAY: Color = Color::from_rgb24(0x333333);
const BANNER_FILL: Color = Color::from_rgb24(0xE6F3FF);
const ROW_FILL: Color = Color::from_rgb24(0xF8F8F8);
const BORDER_GRAY: Color = Color::from_rgb24(0xCCCCCC);
const FOOTER_GRAY: Color = Color::from_rgb24(0x888888);
const NOTE_RED: Color = Color::from_rgb24(0xFF0000);

const LOGO_HEIGHT: f64 = 24.0;
const LOGO_PLACEHOLDER_WIDTH: f64 = 32.0;
const LOGO_NAME: &[u8] = b"Logo";

const BANNER_HEIGHT: f64 = 25.0;

const ROW_LABEL_COLUMN: f64 = 140.0;
const ROW_VALUE_OFFSET: f64 = 150.0;
const ROW_LINE_HEIGHT: f64 = 18.0;
const ROW_MIN_HEIGHT: f64 = 20.0;
const ROW_FONT_SIZE: f64 = 11.0;

const BODY_FONT_SIZE: f64 = 12.0;
const BODY_LEADING: f64 = 16.0;
const PARAGRAPH_GAP: f64 = 4.0;
const BLOCK_GAP: f64 = 10.0;
/// Body lines are not drawn below `page height - MARGIN_BOTTOM - this`
const BODY_BOTTOM_CLEARANCE: f64 = 50.0;

const IMAGE_SPACING: f64 = 10.0;
/// Height the photo grid keeps however long the caption is
const MIN_GRID_HEIGHT: f64 = 200.0;
const CAPTION_GAP: f64 = 5.0;

const FOOTER_FONT_SIZE: f64 = 10.0;
const NOTE_LEADING: f64 = 14.0;

/// Logo XObject shared by every page of a document
#[derive(Debug, Clone, Copy)]
struct EmbeddedLogo {
    id: Ref,
    aspect_ratio: f64,
}

/// Builds one PDF file: object numbering, fonts, page tree
pub struct DocumentWriter {
    pdf: Pdf,
    next_ref_id: i32,
    page_tree_id: Ref,
    pages: Vec<Ref>,
    font_ids: [(Font, Ref); 2],
    logo: Option<EmbeddedLogo>,
    compress_streams: bool,
}

impl DocumentWriter {
    pub fn new(logo: Option<&DynamicImage>, compress_streams: bool) -> Self {
        let mut pdf = Pdf::new();

        let catalog_id = Ref::new(1);
        let page_tree_id = Ref::new(2);
        pdf.catalog(catalog_id).pages(page_tree_id);

        let font_ids = [(Font::Regular, Ref::new(3)), (Font::Bold, Ref::new(4))];
        for (font, id) in font_ids {
            pdf.type1_font(id)
                .base_font(font.base_font())
                .encoding_predefined(Name(b"WinAnsiEncoding"));
        }

        let mut writer = Self {
            pdf,
            next_ref_id: 5,
            page_tree_id,
            pages: Vec::new(),
            font_ids,
            logo: None,
            compress_streams,
        };

        if let Some(img) = logo {
            let (width, height) = img.dimensions();
            if width > 0 && height > 0 {
                let id = writer.next_ref();
                let smask_id = writer.next_ref();
                add_image_to_pdf(&mut writer.pdf, img, id, smask_id);
                writer.logo = Some(EmbeddedLogo {
                    id,
                    aspect_ratio: f64::from(width) / f64::from(height),
                });
            }
        }
        writer
    }

    fn next_ref(&mut self) -> Ref {
        let id = Ref::new(self.next_ref_id);
        self.next_ref_id += 1;
        id
    }

    /// Width-to-height ratio of the embedded logo, if any
    pub fn logo_aspect_ratio(&self) -> Option<f64> {
        self.logo.map(|logo| logo.aspect_ratio)
    }

    pub fn set_info(&mut self, title: &str, author: &str) {
        let id = self.next_ref();
        self.pdf
            .document_info(id)
            .title(TextStr(title))
            .author(TextStr(author))
            .creator(TextStr(env!("CARGO_PKG_NAME")));
    }

    /// Embed JPEG bytes, returning the XObject reference
    pub fn embed_jpeg(&mut self, jpeg: &[u8], width: u32, height: u32) -> Ref {
        let id = self.next_ref();
        add_jpeg_to_pdf(&mut self.pdf, id, jpeg, width, height);
        id
    }

    /// Append a finished page
    ///
    /// `images` maps the XObject names used in `content` to their objects.
    pub fn add_page(&mut self, size: PageSize, content: Vec<u8>, images: &[(String, Ref)]) {
        let page_id = self.next_ref();
        let content_id = self.next_ref();

        if self.compress_streams {
            let compressed = miniz_oxide::deflate::compress_to_vec_zlib(&content, 6);
            self.pdf.stream(content_id, &compressed).filter(Filter::FlateDecode);
        } else {
            self.pdf.stream(content_id, &content);
        }

        let mut page = self.pdf.page(page_id);
        page.media_box(PdfRect::new(0.0, 0.0, size.width as f32, size.height as f32));
        page.parent(self.page_tree_id);
        page.contents(content_id);
        {
            let mut resources = page.resources();
            {
                let mut fonts = resources.fonts();
                for (font, id) in self.font_ids {
                    fonts.pair(font.resource_name(), id);
                }
            }
            if self.logo.is_some() || !images.is_empty() {
                let mut x_objects = resources.x_objects();
                if let Some(logo) = self.logo {
                    x_objects.pair(Name(LOGO_NAME), logo.id);
                }
                for (name, id) in images {
                    x_objects.pair(Name(name.as_bytes()), *id);
                }
            }
        }
        page.finish();

        self.pages.push(page_id);
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Write the page tree and serialize the document
    pub fn finish(mut self) -> Vec<u8> {
        self.pdf
            .pages(self.page_tree_id)
            .kids(self.pages.iter().copied())
            .count(self.pages.len() as i32);
        self.pdf.finish()
    }
}

/// What was drawn on a page
#[derive(Debug, Clone, PartialEq)]
pub struct PageSummary {
    pub title: String,
    pub orientation: Orientation,
    pub images_drawn: usize,
    /// Body lines that did not fit above the footer
    pub dropped_lines: usize,
}

/// An image already embedded in the writer, waiting to be placed
struct PlacedImage {
    name: String,
    id: Ref,
    width: f64,
    height: f64,
}

/// Draws the report template for one page plan at a time
pub struct PageRenderer<'a> {
    document: &'a ReportDocument,
    processor: &'a ImageProcessor,
    document_quality: u8,
}

impl<'a> PageRenderer<'a> {
    pub fn new(document: &'a ReportDocument, processor: &'a ImageProcessor, document_quality: u8) -> Self {
        Self {
            document,
            processor,
            document_quality,
        }
    }

    pub fn render_page(&self, writer: &mut DocumentWriter, plan: &PagePlan) -> PageSummary {
        let size = PageSize::for_orientation(plan.orientation);
        let title = plan.title();
        let mut page = PageBuilder::new(size, writer.logo_aspect_ratio());

        let mut y = page.draw_header(MARGIN_TOP);
        y += 15.0;
        y = page.draw_banner(&title, y);

        let note = match plan.section {
            None => {
                y += 10.0;
                for (index, (label, value)) in self.document.general.rows().into_iter().enumerate() {
                    y = page.draw_data_row(index, label, &value, y);
                }
                None
            }
            Some(id) => {
                let section = self.document.section(id);
                y += 12.0;
                if !plan.is_continuation() {
                    y = page.draw_text_block(id.description(), y);
                    y += 10.0;
                }
                match &plan.kind {
                    PageKind::Text => {
                        page.draw_text_block(&section.primary_text, y);
                    }
                    PageKind::Images { refs, continuation } => {
                        let caption = (!continuation && !section.alternative_text.trim().is_empty())
                            .then(|| format!("{}{}", CAPTION_PREFIX, section.alternative_text));
                        let reserved = caption
                            .as_deref()
                            .map(|text| page.caption_reserve(text, y))
                            .unwrap_or(0.0);
                        let quality = section_quality(self.document_quality, plan.section_images);
                        let placed = self.embed_images(writer, refs, quality);
                        y = page.draw_image_grid(placed, y, reserved);
                        if let Some(text) = caption {
                            page.draw_text_block(&text, y + CAPTION_GAP);
                        }
                    }
                    PageKind::Placeholder | PageKind::General => {
                        page.draw_text_block(PLACEHOLDER_TEXT, y);
                    }
                }
                section.has_note().then_some(section.note.as_str())
            }
        };

        match note {
            Some(note) => page.draw_note_footer(note),
            None => page.draw_default_footer(&self.document.general.supervision_date),
        }

        if page.dropped_lines > 0 {
            warn!(
                "Page '{}': {} text lines did not fit and were dropped",
                title, page.dropped_lines
            );
        }

        let summary = PageSummary {
            title,
            orientation: plan.orientation,
            images_drawn: page.images.len(),
            dropped_lines: page.dropped_lines,
        };
        let images = std::mem::take(&mut page.images);
        writer.add_page(size, page.canvas.finish(), &images);
        summary
    }

    /// Load, recompress and embed each photo; failures are skipped
    ///
    /// Each decoded image is dropped as soon as its JPEG is in the writer.
    fn embed_images(&self, writer: &mut DocumentWriter, refs: &[String], quality: u8) -> Vec<PlacedImage> {
        let mut placed = Vec::with_capacity(refs.len());
        for locator in refs {
            let img = match self.processor.load(locator) {
                Ok(img) => img,
                Err(e) => {
                    warn!("Skipping image: {}", e);
                    continue;
                }
            };
            let jpeg = match recompress(img, quality).and_then(|img| {
                let (width, height) = img.dimensions();
                encode_jpeg(&img, quality).map(|jpeg| (jpeg, width, height))
            }) {
                Ok(encoded) => encoded,
                Err(e) => {
                    warn!("Skipping image {}: {}", locator, e);
                    continue;
                }
            };
            let (bytes, width, height) = jpeg;
            debug!(
                "Embedding {} ({}x{}, q{}, {} bytes)",
                locator,
                width,
                height,
                quality,
                bytes.len()
            );
            let id = writer.embed_jpeg(&bytes, width, height);
            placed.push(PlacedImage {
                name: format!("Im{}", placed.len() + 1),
                id,
                width: f64::from(width),
                height: f64::from(height),
            });
        }
        placed
    }
}

/// Drawing state of the page being rendered
struct PageBuilder {
    canvas: PdfCanvas,
    size: PageSize,
    logo_aspect_ratio: Option<f64>,
    images: Vec<(String, Ref)>,
    dropped_lines: usize,
}

impl PageBuilder {
    fn new(size: PageSize, logo_aspect_ratio: Option<f64>) -> Self {
        Self {
            canvas: PdfCanvas::new(size),
            size,
            logo_aspect_ratio,
            images: Vec::new(),
            dropped_lines: 0,
        }
    }

    fn content_width(&self) -> f64 {
        self.size.width - 2.0 * MARGIN_HORIZONTAL
    }

    fn right_edge(&self) -> f64 {
        self.size.width - MARGIN_HORIZONTAL
    }

    fn is_landscape(&self) -> bool {
        self.size.is_landscape()
    }

    fn body_breaker(&self) -> LineBreaker {
        LineBreaker::new(Font::Regular, BODY_FONT_SIZE, self.content_width() - 20.0)
    }

    fn draw_header(&mut self, top: f64) -> f64 {
        let right = self.right_edge();
        match self.logo_aspect_ratio {
            Some(aspect_ratio) => {
                let width = LOGO_HEIGHT * aspect_ratio;
                self.canvas
                    .draw_image(Name(LOGO_NAME), Rect::new(right - width, top, width, LOGO_HEIGHT));
            }
            None => {
                let rect = Rect::new(right - LOGO_PLACEHOLDER_WIDTH, top, LOGO_PLACEHOLDER_WIDTH, LOGO_HEIGHT);
                self.canvas.fill_rect(rect, CFE_GREEN);
            }
        }
        self.canvas
            .draw_text(MARGIN_HORIZONTAL, top + 18.0, HEADER_TITLE, Font::Bold, 18.0, CFE_GREEN);
        self.canvas
            .line(MARGIN_HORIZONTAL, top + 35.0, right, top + 35.0, CFE_BLUE, 2.0);
        top + 45.0
    }

    fn draw_banner(&mut self, title: &str, y: f64) -> f64 {
        let rect = Rect::new(MARGIN_HORIZONTAL, y, self.content_width(), BANNER_HEIGHT);
        self.canvas.fill_and_stroke_rect(rect, BANNER_FILL, CFE_BLUE, 1.0);
        self.canvas
            .draw_text(MARGIN_HORIZONTAL + 10.0, y + 17.0, title, Font::Bold, 14.0, CFE_BLUE);
        y + 35.0
    }

    /// One label/value row of the general data table
    fn draw_data_row(&mut self, index: usize, label: &str, value: &str, y: f64) -> f64 {
        let value_x = MARGIN_HORIZONTAL + ROW_VALUE_OFFSET;
        let value_width = self.size.width - MARGIN_HORIZONTAL - value_x - 10.0;
        let lines = LineBreaker::new(Font::Regular, ROW_FONT_SIZE, value_width).wrap(value);
        let height = (ROW_LINE_HEIGHT * lines.len() as f64).max(ROW_MIN_HEIGHT);
        let row = Rect::new(MARGIN_HORIZONTAL, y, self.content_width(), height);

        if index % 2 == 0 {
            self.canvas.fill_rect(row, ROW_FILL);
        }
        self.canvas.stroke_rect(row, BORDER_GRAY, 0.5);
        let divider_x = MARGIN_HORIZONTAL + ROW_LABEL_COLUMN;
        self.canvas.line(divider_x, y, divider_x, y + height, BORDER_GRAY, 0.5);

        self.canvas.draw_text(
            MARGIN_HORIZONTAL + 10.0,
            y + 13.0,
            label,
            Font::Bold,
            ROW_FONT_SIZE,
            DARK_GRAY,
        );
        for (i, line) in lines.iter().enumerate() {
            let baseline = y + 13.0 + i as f64 * ROW_LINE_HEIGHT;
            self.canvas
                .draw_text(value_x, baseline, line, Font::Regular, ROW_FONT_SIZE, Color::black());
        }
        y + height
    }

    /// Paragraph-aware body text; the first baseline sits at `y`
    fn draw_text_block(&mut self, text: &str, y: f64) -> f64 {
        let limit = self.size.height - MARGIN_BOTTOM - BODY_BOTTOM_CLEARANCE;
        let mut y = y;
        for paragraph in self.body_breaker().wrap_paragraphs(text) {
            if paragraph.is_empty() {
                y += BODY_LEADING;
                continue;
            }
            for line in &paragraph {
                if y < limit {
                    self.canvas.draw_text(
                        MARGIN_HORIZONTAL + 10.0,
                        y,
                        line,
                        Font::Regular,
                        BODY_FONT_SIZE,
                        Color::black(),
                    );
                    y += BODY_LEADING;
                } else {
                    self.dropped_lines += 1;
                }
            }
            y += PARAGRAPH_GAP;
        }
        y + BLOCK_GAP
    }

    /// Vertical space [`Self::draw_text_block`] would use, ignoring the page bottom
    fn text_block_height(&self, text: &str) -> f64 {
        let height: f64 = self
            .body_breaker()
            .wrap_paragraphs(text)
            .iter()
            .map(|paragraph| match paragraph.len() {
                0 => BODY_LEADING,
                lines => lines as f64 * BODY_LEADING + PARAGRAPH_GAP,
            })
            .sum();
        height + BLOCK_GAP
    }

    /// Space kept below a grid starting at `grid_top` for its caption
    ///
    /// Never more than leaves [`MIN_GRID_HEIGHT`] for the photos; caption
    /// lines beyond that are dropped by [`Self::draw_text_block`].
    fn caption_reserve(&self, caption: &str, grid_top: f64) -> f64 {
        let wanted = CAPTION_GAP + self.text_block_height(caption);
        let room = self.size.height - MARGIN_BOTTOM - FOOTER_SPACE - grid_top - MIN_GRID_HEIGHT;
        wanted.min(room.max(0.0))
    }

    /// Lay photos out in a grid between `y` and the footer
    ///
    /// One or two photos share a single row; three or more use two columns.
    /// Photos are never upscaled and are centered in their cells.
    fn draw_image_grid(&mut self, placed: Vec<PlacedImage>, y: f64, reserved: f64) -> f64 {
        if placed.is_empty() {
            return y;
        }
        let columns = if placed.len() <= 2 { placed.len() } else { 2 };
        let rows = placed.len().div_ceil(columns);
        let available = self.size.height - MARGIN_BOTTOM - FOOTER_SPACE - y - reserved;
        let row_height = ((available - (rows - 1) as f64 * IMAGE_SPACING) / rows as f64).max(0.0);
        debug!(
            "Image grid: {} images, {} columns, row height {:.1}",
            placed.len(),
            columns,
            row_height
        );

        let mut y = y;
        let row_count = rows;
        for (row, chunk) in placed.chunks(columns).enumerate() {
            let cols_in_row = chunk.len() as f64;
            let col_width = (self.content_width() - (cols_in_row - 1.0) * IMAGE_SPACING) / cols_in_row;
            let mut x = MARGIN_HORIZONTAL;
            for image in chunk {
                let scale = (col_width / image.width).min(row_height / image.height).min(1.0);
                let width = image.width * scale;
                let height = image.height * scale;
                let rect = Rect::new(
                    x + (col_width - width) / 2.0,
                    y + (row_height - height) / 2.0,
                    width,
                    height,
                );
                self.canvas.draw_image(Name(image.name.as_bytes()), rect);
                x += col_width + IMAGE_SPACING;
            }
            y += row_height;
            if row + 1 < row_count {
                y += IMAGE_SPACING;
            }
        }

        self.images
            .extend(placed.into_iter().map(|image| (image.name, image.id)));
        y
    }

    fn draw_default_footer(&mut self, date: &str) {
        let text = format!("Reporte de Supervisión Efectiva – CFE – {}", date);
        let y = self.size.height - MARGIN_BOTTOM + 5.0;
        let x = if self.is_landscape() {
            (self.size.width - Font::Regular.text_width(&text, FOOTER_FONT_SIZE)) / 2.0
        } else {
            MARGIN_HORIZONTAL + 10.0
        };
        self.canvas
            .draw_text(x, y, &text, Font::Regular, FOOTER_FONT_SIZE, FOOTER_GRAY);
    }

    /// Section note in place of the default footer, "Nota: " leading in red
    fn draw_note_footer(&mut self, note: &str) {
        let available = self.content_width() - 20.0;
        let prefix_width = Font::Bold.text_width(NOTE_PREFIX, FOOTER_FONT_SIZE);
        let lines = LineBreaker::new(Font::Regular, FOOTER_FONT_SIZE, available)
            .with_first_line_width(available - prefix_width)
            .wrap(note);
        let base_y = self.size.height - MARGIN_BOTTOM - lines.len() as f64 * NOTE_LEADING + 5.0;

        for (index, line) in lines.iter().enumerate() {
            let y = base_y + index as f64 * NOTE_LEADING;
            let lead = if index == 0 { prefix_width } else { 0.0 };
            let x = if self.is_landscape() {
                let width = lead + Font::Regular.text_width(line, FOOTER_FONT_SIZE);
                (self.size.width - width) / 2.0
            } else {
                MARGIN_HORIZONTAL + 10.0
            };
            if index == 0 {
                self.canvas
                    .draw_text(x, y, NOTE_PREFIX, Font::Bold, FOOTER_FONT_SIZE, NOTE_RED);
            }
            self.canvas
                .draw_text(x + lead, y, line, Font::Regular, FOOTER_FONT_SIZE, Color::black());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ImageLimitPolicy;
    use crate::image_source::MemoryImageSource;
    use crate::image_utils::test_images::jpeg;
    use crate::model::Section;
    use crate::planner::PaginationPlanner;
    use crate::sections::SectionId;
    use crate::unicode_utils::unicode_to_winansi;
    use image::{Rgba, RgbaImage};
    use std::sync::Arc;

    fn processor() -> ImageProcessor {
        let mut source = MemoryImageSource::new();
        for i in 0..6 {
            source.insert(format!("foto{}.jpg", i), jpeg(64, 48));
        }
        source.insert("wide.jpg", jpeg(80, 30));
        source.insert("tall.jpg", jpeg(300, 400));
        source.insert("broken.jpg", b"not a photo".to_vec());
        ImageProcessor::new(Arc::new(source))
    }

    fn render(document: &ReportDocument, logo: Option<&DynamicImage>) -> (Vec<PageSummary>, Vec<u8>) {
        let processor = processor();
        let planner = PaginationPlanner::new(&processor, ImageLimitPolicy::Lenient);
        let renderer = PageRenderer::new(document, &processor, 100);
        let mut writer = DocumentWriter::new(logo, false);
        let summaries = planner
            .plan_document(document)
            .iter()
            .map(|plan| renderer.render_page(&mut writer, plan))
            .collect();
        (summaries, writer.finish())
    }

    fn count(haystack: &[u8], needle: &str) -> usize {
        haystack
            .windows(needle.len())
            .filter(|window| *window == needle.as_bytes())
            .count()
    }

    fn page_count(pdf: &[u8]) -> usize {
        count(pdf, "/Type /Page") - count(pdf, "/Type /Pages")
    }

    /// String operand as pdf-writer serializes it: literal for ASCII, hex otherwise
    fn pdf_string(text: &str) -> String {
        let bytes = unicode_to_winansi(text);
        if bytes.is_ascii() {
            format!("({})", text)
        } else {
            let hex: String = bytes.iter().map(|b| format!("{:02X}", b)).collect();
            format!("<{}>", hex)
        }
    }

    fn numbers(operands: &str) -> Vec<f64> {
        operands
            .split_whitespace()
            .filter_map(|value| value.parse().ok())
            .collect()
    }

    /// Operands of every `op` in the content, in drawing order
    fn operands_of(content: &str, op: &str) -> Vec<Vec<f64>> {
        let suffix = format!(" {}", op);
        content
            .lines()
            .filter_map(|line| line.strip_suffix(suffix.as_str()))
            .map(numbers)
            .collect()
    }

    /// PDF-space origin of every `Tj` showing exactly `text`
    fn text_origins(content: &str, text: &str) -> Vec<(f64, f64)> {
        let shown = format!("{} Tj", pdf_string(text));
        let mut origin = (0.0, 0.0);
        let mut found = Vec::new();
        for line in content.lines() {
            if let Some(operands) = line.strip_suffix(" Td") {
                if let [x, y] = numbers(operands)[..] {
                    origin = (x, y);
                }
            } else if line == shown {
                found.push(origin);
            }
        }
        found
    }

    fn page_content(page: PageBuilder) -> String {
        String::from_utf8_lossy(&page.canvas.finish()).into_owned()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 0.01, "{} != {}", actual, expected);
    }

    #[test]
    fn test_empty_document_renders_eleven_pages() {
        let (summaries, pdf) = render(&ReportDocument::default(), None);
        assert_eq!(summaries.len(), 11);
        assert_eq!(page_count(&pdf), 11);
        assert!(pdf.starts_with(b"%PDF-"));
        assert_eq!(count(&pdf, "(Sin contenido capturado)"), 10);
        assert_eq!(summaries[0].title, "Datos Generales");
        assert!(summaries.iter().all(|s| s.images_drawn == 0));
        assert_eq!(count(&pdf, "/BaseFont /Helvetica-Bold"), 1);
        assert_eq!(count(&pdf, "/WinAnsiEncoding"), 2);
    }

    #[test]
    fn test_general_page_has_nine_rows() {
        let processor = processor();
        let document = ReportDocument::default();
        let renderer = PageRenderer::new(&document, &processor, 100);
        let mut writer = DocumentWriter::new(None, false);
        renderer.render_page(&mut writer, &PagePlan::general());
        let pdf = writer.finish();
        for label in ["(Actividad:)", "(Cuadrilla:)", "(Supervisor:)", "(Especialidad:)"] {
            assert_eq!(count(&pdf, label), 1, "{}", label);
        }
        // banner, logo placeholder, 9 row borders, 5 shaded rows
        assert_eq!(count(&pdf, " re"), 16);
    }

    #[test]
    fn test_six_images_split_four_and_two() {
        let document = ReportDocument::default().with_section(
            SectionId::E,
            Section::images((0..6).map(|i| format!("foto{}.jpg", i))),
        );
        let (summaries, pdf) = render(&document, None);
        assert_eq!(summaries.len(), 12);
        let section_pages: Vec<&PageSummary> = summaries
            .iter()
            .filter(|s| s.title.starts_with("E: "))
            .collect();
        assert_eq!(section_pages.len(), 2);
        assert_eq!(section_pages[0].images_drawn, 4);
        assert_eq!(section_pages[1].images_drawn, 2);
        assert_eq!(section_pages[1].title, "E: Evidencia de uso de equipo (Continuación)");
        assert_eq!(count(&pdf, "/Subtype /Image"), 6);
    }

    #[test]
    fn test_broken_image_is_skipped() {
        let document = ReportDocument::default()
            .with_section(SectionId::C, Section::images(["foto0.jpg", "broken.jpg"]));
        let (summaries, _) = render(&document, None);
        let page = summaries.iter().find(|s| s.title.starts_with("C: ")).unwrap();
        assert_eq!(page.images_drawn, 1);
    }

    #[test]
    fn test_single_wide_image_page_is_landscape() {
        let document = ReportDocument::default()
            .with_section(SectionId::A, Section::images(["wide.jpg"]).with_caption("Vista general"));
        let (summaries, pdf) = render(&document, None);
        assert_eq!(summaries[1].orientation, Orientation::Landscape);
        assert_eq!(count(&pdf, "/MediaBox [0 0 792 612]"), 1);
    }

    #[test]
    fn test_note_replaces_default_footer() {
        let document = ReportDocument::default()
            .with_section(SectionId::B, Section::text("Trabajo ordenado").with_note("Revisar arnes"));
        let (_, pdf) = render(&document, None);
        assert_eq!(count(&pdf, "(Nota: )"), 1);
        assert_eq!(count(&pdf, "(Revisar arnes)"), 1);
        assert_eq!(count(&pdf, "(Trabajo ordenado)"), 1);
    }

    #[test]
    fn test_long_text_drops_overflowing_lines() {
        let text = (0..80).map(|i| format!("Linea {}", i)).collect::<Vec<_>>().join("\n");
        let document = ReportDocument::default().with_section(SectionId::D, Section::text(text));
        let (summaries, _) = render(&document, None);
        let page = summaries.iter().find(|s| s.title.starts_with("D: ")).unwrap();
        assert!(page.dropped_lines > 0);
    }

    #[test]
    fn test_long_caption_leaves_room_for_the_photo() {
        let caption = vec!["inspeccion"; 400].join(" ");
        let document = ReportDocument::default()
            .with_section(SectionId::A, Section::images(["tall.jpg"]).with_caption(caption));
        let (summaries, pdf) = render(&document, None);
        let page = &summaries[1];
        assert_eq!(page.images_drawn, 1);
        assert!(page.dropped_lines > 0);

        let content = String::from_utf8_lossy(&pdf);
        let transforms = operands_of(&content, "cm");
        assert_eq!(transforms.len(), 1);
        let (width, height) = (transforms[0][0], transforms[0][3]);
        assert!(width > 0.0, "{:?}", transforms);
        assert!(height >= MIN_GRID_HEIGHT - 0.01, "{:?}", transforms);

        let prefix = pdf_string(CAPTION_PREFIX);
        let prefix = prefix.trim_end_matches('>');
        assert_eq!(content.matches(prefix).count(), 1);
    }

    #[test]
    fn test_caption_is_drawn_below_the_photo() {
        let document = ReportDocument::default()
            .with_section(SectionId::A, Section::images(["foto0.jpg"]).with_caption("Vista general"));
        let (_, pdf) = render(&document, None);
        let content = String::from_utf8_lossy(&pdf);

        let captions = text_origins(&content, "Descripción: Vista general");
        assert_eq!(captions.len(), 1);
        let transforms = operands_of(&content, "cm");
        assert_eq!(transforms.len(), 1);
        let photo_bottom = transforms[0][5];
        assert!(captions[0].1 < photo_bottom, "{:?} vs {}", captions, photo_bottom);
    }

    #[test]
    fn test_default_footer_portrait_indent() {
        let mut page = PageBuilder::new(PageSize::LETTER, None);
        page.draw_default_footer("07/03/2024");
        let content = page_content(page);

        let origins = text_origins(&content, "Reporte de Supervisión Efectiva – CFE – 07/03/2024");
        assert_eq!(origins.len(), 1);
        assert_close(origins[0].0, MARGIN_HORIZONTAL + 10.0);
        assert_close(origins[0].1, MARGIN_BOTTOM - 5.0);
    }

    #[test]
    fn test_default_footer_landscape_is_centered() {
        let size = PageSize::for_orientation(Orientation::Landscape);
        let mut page = PageBuilder::new(size, None);
        page.draw_default_footer("07/03/2024");
        let content = page_content(page);

        let text = "Reporte de Supervisión Efectiva – CFE – 07/03/2024";
        let origins = text_origins(&content, text);
        assert_eq!(origins.len(), 1);
        let width = Font::Regular.text_width(text, FOOTER_FONT_SIZE);
        assert_close(origins[0].0, (size.width - width) / 2.0);
        assert!(origins[0].0 > MARGIN_HORIZONTAL + 10.0);
    }

    #[test]
    fn test_single_line_note_sits_on_footer_baseline() {
        let mut page = PageBuilder::new(PageSize::LETTER, None);
        page.draw_note_footer("Revisar arnes");
        let content = page_content(page);

        let prefix = text_origins(&content, NOTE_PREFIX);
        assert_eq!(prefix.len(), 1);
        assert_close(prefix[0].1, MARGIN_BOTTOM - 5.0 + NOTE_LEADING);
        let note = text_origins(&content, "Revisar arnes");
        assert_close(note[0].1, prefix[0].1);
        assert_close(
            note[0].0,
            prefix[0].0 + Font::Bold.text_width(NOTE_PREFIX, FOOTER_FONT_SIZE),
        );
    }

    #[test]
    fn test_multi_line_note_moves_footer_up() {
        let note = vec!["revisar linea energizada"; 30].join(" ");
        let mut page = PageBuilder::new(PageSize::LETTER, None);
        page.draw_note_footer(&note);
        let content = page_content(page);

        let origins = operands_of(&content, "Td");
        let lines = origins.len() - 1;
        assert!(lines >= 3, "{} lines", lines);
        assert_eq!(content.matches(&format!("{} Tj", pdf_string(NOTE_PREFIX))).count(), 1);

        let prefix = text_origins(&content, NOTE_PREFIX);
        let first_line_y = MARGIN_BOTTOM - 5.0 + lines as f64 * NOTE_LEADING;
        assert_close(prefix[0].1, first_line_y);

        // prefix, first line, then the remaining lines at the plain indent
        let last = origins.last().unwrap();
        assert_close(last[0], MARGIN_HORIZONTAL + 10.0);
        assert_close(last[1], MARGIN_BOTTOM - 5.0 + NOTE_LEADING);
        assert!(origins[1][0] > origins[0][0]);
    }

    #[test]
    fn test_data_row_grows_with_wrapped_value() {
        let mut page = PageBuilder::new(PageSize::LETTER, None);
        let bottom = page.draw_data_row(1, "Actividad:", "Corta", 100.0);
        assert_close(bottom, 100.0 + ROW_MIN_HEIGHT);

        let value = vec!["mantenimiento preventivo"; 12].join(" ");
        let bottom = page.draw_data_row(1, "Actividad:", &value, 200.0);
        let height = bottom - 200.0;
        assert!(height > ROW_MIN_HEIGHT);
        assert_close(height % ROW_LINE_HEIGHT, 0.0);

        let content = page_content(page);
        let rects = operands_of(&content, "re");
        assert_eq!(rects.len(), 2);
        assert_close(rects[0][3], ROW_MIN_HEIGHT);
        assert_close(rects[1][3], height);
    }

    #[test]
    fn test_data_row_splits_long_word() {
        let word = "W".repeat(120);
        let mut page = PageBuilder::new(PageSize::LETTER, None);
        let bottom = page.draw_data_row(0, "Cuadrilla:", &word, 100.0);
        let content = page_content(page);

        let shown: String = content
            .lines()
            .filter_map(|line| line.strip_suffix(" Tj"))
            .filter(|operand| *operand != "(Cuadrilla:)")
            .map(|operand| operand.trim_start_matches('(').trim_end_matches(')'))
            .collect();
        assert_eq!(shown, word);
        let lines = content.matches(" Tj").count() - 1;
        assert!(lines > 1);
        assert_close(bottom - 100.0, lines as f64 * ROW_LINE_HEIGHT);
    }

    #[test]
    fn test_logo_is_embedded_once_with_soft_mask() {
        let mut logo = RgbaImage::new(40, 20);
        logo.put_pixel(0, 0, Rgba([0, 166, 81, 128]));
        let logo = DynamicImage::ImageRgba8(logo);
        let (_, pdf) = render(&ReportDocument::default(), Some(&logo));
        assert_eq!(count(&pdf, "/SMask"), 1);
        assert_eq!(count(&pdf, "/Logo Do"), 11);
        assert_eq!(count(&pdf, "48 0 0 24 "), 11);
    }

    #[test]
    fn test_compressed_streams_are_smaller() {
        let document = ReportDocument::default();
        let processor = processor();
        let planner = PaginationPlanner::new(&processor, ImageLimitPolicy::Clamp);
        let renderer = PageRenderer::new(&document, &processor, 100);
        let mut sizes = Vec::new();
        for compress in [false, true] {
            let mut writer = DocumentWriter::new(None, compress);
            for plan in planner.plan_document(&document) {
                renderer.render_page(&mut writer, &plan);
            }
            assert_eq!(writer.page_count(), 11);
            sizes.push(writer.finish().len());
        }
        assert!(sizes[1] < sizes[0]);
    }
}
