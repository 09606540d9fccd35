//! Page-level plumbing for the plan PDF: an A4 top-down cursor over
//! `printpdf`'s bottom-up coordinates, plus text, rule, table and image
//! helpers shared by the renderer.

use std::io::Cursor;

use printpdf::image_crate::codecs::jpeg::JpegDecoder;
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Point, Rgb,
};

pub const PAGE_W: f32 = 210.0;
pub const PAGE_H: f32 = 297.0;
pub const MARGIN: f32 = 20.0;

/// Row break threshold for tables, matching the food chart layout.
pub const TABLE_BREAK_Y: f32 = 270.0;

const ROW_H: f32 = 7.0;

pub const BRAND_RED: (f32, f32, f32) = (200.0 / 255.0, 0.0, 0.0);
pub const BLACK: (f32, f32, f32) = (0.0, 0.0, 0.0);

pub struct Fonts {
    pub regular: IndirectFontRef,
    pub bold: IndirectFontRef,
    pub italic: IndirectFontRef,
}

/// Cursor that walks a page top-down in millimetres. `y` is the distance
/// from the top edge; conversion to the PDF's bottom-up axis happens at
/// draw time.
pub struct PageCursor {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    pub y: f32,
}

impl PageCursor {
    pub fn new(title: &str) -> Result<(PageCursor, Fonts), printpdf::Error> {
        let (doc, page, layer) = PdfDocument::new(title, Mm(PAGE_W), Mm(PAGE_H), "content");
        let fonts = Fonts {
            regular: doc.add_builtin_font(BuiltinFont::Helvetica)?,
            bold: doc.add_builtin_font(BuiltinFont::HelveticaBold)?,
            italic: doc.add_builtin_font(BuiltinFont::HelveticaOblique)?,
        };
        let layer = doc.get_page(page).get_layer(layer);
        Ok((
            PageCursor {
                doc,
                layer,
                y: MARGIN,
            },
            fonts,
        ))
    }

    pub fn new_page(&mut self) {
        let (page, layer) = self.doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "content");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = MARGIN;
    }

    /// Start a new page once the cursor has moved past `threshold`.
    pub fn break_at(&mut self, threshold: f32) {
        if self.y > threshold {
            self.new_page();
        }
    }

    pub fn set_color(&self, (r, g, b): (f32, f32, f32)) {
        self.layer
            .set_fill_color(Color::Rgb(Rgb::new(r, g, b, None)));
    }

    /// Draw text at `x` on the current line. Does not advance the cursor.
    pub fn text(&self, text: &str, size: f32, x: f32, font: &IndirectFontRef) {
        self.layer
            .use_text(text, size, Mm(x), Mm(PAGE_H - self.y), font);
    }

    pub fn text_centered(&self, text: &str, size: f32, font: &IndirectFontRef) {
        let x = (PAGE_W - text_width(text, size)) / 2.0;
        self.text(text, size, x, font);
    }

    pub fn rule(&self, x1: f32, x2: f32, y: f32) {
        self.layer
            .set_outline_color(Color::Rgb(Rgb::new(0.6, 0.6, 0.6, None)));
        self.layer.set_outline_thickness(0.3);
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(x1), Mm(PAGE_H - y)), false),
                (Point::new(Mm(x2), Mm(PAGE_H - y)), false),
            ],
            is_closed: false,
        });
    }

    /// Four-column table at the left margin. Breaks to a new page between
    /// rows, repeating the header. Advances the cursor past the last row.
    pub fn table(
        &mut self,
        fonts: &Fonts,
        headers: &[&str; 4],
        widths: &[f32; 4],
        rows: &[[String; 4]],
    ) {
        self.header_row(fonts, headers, widths);
        for row in rows {
            if self.y > TABLE_BREAK_Y {
                self.new_page();
                self.header_row(fonts, headers, widths);
            }
            let mut x = MARGIN;
            for (cell, w) in row.iter().zip(widths) {
                self.text(&clip(cell, 10.0, w - 2.0), 10.0, x, &fonts.regular);
                x += w;
            }
            self.y += ROW_H;
        }
    }

    fn header_row(&mut self, fonts: &Fonts, headers: &[&str; 4], widths: &[f32; 4]) {
        let mut x = MARGIN;
        for (header, w) in headers.iter().zip(widths) {
            self.text(&clip(header, 11.0, w - 2.0), 11.0, x, &fonts.bold);
            x += w;
        }
        self.y += ROW_H;
        self.rule(MARGIN, PAGE_W - MARGIN, self.y - 4.0);
    }

    /// Place a JPEG centered at `width_mm` wide, aspect preserved. Advances
    /// the cursor past the image and returns its rendered height.
    pub fn place_jpeg(&mut self, bytes: &[u8], width_mm: f32) -> Result<f32, String> {
        let decoder = JpegDecoder::new(Cursor::new(bytes)).map_err(|e| e.to_string())?;
        let image = Image::try_from(decoder).map_err(|e| e.to_string())?;

        let natural_w = Mm::from(image.image.width.into_pt(300.0)).0;
        let natural_h = Mm::from(image.image.height.into_pt(300.0)).0;
        let scale = width_mm / natural_w;
        let height_mm = natural_h * scale;
        let x = (PAGE_W - width_mm) / 2.0;

        image.add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(x)),
                translate_y: Some(Mm(PAGE_H - self.y - height_mm)),
                scale_x: Some(scale),
                scale_y: Some(scale),
                ..Default::default()
            },
        );
        self.y += height_mm;
        Ok(height_mm)
    }

    pub fn finish(self) -> Result<Vec<u8>, printpdf::Error> {
        self.doc.save_to_bytes()
    }
}

/// Approximate Helvetica line width in millimetres. Half an em per glyph is
/// close enough for centering and greedy wrapping.
pub fn text_width(text: &str, size_pt: f32) -> f32 {
    text.chars().count() as f32 * size_pt * 0.352_778 * 0.5
}

fn clip(text: &str, size_pt: f32, max_w: f32) -> String {
    if text_width(text, size_pt) <= max_w {
        return text.to_string();
    }
    let mut out = String::new();
    for c in text.chars() {
        if text_width(&out, size_pt) + text_width("..", size_pt) >= max_w {
            out.push_str("..");
            break;
        }
        out.push(c);
    }
    out
}

/// Greedy word wrap to `max_w` millimetres. Words longer than the line are
/// emitted on their own line rather than split.
pub fn wrap(text: &str, size_pt: f32, max_w: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if text_width(&candidate, size_pt) <= max_w || current.is_empty() {
            current = candidate;
        } else {
            lines.push(current);
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_keeps_lines_within_width() {
        let text = "Creatine Monohydrate (5g), Fish Oil, Multivitamin, ZMA, Whey Protein Isolate";
        let lines = wrap(text, 11.0, 60.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width(line, 11.0) <= 60.0, "too wide: {line}");
        }
    }

    #[test]
    fn wrap_of_short_text_is_one_line() {
        assert_eq!(wrap("Essentials: ZMA", 11.0, 170.0).len(), 1);
    }

    #[test]
    fn overlong_word_is_not_split() {
        let lines = wrap("a Supercalifragilisticexpialidocious b", 11.0, 20.0);
        assert!(lines.contains(&"Supercalifragilisticexpialidocious".to_string()));
    }

    #[test]
    fn clip_shortens_wide_cells() {
        let clipped = clip("A very long food item name that cannot fit", 10.0, 30.0);
        assert!(clipped.ends_with(".."));
        assert!(text_width(&clipped, 10.0) <= 30.0 + 4.0);
    }
}
