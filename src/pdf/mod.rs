mod layout;
mod render;

pub use render::{generate, pdf_filename, PdfError};
