pub mod pdf;

pub use pdf::{PdfArtifact, PdfError, PdfOptions, PdfRenderer, PdfService, RenderStage};
