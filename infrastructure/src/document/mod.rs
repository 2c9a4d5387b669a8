//! Document hosts implementing the [`DocumentAdapter`](sideview_application::DocumentAdapter) port

mod text_document;

pub use text_document::TextDocument;
