//! The document-renderer contract.
//!
//! PDF generation itself stays outside this system; callers hand the
//! renderer an HTML template name and a property bag and get bytes back.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Renderer failure. Rendering is a best-effort side channel: callers log
/// these and move on.
#[derive(Debug, Error)]
#[error("document rendering failed: {0}")]
pub struct RenderError(pub String);

/// Renders paperwork from an HTML template and a property bag.
#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    /// Produces the rendered document as raw bytes.
    async fn render(&self, template: &str, props: &Value) -> Result<Vec<u8>, RenderError>;
}
