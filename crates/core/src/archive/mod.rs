//! Document archive for rendered paperwork (quotes, receipts, order
//! printouts) and the renderer contract.

mod config;
mod error;
mod renderer;
mod service;

pub use config::{ArchiveConfig, ArchiveProvider};
pub use error::ArchiveError;
pub use renderer::{DocumentRenderer, RenderError};
pub use service::ArchiveService;
