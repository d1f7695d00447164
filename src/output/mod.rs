// Fri Oct 16 2026 - Alex

pub mod template;
pub mod render;
pub mod manager;

pub use template::{TemplateEngine, TemplateError};
pub use render::{HeaderRenderer, Render};
pub use manager::OutputManager;
