//! Graph renderer trait definitions.

use async_trait::async_trait;
use ozon_report_common::Result;
use std::path::Path;

/// Trait for graphs that can be rendered to an image file.
#[async_trait]
pub trait GraphRenderer: Send + Sync {
    /// Renders the graph as a PNG at `path`, creating parent directories.
    async fn render_to_file(&self, path: &Path) -> Result<()>;

    /// Gets the name of this graph type.
    fn name(&self) -> &'static str;

    /// Gets the description of this graph type.
    fn description(&self) -> &'static str;
}
