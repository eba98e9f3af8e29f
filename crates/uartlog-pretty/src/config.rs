use crate::framing::FramingScheme;
use crate::render::RenderOptions;

/// Configuration for processing capture logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrettyConfig {
    /// Forced framing scheme. `None` picks one from each file name.
    pub scheme: Option<FramingScheme>,
    /// Frame rendering variants.
    pub render: RenderOptions,
    /// Collapse repeated frame sequences into `R` marker rows.
    pub compress: bool,
}

impl Default for PrettyConfig {
    fn default() -> Self {
        Self {
            scheme: None,
            render: RenderOptions::default(),
            compress: true,
        }
    }
}

impl PrettyConfig {
    /// Scheme used for a file with the given name.
    pub fn scheme_for(&self, file_name: &str) -> FramingScheme {
        self.scheme
            .unwrap_or_else(|| FramingScheme::from_file_name(file_name))
    }
}
