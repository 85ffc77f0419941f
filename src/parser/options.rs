//! Parsing options and configuration.

/// Options for parsing PDF documents.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Error handling mode
    pub error_mode: ErrorMode,

    /// Parse at most this many leading pages (`None` = all pages)
    pub max_pages: Option<u32>,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (skip pages whose content cannot be decoded).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Limit parsing to the first `pages` pages.
    pub fn with_max_pages(mut self, pages: u32) -> Self {
        self.max_pages = Some(pages);
        self
    }

    /// Whether a page number falls inside the configured limit.
    pub fn includes(&self, page_num: u32) -> bool {
        self.max_pages.map_or(true, |max| page_num <= max)
    }
}

/// Error handling mode during parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on any error
    #[default]
    Strict,
    /// Keep broken pages empty and continue
    Lenient,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_options_builder() {
        let options = ParseOptions::new().lenient().with_max_pages(3);

        assert_eq!(options.error_mode, ErrorMode::Lenient);
        assert!(options.includes(3));
        assert!(!options.includes(4));
    }

    #[test]
    fn test_default_options() {
        let options = ParseOptions::default();
        assert_eq!(options.error_mode, ErrorMode::Strict);
        assert!(options.includes(10_000));
    }
}
