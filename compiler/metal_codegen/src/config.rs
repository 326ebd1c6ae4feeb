//! Per-backend settings.

/// Settings a backend is loaded with.
///
/// `word_type` and `char_type` become global template bindings, so any
/// template may reference `$(word_type)` without the construct binding it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BackendConfig {
    /// Target type of a machine word.
    pub word_type: String,
    /// Target type of one string character.
    pub char_type: String,
    /// One level of indentation in formatted output.
    pub indent: String,
    /// Comment marker recognised between blocks of frame files.
    pub one_line_comment: String,
    /// Render top-level declarations concurrently.
    pub parallel: bool,
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig {
            word_type: "uint32_t".to_string(),
            char_type: "char".to_string(),
            indent: "    ".to_string(),
            one_line_comment: "//".to_string(),
            parallel: true,
        }
    }
}

impl BackendConfig {
    #[must_use]
    pub fn with_word_type(mut self, ty: impl Into<String>) -> Self {
        self.word_type = ty.into();
        self
    }

    #[must_use]
    pub fn with_char_type(mut self, ty: impl Into<String>) -> Self {
        self.char_type = ty.into();
        self
    }

    #[must_use]
    pub fn with_indent(mut self, unit: impl Into<String>) -> Self {
        self.indent = unit.into();
        self
    }

    #[must_use]
    pub fn with_one_line_comment(mut self, marker: impl Into<String>) -> Self {
        self.one_line_comment = marker.into();
        self
    }

    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}
