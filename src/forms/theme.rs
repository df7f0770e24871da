//! Field styling bundle.

use crate::seed::Options;

/// Options applied to the parts of a form field.
#[derive(Debug, Clone, Default)]
pub struct FieldTheme {
    /// The title paragraph.
    pub title: Options,
    /// Single-line inputs.
    pub field: Options,
    /// Multi-line inputs.
    pub area: Options,
    /// The column wrapping the whole field.
    pub column: Options,
    /// The error message paragraph.
    pub error_text: Options,
    /// Applied to the input while it is in error.
    pub error_box: Options,
}

impl FieldTheme {
    /// An empty theme.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title options (builder).
    pub fn with_title(mut self, options: Options) -> Self {
        self.title = options;
        self
    }

    /// Set the single-line input options (builder).
    pub fn with_field(mut self, options: Options) -> Self {
        self.field = options;
        self
    }

    /// Set the multi-line input options (builder).
    pub fn with_area(mut self, options: Options) -> Self {
        self.area = options;
        self
    }

    /// Set the column options (builder).
    pub fn with_column(mut self, options: Options) -> Self {
        self.column = options;
        self
    }

    /// Set the error text options (builder).
    pub fn with_error_text(mut self, options: Options) -> Self {
        self.error_text = options;
        self
    }

    /// Set the error box options (builder).
    pub fn with_error_box(mut self, options: Options) -> Self {
        self.error_box = options;
        self
    }
}
