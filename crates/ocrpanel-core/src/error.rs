use thiserror::Error;

/// Rejections raised by the drag selection before anything is submitted
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SelectionError {
    #[error(
        "Region is too small ({width}x{height} pixels). Please select a region at least {min}x{min} pixels."
    )]
    TooSmall { width: f64, height: f64, min: u32 },

    /// The screenshot is shown enlarged and the selection collapses to
    /// nothing at the image's own resolution
    #[error(
        "Region is too small at full resolution ({width}x{height} pixels). Please select a larger region."
    )]
    Degenerate { width: i64, height: i64 },

    #[error("Selection released outside the screenshot")]
    OutsideContainer,

    #[error("No selection in progress")]
    NotSelecting,

    #[error("Take a screenshot before selecting a region")]
    NoScreenshot,

    #[error("Select a region before saving it")]
    NothingToSave,
}

/// Local validation failures of the settings editors; never sent to the server
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a keyword first.")]
    EmptyKeyword,

    #[error("This keyword already exists.")]
    DuplicateKeyword,

    #[error("No {list} at index {index}")]
    IndexOutOfRange { list: &'static str, index: usize },

    #[error("Please enter a webhook URL first.")]
    EmptyWebhookUrl,
}

/// Outcome of a failed editor operation
#[derive(Debug, Error)]
pub enum EditError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error("{0:#}")]
    Backend(#[from] anyhow::Error),
}

impl EditError {
    /// True when the request never left the client
    pub fn is_local(&self) -> bool {
        !matches!(self, EditError::Backend(_))
    }
}
