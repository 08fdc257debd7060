use thiserror::Error;

/// All errors that the crate can generate
#[derive(Error, Debug)]
pub enum TableError {
    /// The draw collaborator failed. The remainder of the table render is
    /// aborted; pages drawn so far are not rolled back.
    #[error("draw target failed: {0}")]
    Draw(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The measurement collaborator failed.
    #[error("text measurement failed: {0}")]
    Measure(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error(transparent)]
    /// [owned_ttf_parser] failed to parse a font face handed to [`FontMeasurer`](crate::FontMeasurer)
    FaceParsingError(#[from] owned_ttf_parser::FaceParsingError),
}

impl TableError {
    /// Wrap an arbitrary error from a draw collaborator.
    pub fn draw(err: impl std::error::Error + Send + Sync + 'static) -> TableError {
        TableError::Draw(Box::new(err))
    }

    /// Wrap an arbitrary error from a measurement collaborator.
    pub fn measure(err: impl std::error::Error + Send + Sync + 'static) -> TableError {
        TableError::Measure(Box::new(err))
    }
}
