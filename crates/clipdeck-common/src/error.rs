use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClipdeckError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("Feed error: {0}")]
    Feed(String),
}
