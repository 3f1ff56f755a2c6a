use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Can't read file: {0}")]
    FileReadError(String),

    #[error("Can't create file: {0}")]
    FileWriteError(String),

    #[error("Error parsing region: {0}")]
    RegionParseError(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
