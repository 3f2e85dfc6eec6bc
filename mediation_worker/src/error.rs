use thiserror::Error;

use crate::{lines, sheet};

#[derive(Debug, Error)]
pub enum Error {
    #[error("Opening the sheet file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Configuration sheet: {0}")]
    Sheet(#[from] sheet::Error),
    #[error("Mediation group lines: {0}")]
    Lines(#[from] lines::Error),
}
