use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum KeggError {
    #[error("invalid organism code: {0:?}")]
    InvalidOrganism(String),

    #[error("KEGG request failed: {0}")]
    KeggHttp(String),

    #[error("KEGG returned status {status}: {message}")]
    KeggStatus { status: u16, message: String },

    #[error("identifier {raw:?} does not match expected shape {expected}")]
    Parse { raw: String, expected: String },

    #[error("filesystem error: {0}")]
    Filesystem(String),
}
