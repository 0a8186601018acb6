//! Error types for the editor.

use ebb_document::ParseError;
use thiserror::Error;

use crate::compiler::CompileError;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Design JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Compile error: {0}")]
    Compile(#[from] CompileError),

    #[error("Emission pipeline is not running")]
    PipelineUnavailable,
}

pub type EditorResult<T> = Result<T, EditorError>;
