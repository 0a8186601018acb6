//! Markup-to-HTML compiler seam.
//!
//! The core treats compilation as a black box: it hands over a markup
//! string and gets email-safe HTML back, or a descriptive failure. The
//! emission pipeline calls implementations through `spawn_blocking`, so a
//! slow compiler never stalls user-initiated mutations.

use thiserror::Error;

/// Successful compilation output.
#[derive(Debug, Clone)]
pub struct CompiledEmail {
    pub html: String,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error("Markup compilation failed: {0}")]
    Failed(String),

    #[error("Compiler is unavailable: {0}")]
    Unavailable(String),
}

/// External compiler collaborator turning markup into final HTML.
pub trait MjmlCompiler: Send + Sync {
    fn compile(&self, mjml: &str) -> Result<CompiledEmail, CompileError>;
}
