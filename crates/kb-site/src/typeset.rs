//! Math typesetting hook.
//!
//! Chapter pages carry raw LaTeX inside `\[ ... \]` delimiters. After a
//! chapter is composed, the viewer asks a [`MathTypesetter`] to process the
//! main region. In the browser that is MathJax; server-side the default is
//! [`NoopTypesetter`] and the client is told to typeset instead.

/// Error reported by a typesetter. Never fatal: the page stays readable with
/// raw LaTeX.
#[derive(Debug, thiserror::Error)]
#[error("Math typesetting failed for {region}: {message}")]
pub struct TypesetError {
    pub region: String,
    pub message: String,
}

/// Renders math inside a named page region.
pub trait MathTypesetter: Send + Sync {
    /// Typeset every math expression inside `region`.
    fn typeset(&self, region: &str) -> Result<(), TypesetError>;
}

/// Typesetter that does nothing and always succeeds.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTypesetter;

impl MathTypesetter for NoopTypesetter {
    fn typeset(&self, region: &str) -> Result<(), TypesetError> {
        tracing::trace!(region, "Deferring math typesetting to the client");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static_assertions::assert_impl_all!(NoopTypesetter: MathTypesetter, Send, Sync);

    #[test]
    fn test_noop_succeeds() {
        assert!(NoopTypesetter.typeset("main-content").is_ok());
    }

    #[test]
    fn test_error_display() {
        let err = TypesetError {
            region: "main-content".to_owned(),
            message: "MathJax not loaded".to_owned(),
        };

        assert_eq!(
            err.to_string(),
            "Math typesetting failed for main-content: MathJax not loaded"
        );
    }
}
