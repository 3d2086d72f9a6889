//! Identifier escaping

/// An injected transform applied to table and column names before they are
/// embedded in SQL text.
///
/// Returning `None` for a column excludes that column (and its paired value)
/// from the operation entirely. The hook is never applied to bound values,
/// only to identifiers.
pub trait EscapeHook: Send + Sync {
    fn escape(&self, ident: &str) -> Option<String>;
}

impl<F> EscapeHook for F
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    fn escape(&self, ident: &str) -> Option<String> {
        self(ident)
    }
}
