//! Request-scoped identity
//!
//! The gate stores an [`AuthenticatedContext`] in the request extensions of
//! every protected call it lets through. Extensions are keyed by type, and this
//! type can only be constructed inside the crate, so no header, metadata entry
//! or other middleware can forge or shadow it.

/// Identity extracted from a verified token, valid for one call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedContext {
    subject: String,
}

impl AuthenticatedContext {
    pub(crate) fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
        }
    }

    /// Subject (principal identifier) from the token's `sub` claim
    pub fn subject(&self) -> &str {
        &self.subject
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_accessors() {
        let ctx = AuthenticatedContext::new("u1");

        assert_eq!(ctx.subject(), "u1");
        assert_eq!(ctx, AuthenticatedContext::new(String::from("u1")));
    }
}
