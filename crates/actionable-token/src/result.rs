use crate::error::Error;

/// Outcome of validating one actionable message token
///
/// A successful result carries the acting user and the sender and no cause. A failed
/// result carries the cause and neither identity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationResult {
    succeeded: bool,
    action_performer: Option<String>,
    sender: Option<String>,
    error: Option<Error>,
}

impl ValidationResult {
    pub(crate) fn success(action_performer: String, sender: Option<String>) -> Self {
        Self {
            succeeded: true,
            action_performer: Some(action_performer),
            sender,
            error: None,
        }
    }

    pub(crate) fn failure(error: Error) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }

    /// Whether every trust check passed
    pub fn validation_succeeded(&self) -> bool {
        self.succeeded
    }

    /// The user who performed the action (the token's subject)
    pub fn action_performer(&self) -> Option<&str> {
        self.action_performer.as_deref()
    }

    /// The user who sent the actionable message
    pub fn sender(&self) -> Option<&str> {
        self.sender.as_deref()
    }

    /// Why the token was rejected
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    /// Consume the result, yielding the identities or the rejection cause
    pub fn into_result(self) -> Result<(String, Option<String>), Error> {
        match (self.succeeded, self.action_performer, self.error) {
            (true, Some(performer), _) => Ok((performer, self.sender)),
            (_, _, Some(error)) => Err(error),
            _ => Err(Error::IdentityNotFound),
        }
    }
}
