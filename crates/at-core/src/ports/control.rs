use std::sync::Arc;

use crate::errors::TransferError;
use crate::ports::OutboundMessage;
use crate::security::IdentityKey;

/// Control collaborator: key access, error reporting and resend requests.
///
/// Methods must not block; the worker calls them inline.
pub trait ControlPort: Send + Sync {
    /// Active identity key, `None` while the account is locked or missing.
    fn current_identity_key(&self) -> Option<IdentityKey>;

    /// Surface a transport failure to the user.
    fn report_failure(&self, error: &TransferError);

    /// Send the message again, e.g. after its attachment was re-uploaded.
    fn resend_message(&self, message: Arc<dyn OutboundMessage>);
}
