use crate::SessionId;

/// A server-generated text message addressed to a session. A notification
/// with no session id is dropped by the dispatcher: the addressee is not
/// currently connected.
#[derive(Debug, Clone)]
pub struct Notification {
    pub session_id: Option<SessionId>,
    pub text: String,
}

impl Notification {
    pub fn to(session_id: SessionId, text: impl Into<String>) -> Self {
        Self { session_id: Some(session_id), text: text.into() }
    }

    /// Addressed to whoever `session_id` resolves to, or dropped if `None`
    /// (e.g. the seller of a settled auction who isn't currently logged in).
    pub fn maybe_to(session_id: Option<SessionId>, text: impl Into<String>) -> Self {
        Self { session_id, text: text.into() }
    }
}
