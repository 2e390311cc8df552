//! Results of control operations that did not fail.

/// What a control operation did.
///
/// Operations return `Err` only for device failures. Everything else, including
/// deliberately doing nothing, is reported through this type so the panel can
/// tell a skipped write from a sent one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Commands were sent and the device accepted them.
    Applied,
    /// The requested value is already the cached one; nothing was sent.
    Unchanged,
    /// Outbound dispatch is suppressed while the panel is being synced.
    Suppressed,
    /// The controller failed its initial state query; nothing was sent.
    Disabled,
    /// The control does not belong to the active mode; nothing was sent.
    Inactive,
    /// The bulb link is down; nothing was sent.
    Offline,
}

impl Outcome {
    pub fn was_sent(self) -> bool {
        matches!(self, Outcome::Applied)
    }
}
