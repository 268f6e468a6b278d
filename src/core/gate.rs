use super::item::ItemId;

/// Two-step guard in front of destructive deletes.
///
/// `Idle` until a delete is requested, then `PendingConfirm(id)` until the
/// user confirms or cancels. A second request while pending replaces the
/// stored target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfirmationGate {
    pending: Option<ItemId>,
}

impl ConfirmationGate {
    pub fn request(&mut self, id: ItemId) {
        if let Some(previous) = self.pending.replace(id) {
            log::debug!("Confirmation target {} replaced", previous);
        }
    }

    /// Returns the id to delete, leaving the gate idle.
    pub fn confirm(&mut self) -> Option<ItemId> {
        self.pending.take()
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn pending(&self) -> Option<&ItemId> {
        self.pending.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        self.pending.is_some()
    }
}
