use crate::state::messages::{Payload, ViewToken};
use chrono::{DateTime, Local};

// ---------------------------------------------------------------------------
// Active view and the latest result accepted for it
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct ViewState {
    issued: u64,
    active: Option<ViewToken>,
    pub latest: Option<Payload>,
    pub updated_at: Option<DateTime<Local>>,
}

impl ViewState {
    /// Start (or restart) the view. Any request still in flight for an
    /// earlier token becomes stale.
    pub fn begin(&mut self) -> ViewToken {
        self.issued += 1;
        let token = ViewToken(self.issued);
        self.active = Some(token);
        token
    }

    /// The view went away; nothing may update it any more.
    pub fn close(&mut self) {
        self.active = None;
    }

    pub fn is_active(&self, token: ViewToken) -> bool {
        self.active == Some(token)
    }

    /// Store `payload` if it answers the active request. Returns false for a
    /// stale response, which is dropped.
    pub fn accept(&mut self, token: ViewToken, payload: Payload) -> bool {
        if !self.is_active(token) {
            log::debug!("dropping stale response for {token:?}");
            return false;
        }
        self.latest = Some(payload);
        self.updated_at = Some(Local::now());
        true
    }
}
