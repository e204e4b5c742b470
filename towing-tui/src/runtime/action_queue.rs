use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use towing_core::domain::Activity;

/// Results of background work, drained by the event loop between frames.
#[derive(Debug)]
pub(super) enum Action {
    ScanFinished {
        contract_id: String,
        result: Result<Vec<Activity>, String>,
    },
}

pub(super) type ActionTx = UnboundedSender<Action>;
pub(super) type ActionRx = UnboundedReceiver<Action>;

pub(super) fn channel() -> (ActionTx, ActionRx) {
    mpsc::unbounded_channel()
}
