//! Runs the controller's remote calls off the event loop.
//!
//! Each call gets its own tokio task, so a slow suggestion never blocks typing or
//! language detection. The settled [`Completion`] is posted back onto the event bus
//! as `AppEvent::Analysis` and applied by the main loop in arrival order.

use std::sync::Arc;

use critic_core::{driver, AnalysisClient, RemoteCall};
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::event::AppEvent;

pub fn spawn_call(
    call: RemoteCall,
    client: Arc<dyn AnalysisClient>,
    event_tx: UnboundedSender<AppEvent>,
) {
    tokio::spawn(async move {
        let kind = call.kind();
        let completion = driver::execute(call, client.as_ref()).await;
        if event_tx.send(AppEvent::Analysis(completion)).is_err() {
            debug!(call = kind, "event loop gone, dropping completion");
        }
    });
}
