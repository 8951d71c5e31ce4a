use std::sync::Arc;
use std::sync::mpsc::Sender;

use tokio::runtime::Handle;
use tracing::{debug, warn};

use crate::app::Message;
use crate::app::model::{Model, Request};
use crate::gateway::Gateway;
use crate::pages::PageDraft;

/// Starts queued gateway calls and reports their results as messages.
///
/// Each request runs as its own task on the runtime; the result comes back
/// through `tx` and is applied by the event loop in arrival order.
pub struct Dispatcher<G> {
    runtime: Handle,
    gateway: Arc<G>,
    tx: Sender<Message>,
}

impl<G: Gateway + 'static> Dispatcher<G> {
    pub fn new(runtime: Handle, gateway: G, tx: Sender<Message>) -> Self {
        Self {
            runtime,
            gateway: Arc::new(gateway),
            tx,
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Start every request queued on the model.
    ///
    /// Returns the number of requests started.
    pub fn dispatch(&self, model: &mut Model) -> usize {
        let requests = model.take_requests();
        let count = requests.len();
        for request in requests {
            self.spawn(request);
        }
        count
    }

    fn spawn(&self, request: Request) {
        debug!(?request, "dispatching gateway request");
        let gateway = Arc::clone(&self.gateway);
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let msg = match request {
                Request::Load => Message::PagesLoaded(gateway.list_pages().await),
                Request::Create => {
                    Message::PageCreated(gateway.create_page(&PageDraft::blank()).await)
                }
                Request::Update { id, update } => {
                    let result = gateway.update_page(&id, &update).await;
                    Message::PageUpdated(id, result)
                }
                Request::Delete { id } => {
                    let result = gateway.delete_page(&id).await;
                    Message::PageDeleted(id, result)
                }
            };
            if tx.send(msg).is_err() {
                warn!("event loop closed before gateway result arrived");
            }
        });
    }
}
