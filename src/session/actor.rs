//! # Session Actor
//!
//! Hosts one [`WorkflowEngine`] and feeds it operator events. A submit only validates and
//! reserves the engine; the service calls run in a spawned task, and their
//! [`Completion`] comes back through an internal channel that is polled alongside the
//! event channel. Events keep flowing while a request is in flight, which is what makes
//! the busy gate and the stale-response guard observable.

use crate::framework::{Completion, Resource, ResourceService, ScreenSnapshot, SubmitOutcome, WorkflowEngine};
use crate::session::{Reply, SessionClient, SessionEvent, SubmitReceipt};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

pub struct SessionActor<T: Resource, S> {
    receiver: mpsc::Receiver<SessionEvent<T>>,
    engine: WorkflowEngine<T>,
    service: Arc<S>,
    completions_tx: mpsc::UnboundedSender<Completion<T>>,
    completions_rx: mpsc::UnboundedReceiver<Completion<T>>,
    outstanding: usize,
    settling: Vec<Reply<ScreenSnapshot<T>>>,
}

impl<T, S> SessionActor<T, S>
where
    T: Resource,
    S: ResourceService<T> + 'static,
{
    pub fn new(buffer_size: usize, service: Arc<S>) -> (Self, SessionClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        let actor = Self {
            receiver,
            engine: WorkflowEngine::new(),
            service,
            completions_tx,
            completions_rx,
            outstanding: 0,
            settling: Vec::new(),
        };
        (actor, SessionClient::new(sender))
    }

    /// Runs until every client has been dropped. Requests still in flight at that point
    /// finish in the background and their results are dropped.
    pub async fn run(mut self) {
        let kind = T::KIND;
        info!(kind, "Session started");

        loop {
            tokio::select! {
                Some(completion) = self.completions_rx.recv() => {
                    self.outstanding -= 1;
                    self.apply(completion);
                    self.release_settled();
                }
                event = self.receiver.recv() => match event {
                    Some(event) => self.handle(event),
                    None => break,
                },
            }
        }

        info!(kind, outstanding = self.outstanding, "Session closed");
    }

    fn handle(&mut self, event: SessionEvent<T>) {
        match event {
            SessionEvent::SelectMode { kind, respond_to } => {
                self.engine.select_mode(kind);
                let _ = respond_to.send(());
            }
            SessionEvent::SetField {
                name,
                value,
                respond_to,
            } => {
                let _ = respond_to.send(self.engine.set_field(&name, value));
            }
            SessionEvent::SetSearchMode {
                search_mode,
                respond_to,
            } => {
                let _ = respond_to.send(self.engine.set_search_mode(search_mode));
            }
            SessionEvent::SetQuery { query, respond_to } => {
                let _ = respond_to.send(self.engine.set_query(query));
            }
            SessionEvent::Submit { respond_to } => {
                let _ = respond_to.send(self.submit());
            }
            SessionEvent::Cancel { respond_to } => {
                self.engine.cancel();
                let _ = respond_to.send(());
            }
            SessionEvent::Snapshot { respond_to } => {
                let _ = respond_to.send(self.engine.snapshot());
            }
            SessionEvent::Settle { respond_to } => {
                self.settling.push(respond_to);
                self.release_settled();
            }
        }
    }

    fn submit(&mut self) -> SubmitReceipt {
        let request = match self.engine.begin_submit() {
            Ok(Some(request)) => request,
            Ok(None) => return SubmitReceipt::Ignored,
            Err(e) => return SubmitReceipt::Rejected(e),
        };
        let ticket = request.ticket;
        let service = Arc::clone(&self.service);
        let completions = self.completions_tx.clone();
        self.outstanding += 1;
        tokio::spawn(async move {
            let completion = request.execute(service.as_ref()).await;
            let _ = completions.send(completion);
        });
        SubmitReceipt::Accepted(ticket)
    }

    fn apply(&mut self, completion: Completion<T>) {
        let ticket = completion.ticket;
        match self.engine.complete(completion) {
            Ok(SubmitOutcome::Discarded) => debug!(kind = T::KIND, ?ticket, "Late response dropped"),
            Ok(outcome) => debug!(kind = T::KIND, ?ticket, ?outcome, "Response applied"),
            Err(e) => warn!(kind = T::KIND, ?ticket, error = %e, "Request failed"),
        }
    }

    fn release_settled(&mut self) {
        if self.outstanding > 0 {
            return;
        }
        for respond_to in self.settling.drain(..) {
            let _ = respond_to.send(self.engine.snapshot());
        }
    }
}
