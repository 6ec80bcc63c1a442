use super::{FetchRequest, HistoryTable, HistoryView, Navigation};
use crate::config::ClientConfig;
use detection_api_caller::{
    error::RequestError, json::history::HistoryPage, traits::DetectionApi,
};
use futures::{StreamExt, stream::FuturesUnordered};
use std::sync::Arc;
use tokio::{
    sync::{mpsc::UnboundedReceiver, oneshot},
    task::JoinHandle,
};
use tracing::Instrument;
use utils::struct_name;

const STRUCT_NAME: &str = struct_name!(HistoryTableHandler);

type FetchOutcome = (FetchRequest, Result<HistoryPage, RequestError>);

pub enum HistoryTableCommand {
    /// Move to another page. The sender, if any, gets whether a fetch was started.
    Navigate(Navigation, Option<oneshot::Sender<bool>>),
    /// Fetch the current page again
    Reload,
    /// The view as it is right now, possibly `Loading`
    GetView(oneshot::Sender<HistoryView>),
    /// The view once no fetch is outstanding
    GetViewWhenLoaded(oneshot::Sender<HistoryView>),
    /// Stops the event loop and abandons outstanding fetches
    Stop,
}

/// Owns a [`HistoryTable`] and runs its fetches concurrently with incoming commands.
/// Responses are applied through the table's generation check, so a slow response for
/// a page the user already left never overwrites a newer one.
#[must_use]
pub struct HistoryTableHandler {
    /// Commands that control this struct
    command_receiver: UnboundedReceiver<HistoryTableCommand>,

    api: Arc<dyn DetectionApi>,
    config: Arc<ClientConfig>,
    table: HistoryTable,

    running_fetches: FuturesUnordered<JoinHandle<FetchOutcome>>,
    view_waiters: Vec<oneshot::Sender<HistoryView>>,

    /// Stops the event loop
    stopped: bool,
}

impl HistoryTableHandler {
    pub fn new(
        command_receiver: UnboundedReceiver<HistoryTableCommand>,
        api: Arc<dyn DetectionApi>,
        config: Arc<ClientConfig>,
        table: HistoryTable,
    ) -> Self {
        Self {
            command_receiver,
            api,
            config,
            table,
            running_fetches: FuturesUnordered::default(),
            view_waiters: Vec::new(),
            stopped: false,
        }
    }

    /// Mounts the table (first fetch) and processes commands until `Stop`
    /// or until every command sender is gone
    pub async fn run(mut self) {
        let request = self.table.mount();
        self.launch_fetch(request);

        while !self.stopped {
            tokio::select! {
                command = self.command_receiver.recv() => {
                    match command {
                        Some(command) => self.on_command(command),
                        None => {
                            tracing::debug!("{STRUCT_NAME}: all command senders dropped");
                            self.stopped = true;
                        }
                    }
                }

                Some(fetch_result) = self.running_fetches.next() => {
                    self.on_fetch_joined(fetch_result);
                }
            }
        }

        for fetch in &self.running_fetches {
            fetch.abort();
        }

        tracing::debug!("Reached the end of {STRUCT_NAME} event loop.");
    }

    fn on_command(&mut self, command: HistoryTableCommand) {
        match command {
            HistoryTableCommand::Navigate(navigation, started_sender) => {
                let request = self.table.navigate(navigation);
                let started = request.is_some();
                if let Some(request) = request {
                    self.launch_fetch(request);
                }
                if let Some(Err(_)) = started_sender.map(|s| s.send(started)) {
                    tracing::warn!("{STRUCT_NAME}: navigation result receiver dropped");
                }
            }
            HistoryTableCommand::Reload => {
                let request = self.table.reload();
                self.launch_fetch(request);
            }
            HistoryTableCommand::GetView(sender) => {
                if sender.send(self.table.render(&self.config)).is_err() {
                    tracing::warn!("{STRUCT_NAME}: view receiver dropped");
                }
            }
            HistoryTableCommand::GetViewWhenLoaded(sender) => {
                self.view_waiters.push(sender);
                self.flush_view_waiters();
            }
            HistoryTableCommand::Stop => {
                self.stopped = true;
            }
        }
    }

    fn on_fetch_joined(&mut self, fetch_result: Result<FetchOutcome, tokio::task::JoinError>) {
        match fetch_result {
            Ok((request, result)) => {
                if self.table.apply(&request, result) {
                    self.flush_view_waiters();
                }
            }
            Err(e) => {
                tracing::error!("CRITICAL: {STRUCT_NAME} fetch task joined with error: {e}");
            }
        }
    }

    fn flush_view_waiters(&mut self) {
        if self.table.is_loading() {
            return;
        }

        let view = self.table.render(&self.config);
        for waiter in self.view_waiters.drain(..) {
            if waiter.send(view.clone()).is_err() {
                tracing::warn!("{STRUCT_NAME}: view receiver dropped");
            }
        }
    }

    fn launch_fetch(&self, request: FetchRequest) {
        let api = self.api.clone();
        let page = request.page();
        let handle = tokio::task::spawn(
            async move {
                let result = api
                    .detection_history(request.query())
                    .await
                    .map(HistoryPage::from);
                (request, result)
            }
            .instrument(tracing::debug_span!("history_fetch", page)),
        );
        self.running_fetches.push(handle);
    }
}
