// Inbound push message pipeline: payload, template, builder, presenter, receive tracking

use std::collections::HashMap;
use std::sync::Arc;

use super::builder::{BuildOutcome, NotificationBuilder};
use super::interaction::{NotificationInteraction, PlatformCommand};
use super::payload::{PushPayload, RemoteNotification};
use super::services::{EventDispatcher, ImageFetcher, NotificationPresenter};
use super::template::PushTemplate;
use super::tracking::{TrackingDispatcher, TrackingKind};
use super::CampaignResult;

/// Turns incoming push messages into displayed notifications
#[derive(Clone)]
pub struct PushMessageHandler {
    builder: NotificationBuilder,
    presenter: Arc<dyn NotificationPresenter>,
    tracking: TrackingDispatcher,
}

impl PushMessageHandler {
    pub fn new(
        fetcher: Arc<dyn ImageFetcher>,
        presenter: Arc<dyn NotificationPresenter>,
        dispatcher: Arc<dyn EventDispatcher>,
    ) -> Self {
        Self {
            builder: NotificationBuilder::new(fetcher),
            presenter,
            tracking: TrackingDispatcher::new(dispatcher),
        }
    }

    pub fn tracking(&self) -> &TrackingDispatcher {
        &self.tracking
    }

    /// Display `data` as a notification
    ///
    /// Returns `false` when the message is not a valid Campaign message or could not be shown.
    pub async fn handle_remote_message(
        &self,
        data: HashMap<String, String>,
        notification: Option<&RemoteNotification>,
    ) -> bool {
        match self.process(data, notification).await {
            Ok(outcome) => {
                tracing::debug!(
                    builder = %outcome.builder,
                    tag = %outcome.spec.tag,
                    fallback = outcome.fallback.is_some(),
                    "Displayed push notification"
                );
                true
            },
            Err(e) => {
                tracing::warn!(error = %e, "Failed to handle remote message");
                false
            },
        }
    }

    /// Apply an interaction: report the click, update the tray through the presenter
    ///
    /// Returns the commands only the host app can carry out (opening links or the app,
    /// scheduling a reminder).
    pub fn handle_interaction(&self, interaction: NotificationInteraction) -> Vec<PlatformCommand> {
        let outcome = interaction.reduce();
        outcome.dispatch_tracking(&self.tracking);

        let (tray, host): (Vec<_>, Vec<_>) = outcome
            .commands
            .into_iter()
            .partition(PlatformCommand::is_tray_command);
        for command in tray {
            match command {
                PlatformCommand::Cancel(tag) => self.presenter.cancel(&tag),
                PlatformCommand::CancelAll => self.presenter.cancel_all(),
                PlatformCommand::Redraw(spec) => {
                    if let Err(e) = self.presenter.notify(&spec) {
                        tracing::warn!(tag = %spec.tag, error = %e, "Failed to redraw notification");
                    }
                },
                _ => {},
            }
        }
        host
    }

    async fn process(
        &self,
        data: HashMap<String, String>,
        notification: Option<&RemoteNotification>,
    ) -> CampaignResult<BuildOutcome> {
        let payload = PushPayload::from_message(data, notification)?;
        let template = PushTemplate::from_payload(&payload)?;
        let outcome = self.builder.build(&template).await;

        self.presenter.notify(&outcome.spec)?;
        self.tracking
            .track_info(TrackingKind::Receive, &payload.track_info());
        Ok(outcome)
    }
}

impl std::fmt::Debug for PushMessageHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PushMessageHandler")
            .field("builder", &self.builder)
            .finish_non_exhaustive()
    }
}
