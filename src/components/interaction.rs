// User interaction with a displayed notification
// Interactions reduce to platform commands plus the click tracking they imply

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::builder::{NotificationLayout, NotificationSpec};
use super::carousel::{Direction, Navigate};
use super::payload::TrackInfo;
use super::template::{ActionButton, ActionType};
use super::tracking::{TrackingDispatcher, TrackingKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationInteraction {
    /// Body tap
    Opened(NotificationSpec),
    Dismissed { tag: String },
    ButtonClicked {
        spec: NotificationSpec,
        button: ActionButton,
    },
    /// Left/right arrow on a manual or filmstrip carousel
    Navigate {
        spec: NotificationSpec,
        direction: Direction,
    },
    /// "Remind me later" button on a basic or input box notification
    RemindLater(NotificationSpec),
    /// Reply submitted from an input box; `reply` is `None` when the host got no input results
    InputReceived {
        spec: NotificationSpec,
        receiver_name: String,
        reply: Option<String>,
    },
}

/// Side effects the host performs after an interaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlatformCommand {
    OpenUri(String),
    OpenApp,
    /// Open the app with the input reply stored under `receiver_name`
    OpenAppWithInput {
        receiver_name: String,
        reply: String,
    },
    Cancel(String),
    CancelAll,
    /// Re-post the notification with a new layout
    Redraw(NotificationSpec),
    /// Post the notification again at `at`
    Schedule {
        spec: NotificationSpec,
        at: DateTime<Utc>,
    },
}

impl PlatformCommand {
    /// Whether the command targets the notification tray rather than the app
    pub fn is_tray_command(&self) -> bool {
        matches!(
            self,
            PlatformCommand::Cancel(_) | PlatformCommand::CancelAll | PlatformCommand::Redraw(_)
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionOutcome {
    pub commands: Vec<PlatformCommand>,
    /// Click to report, if any
    pub track: Option<TrackInfo>,
}

impl InteractionOutcome {
    fn clicked(track_info: &TrackInfo) -> Self {
        Self {
            commands: Vec::new(),
            track: Some(track_info.clone()),
        }
    }

    /// Send the click tracking event, if the interaction produced one
    pub fn dispatch_tracking(&self, tracking: &TrackingDispatcher) {
        if let Some(info) = &self.track {
            tracking.track_info(TrackingKind::Click, info);
        }
    }
}

impl NotificationInteraction {
    pub fn tag(&self) -> &str {
        match self {
            NotificationInteraction::Opened(spec)
            | NotificationInteraction::ButtonClicked { spec, .. }
            | NotificationInteraction::Navigate { spec, .. }
            | NotificationInteraction::RemindLater(spec)
            | NotificationInteraction::InputReceived { spec, .. } => &spec.tag,
            NotificationInteraction::Dismissed { tag } => tag,
        }
    }

    pub fn reduce(self) -> InteractionOutcome {
        self.reduce_at(Utc::now())
    }

    /// Reduce against a fixed clock; `now` only matters for remind later
    pub fn reduce_at(self, now: DateTime<Utc>) -> InteractionOutcome {
        match self {
            NotificationInteraction::Opened(spec) => {
                let mut outcome = InteractionOutcome::clicked(&spec.track_info);
                let uri = spec
                    .click_uri
                    .clone()
                    .filter(|_| spec.click_action.carries_uri());
                outcome.commands.push(match uri {
                    Some(uri) => PlatformCommand::OpenUri(uri),
                    None => PlatformCommand::OpenApp,
                });
                if !spec.sticky {
                    outcome.commands.push(PlatformCommand::Cancel(spec.tag));
                }
                outcome
            },
            NotificationInteraction::Dismissed { tag } => InteractionOutcome {
                commands: vec![PlatformCommand::Cancel(tag)],
                track: None,
            },
            NotificationInteraction::ButtonClicked { spec, button } => reduce_button(spec, button),
            NotificationInteraction::Navigate { spec, direction } => reduce_navigation(spec, direction),
            NotificationInteraction::RemindLater(spec) => reduce_remind_later(spec, now),
            NotificationInteraction::InputReceived {
                spec,
                receiver_name,
                reply,
            } => reduce_input(spec, receiver_name, reply),
        }
    }

    /// Reduce and dispatch click tracking in one step
    pub fn handle(self, tracking: &TrackingDispatcher) -> Vec<PlatformCommand> {
        let outcome = self.reduce();
        outcome.dispatch_tracking(tracking);
        outcome.commands
    }
}

fn reduce_button(spec: NotificationSpec, button: ActionButton) -> InteractionOutcome {
    if button.action_type == ActionType::Dismiss {
        return InteractionOutcome {
            commands: vec![PlatformCommand::Cancel(spec.tag)],
            track: None,
        };
    }

    let mut outcome = InteractionOutcome::clicked(&spec.track_info);
    match (button.action_type, button.link) {
        (action, Some(link)) if action.carries_uri() => {
            outcome.commands.push(PlatformCommand::OpenUri(link));
        },
        (action, None) if action.carries_uri() => {
            tracing::debug!(label = %button.label, "Button has no link, opening the app");
            outcome.commands.push(PlatformCommand::OpenApp);
        },
        (ActionType::OpenApp, _) => outcome.commands.push(PlatformCommand::OpenApp),
        (action, _) => {
            tracing::debug!(label = %button.label, action = ?action, "Button has nothing to open");
        },
    }
    if !spec.sticky {
        outcome.commands.push(PlatformCommand::Cancel(spec.tag));
    }
    outcome
}

fn reduce_navigation(spec: NotificationSpec, direction: Direction) -> InteractionOutcome {
    if spec.tag.trim().is_empty() {
        tracing::debug!("Ignoring carousel navigation, notification tag is missing");
        return InteractionOutcome::default();
    }
    let Some(state) = spec.layout.navigation_state().cloned() else {
        tracing::debug!(tag = %spec.tag, "Ignoring navigation on a notification without a manual carousel");
        return InteractionOutcome::default();
    };

    let state = Navigate::new(direction, state).apply();
    tracing::trace!(tag = %spec.tag, center = state.center_index(), "Redrawing carousel");
    let layout = match spec.layout {
        NotificationLayout::Filmstrip { .. } => NotificationLayout::Filmstrip { state },
        _ => NotificationLayout::ManualCarousel { state },
    };
    InteractionOutcome {
        commands: vec![PlatformCommand::Redraw(spec.redraw(layout))],
        track: None,
    }
}

fn reduce_remind_later(spec: NotificationSpec, now: DateTime<Utc>) -> InteractionOutcome {
    let remind_later = match &spec.layout {
        NotificationLayout::Basic { remind_later, .. }
        | NotificationLayout::InputBox { remind_later, .. } => remind_later.clone(),
        _ => None,
    };
    let Some(remind_later) = remind_later else {
        tracing::debug!(tag = %spec.tag, "Ignoring remind later on a notification without the button");
        return InteractionOutcome::default();
    };

    let tag = if spec.tag.is_empty() {
        spec.track_info.message_id.clone()
    } else {
        spec.tag.clone()
    };
    let cancel = PlatformCommand::Cancel(tag);

    let at = match DateTime::<Utc>::from_timestamp(remind_later.timestamp, 0) {
        Some(at) if at > now => at,
        _ => {
            tracing::trace!(
                timestamp = remind_later.timestamp,
                "Remind later date is not in the future, will not reschedule the notification"
            );
            return InteractionOutcome {
                commands: vec![cancel],
                track: None,
            };
        },
    };

    tracing::trace!(seconds = (at - now).num_seconds(), "Rescheduling notification");
    InteractionOutcome {
        commands: vec![PlatformCommand::Schedule { spec, at }, cancel],
        track: None,
    }
}

fn reduce_input(spec: NotificationSpec, receiver_name: String, reply: Option<String>) -> InteractionOutcome {
    if spec.tag.trim().is_empty() {
        tracing::warn!("Input received for a notification without a tag, removing all notifications");
        return InteractionOutcome {
            commands: vec![PlatformCommand::CancelAll],
            track: None,
        };
    }

    let mut commands = Vec::with_capacity(2);
    if let Some(reply) = reply {
        tracing::trace!(tag = %spec.tag, "Input received");
        commands.push(PlatformCommand::OpenAppWithInput {
            receiver_name,
            reply,
        });
    }

    let (feedback_text, feedback_image) = match &spec.layout {
        NotificationLayout::InputBox {
            feedback_text,
            feedback_image,
            ..
        } => (feedback_text.clone(), feedback_image.clone()),
        _ => (None, None),
    };
    let layout = NotificationLayout::InputBoxFeedback {
        feedback_text,
        feedback_image,
    };
    commands.push(PlatformCommand::Redraw(spec.redraw(layout)));

    InteractionOutcome {
        commands,
        track: None,
    }
}
