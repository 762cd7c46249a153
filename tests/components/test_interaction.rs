//! Tests for components/interaction.rs

use chrono::{DateTime, Utc};

use campaign_classic_push::{
    ActionButton, ActionType, Direction, NotificationBuilder, NotificationInteraction,
    NotificationLayout, NotificationSpec, PlatformCommand, PushMessageHandler, PushPayload,
    PushTemplate, TrackInfo, TrackingDispatcher,
};

use crate::support::{Harness, basic_data};

async fn build_spec(harness: &Harness, extra: &[(&str, &str)]) -> NotificationSpec {
    let mut data = basic_data();
    for (k, v) in extra {
        data.insert(k.to_string(), v.to_string());
    }
    let template = PushTemplate::from_payload(&PushPayload::new(data).unwrap()).unwrap();
    NotificationBuilder::new(harness.image_fetcher())
        .build(&template)
        .await
        .spec
}

const FILMSTRIP: &[(&str, &str)] = &[
    ("adb_template_type", "2"),
    ("adb_car_layout", "filmstrip"),
    (
        "adb_items",
        r#"[{"img":"https://example.com/1.png"},{"img":"https://example.com/2.png"},{"img":"https://example.com/3.png"}]"#,
    ),
];

#[tokio::test]
async fn test_open_tracks_click_and_opens_uri() {
    let harness = Harness::new();
    let spec = build_spec(&harness, &[("adb_a_type", "WEBURL"), ("adb_uri", "https://example.com")]).await;
    let tracking = TrackingDispatcher::new(harness.event_dispatcher());

    let commands = NotificationInteraction::Opened(spec).handle(&tracking);

    assert_eq!(
        commands,
        vec![
            PlatformCommand::OpenUri("https://example.com".to_string()),
            PlatformCommand::Cancel("12345".to_string()),
        ]
    );
    let events = harness.dispatcher.events();
    assert_eq!(events.len(), 1);
    assert!(events[0].is_track_click_event());
    assert_eq!(events[0].message_id(), Some("12345"));
}

#[tokio::test]
async fn test_open_without_uri_opens_app_and_keeps_sticky() {
    let harness = Harness::new();
    let spec = build_spec(&harness, &[("adb_sticky", "true")]).await;

    let outcome = NotificationInteraction::Opened(spec).reduce();

    assert_eq!(outcome.commands, vec![PlatformCommand::OpenApp]);
    assert_eq!(outcome.track, Some(TrackInfo::new("12345", "67890")));
}

#[tokio::test]
async fn test_button_actions() {
    let harness = Harness::new();
    let spec = build_spec(&harness, &[]).await;

    let deeplink = NotificationInteraction::ButtonClicked {
        spec: spec.clone(),
        button: ActionButton::new("Go", Some("app://offer".to_string()), ActionType::Deeplink),
    }
    .reduce();
    assert_eq!(deeplink.commands[0], PlatformCommand::OpenUri("app://offer".to_string()));
    assert!(deeplink.track.is_some());

    let open_app = NotificationInteraction::ButtonClicked {
        spec: spec.clone(),
        button: ActionButton::new("App", None, ActionType::OpenApp),
    }
    .reduce();
    assert_eq!(open_app.commands[0], PlatformCommand::OpenApp);

    let dismiss = NotificationInteraction::ButtonClicked {
        spec,
        button: ActionButton::new("Close", None, ActionType::Dismiss),
    }
    .reduce();
    assert_eq!(dismiss.commands, vec![PlatformCommand::Cancel("12345".to_string())]);
    assert_eq!(dismiss.track, None);
}

#[test]
fn test_dismissed_cancels_without_tracking() {
    let outcome = NotificationInteraction::Dismissed {
        tag: "tag".to_string(),
    }
    .reduce();
    assert_eq!(outcome.commands, vec![PlatformCommand::Cancel("tag".to_string())]);
    assert_eq!(outcome.track, None);
}

#[tokio::test]
async fn test_navigation_redraws_on_silent_channel() {
    let harness = Harness::new();
    let spec = build_spec(&harness, FILMSTRIP).await;

    let outcome = NotificationInteraction::Navigate {
        spec,
        direction: Direction::Right,
    }
    .reduce();

    assert_eq!(outcome.track, None);
    let [PlatformCommand::Redraw(redrawn)] = outcome.commands.as_slice() else {
        panic!("expected a single redraw");
    };
    assert_eq!(redrawn.channel.id, "CampaignPushSilentChannel");
    let NotificationLayout::Filmstrip { state } = &redrawn.layout else {
        panic!("expected a filmstrip layout");
    };
    assert_eq!(state.center_index(), 2);
}

#[tokio::test]
async fn test_navigation_without_tag_is_ignored() {
    let harness = Harness::new();
    let mut spec = build_spec(&harness, FILMSTRIP).await;
    spec.tag = String::new();

    let outcome = NotificationInteraction::Navigate {
        spec,
        direction: Direction::Left,
    }
    .reduce();

    assert!(outcome.commands.is_empty());
}

#[tokio::test]
async fn test_open_ignores_uri_for_non_link_action() {
    let harness = Harness::new();
    let spec = build_spec(&harness, &[("adb_a_type", "OPENAPP"), ("adb_uri", "https://example.com/x")]).await;
    let commands = NotificationInteraction::Opened(spec).reduce().commands;
    assert_eq!(
        commands,
        vec![PlatformCommand::OpenApp, PlatformCommand::Cancel("12345".to_string())]
    );

    let spec = build_spec(&harness, &[("adb_uri", "https://example.com/x")]).await;
    assert_eq!(NotificationInteraction::Opened(spec).reduce().commands[0], PlatformCommand::OpenApp);

    let spec = build_spec(&harness, &[("adb_a_type", "DEEPLINK"), ("adb_uri", "app://home")]).await;
    assert_eq!(
        NotificationInteraction::Opened(spec).reduce().commands[0],
        PlatformCommand::OpenUri("app://home".to_string())
    );
}

#[tokio::test]
async fn test_link_button_without_link_opens_app() {
    let harness = Harness::new();
    let spec = build_spec(&harness, &[]).await;

    for action in [ActionType::WebUrl, ActionType::Deeplink] {
        let outcome = NotificationInteraction::ButtonClicked {
            spec: spec.clone(),
            button: ActionButton::new("Go", None, action),
        }
        .reduce();
        assert_eq!(
            outcome.commands,
            vec![PlatformCommand::OpenApp, PlatformCommand::Cancel("12345".to_string())]
        );
        assert!(outcome.track.is_some());
    }
}

const REMIND_LATER: &[(&str, &str)] = &[
    ("adb_template_type", "0"),
    ("adb_rem_txt", "Later"),
    ("adb_rem_ts", "1700000000"),
];

fn at(seconds: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(seconds, 0).unwrap()
}

#[tokio::test]
async fn test_remind_later_schedules_future_notification() {
    let harness = Harness::new();
    let spec = build_spec(&harness, REMIND_LATER).await;

    let outcome = NotificationInteraction::RemindLater(spec.clone()).reduce_at(at(1_699_999_000));

    assert_eq!(outcome.track, None);
    assert_eq!(
        outcome.commands,
        vec![
            PlatformCommand::Schedule {
                spec,
                at: at(1_700_000_000),
            },
            PlatformCommand::Cancel("12345".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_remind_later_in_the_past_only_cancels() {
    let harness = Harness::new();
    let spec = build_spec(&harness, REMIND_LATER).await;

    for now in [at(1_700_000_000), at(1_800_000_000)] {
        let outcome = NotificationInteraction::RemindLater(spec.clone()).reduce_at(now);
        assert_eq!(outcome.commands, vec![PlatformCommand::Cancel("12345".to_string())]);
    }
}

#[tokio::test]
async fn test_remind_later_without_button_is_ignored() {
    let harness = Harness::new();
    let spec = build_spec(&harness, &[("adb_template_type", "0"), ("adb_rem_txt", "Later")]).await;

    let outcome = NotificationInteraction::RemindLater(spec).reduce_at(at(0));

    assert!(outcome.commands.is_empty());
}

const INPUT_BOX: &[(&str, &str)] = &[
    ("adb_template_type", "3"),
    ("adb_input_txt", "Type here"),
    ("adb_feedback_txt", "Thanks for the reply"),
    ("adb_feedback_img", "https://example.com/thanks.png"),
];

#[tokio::test]
async fn test_input_reply_opens_app_and_shows_feedback() {
    let harness = Harness::new();
    let spec = build_spec(&harness, INPUT_BOX).await;

    let outcome = NotificationInteraction::InputReceived {
        spec,
        receiver_name: "feedback".to_string(),
        reply: Some("Great app".to_string()),
    }
    .reduce();

    assert_eq!(outcome.track, None);
    let [PlatformCommand::OpenAppWithInput { receiver_name, reply }, PlatformCommand::Redraw(redrawn)] =
        outcome.commands.as_slice()
    else {
        panic!("expected an app launch followed by a redraw");
    };
    assert_eq!(receiver_name, "feedback");
    assert_eq!(reply, "Great app");
    assert_eq!(redrawn.tag, "12345");
    assert_eq!(
        redrawn.layout,
        NotificationLayout::InputBoxFeedback {
            feedback_text: Some("Thanks for the reply".to_string()),
            feedback_image: Some("https://example.com/thanks.png".to_string()),
        }
    );
}

#[tokio::test]
async fn test_input_without_results_still_redraws() {
    let harness = Harness::new();
    let spec = build_spec(&harness, INPUT_BOX).await;

    let outcome = NotificationInteraction::InputReceived {
        spec,
        receiver_name: "feedback".to_string(),
        reply: None,
    }
    .reduce();

    assert!(matches!(outcome.commands.as_slice(), [PlatformCommand::Redraw(_)]));
}

#[tokio::test]
async fn test_input_without_tag_cancels_everything() {
    let harness = Harness::new();
    let mut spec = build_spec(&harness, INPUT_BOX).await;
    spec.tag = String::new();

    let outcome = NotificationInteraction::InputReceived {
        spec,
        receiver_name: "feedback".to_string(),
        reply: Some("hi".to_string()),
    }
    .reduce();

    assert_eq!(outcome.commands, vec![PlatformCommand::CancelAll]);
}

#[tokio::test]
async fn test_handler_routes_tray_commands_to_presenter() {
    let harness = Harness::new();
    let handler = PushMessageHandler::new(
        harness.image_fetcher(),
        harness.notification_presenter(),
        harness.event_dispatcher(),
    );
    let spec = build_spec(&harness, &[("adb_a_type", "WEBURL"), ("adb_uri", "https://example.com")]).await;

    let host = handler.handle_interaction(NotificationInteraction::Opened(spec));
    assert_eq!(host, vec![PlatformCommand::OpenUri("https://example.com".to_string())]);
    assert_eq!(harness.presenter.cancelled(), vec!["12345".to_string()]);
    assert!(harness.dispatcher.events()[0].is_track_click_event());

    let filmstrip = build_spec(&harness, FILMSTRIP).await;
    let host = handler.handle_interaction(NotificationInteraction::Navigate {
        spec: filmstrip,
        direction: Direction::Left,
    });
    assert!(host.is_empty());
    assert_eq!(harness.presenter.shown().len(), 1);

    let mut untagged = build_spec(&harness, INPUT_BOX).await;
    untagged.tag = String::new();
    handler.handle_interaction(NotificationInteraction::InputReceived {
        spec: untagged,
        receiver_name: "feedback".to_string(),
        reply: None,
    });
    assert_eq!(harness.presenter.cleared(), 1);
}
