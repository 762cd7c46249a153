//! Tests for components/template.rs and components/template_type.rs

use campaign_classic_push::components::template::{parse_action_buttons, parse_carousel_items};
use campaign_classic_push::{
    ActionType, CampaignError, CarouselLayout, CarouselMode, NotificationPriority,
    NotificationVisibility, PushPayload, PushTemplate, PushTemplateType,
};

use crate::support::basic_data;

fn payload_with(pairs: &[(&str, &str)]) -> PushPayload {
    let mut data = basic_data();
    for (k, v) in pairs {
        data.insert(k.to_string(), v.to_string());
    }
    PushPayload::new(data).unwrap()
}

#[test]
fn test_template_type_codes() {
    assert_eq!(PushTemplateType::from_code("-1"), PushTemplateType::Legacy);
    assert_eq!(PushTemplateType::from_code("0"), PushTemplateType::Basic);
    assert_eq!(PushTemplateType::from_code("1"), PushTemplateType::AutoCarousel);
    assert_eq!(PushTemplateType::from_code("2"), PushTemplateType::ManualCarousel);
    assert_eq!(PushTemplateType::from_code("3"), PushTemplateType::InputBox);
    assert_eq!(PushTemplateType::from_code("banana"), PushTemplateType::Unknown);
}

#[test]
fn test_missing_template_type_renders_as_legacy() {
    let payload = payload_with(&[]);
    assert_eq!(PushTemplateType::from_payload(&payload), PushTemplateType::Unknown);
    assert!(matches!(
        PushTemplate::from_payload(&payload).unwrap(),
        PushTemplate::Legacy(_)
    ));
}

#[test]
fn test_base_fields_resolve_defaults() {
    let template = PushTemplate::from_payload(&payload_with(&[("adb_template_type", "0")])).unwrap();
    let base = template.base();

    assert_eq!(base.title, "Title");
    assert_eq!(base.body, "Body");
    assert_eq!(base.badge_count, 0);
    assert_eq!(base.priority, NotificationPriority::Default);
    assert_eq!(base.visibility, NotificationVisibility::Private);
    assert_eq!(base.action_type, ActionType::None);
    assert!(!base.sticky);
    assert!(base.action_buttons.is_empty());
    assert_eq!(base.tag, "12345");
}

#[test]
fn test_base_fields_parse_values() {
    let template = PushTemplate::from_payload(&payload_with(&[
        ("adb_template_type", "0"),
        ("adb_n_count", "5"),
        ("adb_n_priority", "PRIORITY_HIGH"),
        ("adb_n_visibility", "PUBLIC"),
        ("adb_sticky", "true"),
        ("adb_a_type", "WEBURL"),
        ("adb_uri", "https://example.com"),
        ("adb_clr_bg", "FFAA00"),
        ("adb_clr_title", "not-a-color"),
        ("adb_icon", "icon"),
        ("adb_small_icon", "small"),
        ("adb_rem_txt", "Later"),
        ("adb_rem_ts", "1700000000"),
    ]))
    .unwrap();

    let PushTemplate::Basic(basic) = template else {
        panic!("expected a basic template");
    };
    assert_eq!(basic.base.badge_count, 5);
    assert_eq!(basic.base.priority, NotificationPriority::High);
    assert_eq!(basic.base.visibility, NotificationVisibility::Public);
    assert!(basic.base.sticky);
    assert_eq!(basic.base.action_type, ActionType::WebUrl);
    assert_eq!(basic.base.action_uri.as_deref(), Some("https://example.com"));
    assert_eq!(basic.base.colors.background.as_deref(), Some("#FFAA00"));
    assert_eq!(basic.base.colors.title_text, None);
    assert_eq!(basic.base.icon.as_deref(), Some("small"));
    let remind = basic.remind_later.unwrap();
    assert_eq!(remind.text, "Later");
    assert_eq!(remind.timestamp, 1_700_000_000);
}

#[test]
fn test_invalid_badge_count_defaults_to_zero() {
    let template = PushTemplate::from_payload(&payload_with(&[("adb_n_count", "many")])).unwrap();
    assert_eq!(template.base().badge_count, 0);
}

#[test]
fn test_action_buttons_skip_incomplete_entries() {
    let buttons = parse_action_buttons(
        r#"[
            {"label":"Open","uri":"https://example.com","type":"WEBURL"},
            {"label":"","uri":"app://x","type":"DEEPLINK"},
            {"label":"No type"},
            {"label":"Close","uri":"ignored","type":"DISMISS"},
            {"label":"App","type":"OPENAPP"}
        ]"#,
    )
    .unwrap();

    assert_eq!(buttons.len(), 3);
    assert_eq!(buttons[0].label, "Open");
    assert_eq!(buttons[0].link.as_deref(), Some("https://example.com"));
    assert_eq!(buttons[1].action_type, ActionType::Dismiss);
    assert_eq!(buttons[1].link, None);
    assert_eq!(buttons[2].action_type, ActionType::OpenApp);
}

#[test]
fn test_malformed_action_buttons_are_dropped() {
    assert!(matches!(
        parse_action_buttons("{not json"),
        Err(CampaignError::MalformedContent { .. })
    ));
    assert!(parse_action_buttons(r#"{"label":"x"}"#).is_err());

    let template = PushTemplate::from_payload(&payload_with(&[("adb_act", "[1, 2]")])).unwrap();
    assert!(template.base().action_buttons.is_empty());
}

#[test]
fn test_carousel_items_stop_at_first_missing_image() {
    let items = parse_carousel_items(
        r#"[
            {"img":"https://example.com/1.png","txt":"one","uri":"https://example.com/1"},
            {"img":"https://example.com/2.png"},
            {"txt":"no image"},
            {"img":"https://example.com/4.png"}
        ]"#,
    )
    .unwrap();

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].caption_text.as_deref(), Some("one"));
    assert_eq!(items[0].interaction_uri.as_deref(), Some("https://example.com/1"));
    assert_eq!(items[1].caption_text, None);
}

#[test]
fn test_carousel_mode_and_layout() {
    let items = r#"[{"img":"https://example.com/1.png"}]"#;

    let auto = PushTemplate::from_payload(&payload_with(&[
        ("adb_template_type", "1"),
        ("adb_items", items),
    ]))
    .unwrap();
    let PushTemplate::Carousel(auto) = auto else {
        panic!("expected a carousel");
    };
    assert_eq!(auto.mode, CarouselMode::Auto);
    assert_eq!(auto.layout, CarouselLayout::Default);

    let filmstrip = PushTemplate::from_payload(&payload_with(&[
        ("adb_template_type", "2"),
        ("adb_car_layout", "filmstrip"),
        ("adb_items", items),
    ]))
    .unwrap();
    let PushTemplate::Carousel(filmstrip) = filmstrip else {
        panic!("expected a carousel");
    };
    assert_eq!(filmstrip.mode, CarouselMode::Manual);
    assert_eq!(filmstrip.layout, CarouselLayout::Filmstrip);

    let explicit_mode = PushTemplate::from_payload(&payload_with(&[
        ("adb_template_type", "2"),
        ("adb_car_mode", "auto"),
    ]))
    .unwrap();
    let PushTemplate::Carousel(explicit_mode) = explicit_mode else {
        panic!("expected a carousel");
    };
    assert_eq!(explicit_mode.mode, CarouselMode::Auto);
    assert!(explicit_mode.items.is_empty());
}

#[test]
fn test_input_box_fields() {
    let template = PushTemplate::from_payload(&payload_with(&[
        ("adb_template_type", "3"),
        ("adb_input_txt", "Type here"),
        ("adb_feedback_txt", "Thanks"),
    ]))
    .unwrap();
    let PushTemplate::InputBox(input) = template else {
        panic!("expected an input box");
    };
    assert_eq!(input.input_hint.as_deref(), Some("Type here"));
    assert_eq!(input.feedback_text.as_deref(), Some("Thanks"));
    assert_eq!(input.feedback_image, None);
}

#[test]
fn test_remind_later_needs_positive_timestamp() {
    let remind_later = |pairs: &[(&str, &str)]| {
        let mut all = vec![("adb_template_type", "0"), ("adb_rem_txt", "Later")];
        all.extend_from_slice(pairs);
        let PushTemplate::Basic(basic) = PushTemplate::from_payload(&payload_with(&all)).unwrap() else {
            panic!("expected a basic template");
        };
        basic.remind_later
    };

    assert_eq!(remind_later(&[]), None);
    assert_eq!(remind_later(&[("adb_rem_ts", "0")]), None);
    assert_eq!(remind_later(&[("adb_rem_ts", "-5")]), None);
    assert_eq!(remind_later(&[("adb_rem_ts", "soon")]), None);
    assert_eq!(remind_later(&[("adb_rem_ts", "1700000000")]).map(|r| r.timestamp), Some(1_700_000_000));

    let no_text = payload_with(&[("adb_template_type", "0"), ("adb_rem_ts", "1700000000")]);
    let PushTemplate::Basic(basic) = PushTemplate::from_payload(&no_text).unwrap() else {
        panic!("expected a basic template");
    };
    assert_eq!(basic.remind_later, None);
}
