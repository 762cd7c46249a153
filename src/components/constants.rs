// Wire-level names shared with the host event bus and the push payload format

pub const EXTENSION_NAME: &str = "com.adobe.module.campaignclassic";
pub const FRIENDLY_NAME: &str = "CampaignClassic";
pub const EXTENSION_VERSION: &str = "2.1.3";

pub const REGISTER_PARAM_DEVICE_OS_NAME: &str = "android";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const MESSAGE_RECEIVED_TAG_ID: &str = "1";
pub const MESSAGE_CLICKED_TAG_ID: &str = "2";

pub const DATASTORE_NAME: &str = "ADOBEMOBILE_CAMPAIGNCLASSIC";

/// Keys inside the `ADOBEMOBILE_CAMPAIGNCLASSIC` datastore collection
pub mod datastore_keys {
    pub const TOKEN_HASH: &str = "ADOBEMOBILE_STOREDDEFAULTS_TOKENHASH";
}

/// Keys read from the configuration shared state
pub mod config_keys {
    pub const EXTENSION_NAME: &str = "com.adobe.module.configuration";
    pub const GLOBAL_PRIVACY: &str = "global.privacy";
    pub const MARKETING_SERVER: &str = "campaignclassic.marketingServer";
    pub const TRACKING_SERVER: &str = "campaignclassic.trackingServer";
    pub const INTEGRATION_KEY: &str = "campaignclassic.android.integrationKey";
    pub const TIMEOUT: &str = "campaignclassic.timeout";
}

/// Keys of the campaign request event data
pub mod event_keys {
    pub const REGISTER_DEVICE: &str = "registerdevice";
    pub const TRACK_RECEIVE: &str = "trackreceive";
    pub const TRACK_CLICK: &str = "trackclick";
    pub const TRACK_INFO: &str = "trackinfo";
    pub const TRACK_INFO_MESSAGE_ID: &str = "_mId";
    pub const TRACK_INFO_DELIVERY_ID: &str = "_dId";
    pub const DEVICE_TOKEN: &str = "devicetoken";
    pub const USER_KEY: &str = "userkey";
    pub const ADDITIONAL_PARAMETERS: &str = "additionalparameters";
}

pub mod event_types {
    pub const CAMPAIGN: &str = "com.adobe.eventType.campaign";
    pub const CONFIGURATION: &str = "com.adobe.eventType.configuration";
}

pub mod event_sources {
    pub const REQUEST_CONTENT: &str = "com.adobe.eventSource.requestContent";
    pub const RESPONSE_CONTENT: &str = "com.adobe.eventSource.responseContent";
}

pub mod event_names {
    pub const REGISTER_DEVICE: &str = "CampaignClassic Register Device";
    pub const TRACK_RECEIVE: &str = "CampaignClassic Track Notification Receive";
    pub const TRACK_CLICK: &str = "CampaignClassic Track Notification Click";
}

pub mod http {
    pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
    pub const HEADER_CONTENT_LENGTH: &str = "Content-Length";
    pub const CONTENT_TYPE_FORM_UTF8: &str = "application/x-www-form-urlencoded;charset=UTF-8";
}

/// Keys of the flat push payload
pub mod payload_keys {
    pub const TEMPLATE_TYPE: &str = "adb_template_type";
    pub const VERSION: &str = "adb_version";
    pub const TITLE: &str = "adb_title";
    pub const BODY: &str = "adb_body";
    pub const LEGACY_BODY: &str = "_msg";
    pub const SOUND: &str = "adb_sound";
    pub const BADGE_COUNT: &str = "adb_n_count";
    pub const VISIBILITY: &str = "adb_n_visibility";
    pub const PRIORITY: &str = "adb_n_priority";
    pub const CHANNEL_ID: &str = "adb_channel_id";
    pub const ICON: &str = "adb_icon";
    pub const SMALL_ICON: &str = "adb_small_icon";
    pub const IMAGE_URL: &str = "adb_image";
    pub const TAG: &str = "adb_tag";
    pub const TICKER: &str = "adb_ticker";
    pub const STICKY: &str = "adb_sticky";
    pub const ACTION_TYPE: &str = "adb_a_type";
    pub const ACTION_URI: &str = "adb_uri";
    pub const ACTION_BUTTONS: &str = "adb_act";
    pub const EXPANDED_BODY_TEXT: &str = "adb_body_ex";
    pub const EXPANDED_BODY_TEXT_COLOR: &str = "adb_clr_body";
    pub const TITLE_TEXT_COLOR: &str = "adb_clr_title";
    pub const SMALL_ICON_COLOR: &str = "adb_clr_icon";
    pub const BACKGROUND_COLOR: &str = "adb_clr_bg";
    pub const CAROUSEL_LAYOUT: &str = "adb_car_layout";
    pub const CAROUSEL_MODE: &str = "adb_car_mode";
    pub const CAROUSEL_ITEMS: &str = "adb_items";
    pub const CAROUSEL_ITEM_IMAGE: &str = "img";
    pub const CAROUSEL_ITEM_TEXT: &str = "txt";
    pub const CAROUSEL_ITEM_URI: &str = "uri";
    pub const REMIND_LATER_TEXT: &str = "adb_rem_txt";
    pub const REMIND_LATER_TIMESTAMP: &str = "adb_rem_ts";
    pub const INPUT_FIELD_TEXT: &str = "adb_input_txt";
    pub const FEEDBACK_RECEIVED_TEXT: &str = "adb_feedback_txt";
    pub const FEEDBACK_RECEIVED_IMAGE: &str = "adb_feedback_img";
}

/// Defaults and thresholds used while building notifications
pub mod defaults {
    use std::time::Duration;

    pub const LEGACY_PAYLOAD_VERSION: u32 = 0;
    pub const DEFAULT_CHANNEL_ID: &str = "CampaignPushChannel";
    pub const DEFAULT_CHANNEL_NAME: &str = "Campaign Classic General Notifications";
    pub const SILENT_CHANNEL_ID: &str = "CampaignPushSilentChannel";
    pub const SILENT_CHANNEL_NAME: &str = "Campaign Classic Silent Notifications";
    pub const AUTO_CAROUSEL_MODE: &str = "auto";
    pub const MANUAL_CAROUSEL_MODE: &str = "manual";
    pub const FILMSTRIP_LAYOUT: &str = "filmstrip";
    pub const AUTO_CAROUSEL_MINIMUM_IMAGE_COUNT: usize = 2;
    pub const MANUAL_CAROUSEL_MINIMUM_IMAGE_COUNT: usize = 1;
    pub const FILMSTRIP_CAROUSEL_MINIMUM_IMAGE_COUNT: usize = 3;
    pub const CENTER_INDEX: usize = 1;
    pub const IMAGE_CACHE_TTL: Duration = Duration::from_secs(3 * 24 * 60 * 60);
}
