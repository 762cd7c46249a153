// Notification builder selection and construction
// Carousel builders fall back to the basic builder when too few images download

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::carousel::{CarouselFrame, CarouselNavigationState};
use super::constants::defaults;
use super::payload::TrackInfo;
use super::services::{FetchedImage, ImageFetcher};
use super::template::{
    ActionButton, ActionType, CarouselItem, CarouselLayout, CarouselMode, CarouselTemplate,
    NotificationImportance, NotificationPriority, NotificationVisibility, PushTemplate,
    RemindLater, TemplateBase, TemplateColors,
};

/// Rendering strategy for a template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Builder {
    Legacy,
    Basic,
    AutoCarousel,
    ManualCarousel,
    Filmstrip,
    InputBox,
}

impl Builder {
    /// Pure selection from template variant, carousel mode and layout
    pub fn select(template: &PushTemplate) -> Self {
        match template {
            PushTemplate::Legacy(_) => Builder::Legacy,
            PushTemplate::Basic(_) => Builder::Basic,
            PushTemplate::InputBox(_) => Builder::InputBox,
            PushTemplate::Carousel(carousel) => match (carousel.mode, carousel.layout) {
                (CarouselMode::Auto, _) => Builder::AutoCarousel,
                (CarouselMode::Manual, CarouselLayout::Filmstrip) => Builder::Filmstrip,
                (CarouselMode::Manual, CarouselLayout::Default) => Builder::ManualCarousel,
            },
        }
    }

    /// Successfully fetched images a carousel needs
    pub fn minimum_images(&self) -> Option<usize> {
        match self {
            Builder::AutoCarousel => Some(defaults::AUTO_CAROUSEL_MINIMUM_IMAGE_COUNT),
            Builder::ManualCarousel => Some(defaults::MANUAL_CAROUSEL_MINIMUM_IMAGE_COUNT),
            Builder::Filmstrip => Some(defaults::FILMSTRIP_CAROUSEL_MINIMUM_IMAGE_COUNT),
            Builder::Legacy | Builder::Basic | Builder::InputBox => None,
        }
    }

    /// Keep this builder when enough images were fetched
    pub fn check_images(self, downloaded: usize) -> Result<Builder, FallbackReason> {
        match self.minimum_images() {
            Some(required) if downloaded < required => Err(FallbackReason::InsufficientImages {
                builder: self,
                required,
                downloaded,
            }),
            _ => Ok(self),
        }
    }
}

impl std::fmt::Display for Builder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Builder::Legacy => "legacy",
            Builder::Basic => "basic",
            Builder::AutoCarousel => "auto carousel",
            Builder::ManualCarousel => "manual carousel",
            Builder::Filmstrip => "filmstrip carousel",
            Builder::InputBox => "input box",
        };
        write!(f, "{}", name)
    }
}

/// Why a carousel was rendered with the basic builder instead
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FallbackReason {
    InsufficientImages {
        builder: Builder,
        required: usize,
        downloaded: usize,
    },
}

impl std::fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FallbackReason::InsufficientImages {
                builder,
                required,
                downloaded,
            } => write!(
                f,
                "{} needs {} images but only {} downloaded",
                builder, required, downloaded
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelSpec {
    pub id: String,
    /// Display name used when the channel has to be created
    pub name: Option<String>,
    pub importance: NotificationImportance,
}

impl ChannelSpec {
    pub fn for_template(base: &TemplateBase) -> Self {
        match &base.channel_id {
            Some(id) => Self {
                id: id.clone(),
                name: None,
                importance: base.importance,
            },
            None => Self {
                id: defaults::DEFAULT_CHANNEL_ID.to_string(),
                name: Some(defaults::DEFAULT_CHANNEL_NAME.to_string()),
                importance: base.importance,
            },
        }
    }

    /// Channel used for redraws so navigation does not alert again
    pub fn silent() -> Self {
        Self {
            id: defaults::SILENT_CHANNEL_ID.to_string(),
            name: Some(defaults::SILENT_CHANNEL_NAME.to_string()),
            importance: NotificationImportance::Low,
        }
    }
}

/// Body of the notification, per builder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationLayout {
    Legacy {
        image: Option<FetchedImage>,
    },
    Basic {
        image: Option<FetchedImage>,
        remind_later: Option<RemindLater>,
    },
    AutoCarousel {
        frames: Vec<CarouselFrame>,
    },
    ManualCarousel {
        state: CarouselNavigationState,
    },
    Filmstrip {
        state: CarouselNavigationState,
    },
    InputBox {
        image: Option<FetchedImage>,
        input_hint: Option<String>,
        feedback_text: Option<String>,
        feedback_image: Option<String>,
        remind_later: Option<RemindLater>,
    },
    /// Input box after a reply was submitted; no input action is offered
    InputBoxFeedback {
        feedback_text: Option<String>,
        feedback_image: Option<String>,
    },
}

impl NotificationLayout {
    pub fn navigation_state(&self) -> Option<&CarouselNavigationState> {
        match self {
            NotificationLayout::ManualCarousel { state } | NotificationLayout::Filmstrip { state } => {
                Some(state)
            },
            _ => None,
        }
    }
}

/// Platform-neutral description of a notification, ready for the host to render
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSpec {
    pub tag: String,
    pub channel: ChannelSpec,
    pub title: String,
    pub body: String,
    pub expanded_body: Option<String>,
    pub badge_count: u32,
    pub priority: NotificationPriority,
    pub visibility: NotificationVisibility,
    pub small_icon: Option<String>,
    pub sound: Option<String>,
    pub ticker: Option<String>,
    pub sticky: bool,
    pub colors: TemplateColors,
    pub click_action: ActionType,
    pub click_uri: Option<String>,
    pub buttons: Vec<ActionButton>,
    pub layout: NotificationLayout,
    pub track_info: TrackInfo,
}

impl NotificationSpec {
    fn from_base(base: &TemplateBase, layout: NotificationLayout) -> Self {
        Self {
            tag: base.tag.clone(),
            channel: ChannelSpec::for_template(base),
            title: base.title.clone(),
            body: base.body.clone(),
            expanded_body: base.expanded_body.clone(),
            badge_count: base.badge_count,
            priority: base.priority,
            visibility: base.visibility,
            small_icon: base.icon.clone(),
            sound: base.sound.clone(),
            ticker: base.ticker.clone(),
            sticky: base.sticky,
            colors: base.colors.clone(),
            click_action: base.action_type,
            click_uri: base.action_uri.clone(),
            buttons: base.action_buttons.clone(),
            layout,
            track_info: base.track_info(),
        }
    }

    /// Same notification with a new layout, posted on the silent channel
    pub fn redraw(mut self, layout: NotificationLayout) -> Self {
        self.layout = layout;
        self.channel = ChannelSpec::silent();
        self
    }
}

/// Result of building a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutcome {
    /// Builder that produced `spec`
    pub builder: Builder,
    pub spec: NotificationSpec,
    pub fallback: Option<FallbackReason>,
}

/// Turns templates into notification descriptions, fetching images on the way
#[derive(Clone)]
pub struct NotificationBuilder {
    fetcher: Arc<dyn ImageFetcher>,
}

impl NotificationBuilder {
    pub fn new(fetcher: Arc<dyn ImageFetcher>) -> Self {
        Self { fetcher }
    }

    pub async fn build(&self, template: &PushTemplate) -> BuildOutcome {
        let builder = Builder::select(template);
        tracing::debug!(builder = %builder, tag = %template.base().tag, "Building notification");

        match template {
            PushTemplate::Legacy(base) => {
                let image = self.fetch_optional(base.image_url.as_deref()).await;
                self.finish(builder, base, NotificationLayout::Legacy { image })
            },
            PushTemplate::Basic(basic) => {
                let image = self.fetch_optional(basic.base.image_url.as_deref()).await;
                let layout = NotificationLayout::Basic {
                    image,
                    remind_later: basic.remind_later.clone(),
                };
                self.finish(builder, &basic.base, layout)
            },
            PushTemplate::InputBox(input) => {
                let image = self.fetch_optional(input.base.image_url.as_deref()).await;
                let layout = NotificationLayout::InputBox {
                    image,
                    input_hint: input.input_hint.clone(),
                    feedback_text: input.feedback_text.clone(),
                    feedback_image: input.feedback_image.clone(),
                    remind_later: input.remind_later.clone(),
                };
                self.finish(builder, &input.base, layout)
            },
            PushTemplate::Carousel(carousel) => self.build_carousel(builder, carousel).await,
        }
    }

    async fn build_carousel(&self, builder: Builder, carousel: &CarouselTemplate) -> BuildOutcome {
        let frames = self.fetch_frames(&carousel.items).await;

        match builder.check_images(frames.len()) {
            Ok(builder) => {
                let layout = match builder {
                    Builder::AutoCarousel => NotificationLayout::AutoCarousel { frames },
                    Builder::Filmstrip => NotificationLayout::Filmstrip {
                        state: CarouselNavigationState::new(frames),
                    },
                    _ => NotificationLayout::ManualCarousel {
                        state: CarouselNavigationState::new(frames),
                    },
                };
                self.finish(builder, &carousel.base, layout)
            },
            Err(reason) => {
                tracing::warn!(reason = %reason, "Falling back to basic template");
                let image = match frames.into_iter().next() {
                    Some(frame) => Some(frame.image),
                    None => self.fetch_optional(carousel.base.image_url.as_deref()).await,
                };
                let layout = NotificationLayout::Basic {
                    image,
                    remind_later: None,
                };
                let mut outcome = self.finish(Builder::Basic, &carousel.base, layout);
                outcome.fallback = Some(reason);
                outcome
            },
        }
    }

    /// Fetch every item, skipping the ones that fail
    async fn fetch_frames(&self, items: &[CarouselItem]) -> Vec<CarouselFrame> {
        let mut frames = Vec::with_capacity(items.len());
        for item in items {
            match self.fetcher.fetch(&item.image_uri).await {
                Ok(image) => frames.push(CarouselFrame {
                    image,
                    caption: item.caption_text.clone(),
                    click_uri: item.interaction_uri.clone(),
                }),
                Err(e) => {
                    tracing::warn!(url = %item.image_uri, error = %e, "Skipping carousel image");
                },
            }
        }
        tracing::trace!(requested = items.len(), downloaded = frames.len(), "Carousel images fetched");
        frames
    }

    async fn fetch_optional(&self, url: Option<&str>) -> Option<FetchedImage> {
        let url = url?;
        match self.fetcher.fetch(url).await {
            Ok(image) => Some(image),
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Failed to download notification image");
                None
            },
        }
    }

    fn finish(
        &self,
        builder: Builder,
        base: &TemplateBase,
        layout: NotificationLayout,
    ) -> BuildOutcome {
        BuildOutcome {
            builder,
            spec: NotificationSpec::from_base(base, layout),
            fallback: None,
        }
    }
}

impl std::fmt::Debug for NotificationBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationBuilder").finish_non_exhaustive()
    }
}
