// Carousel index navigation
// The navigation state travels with each interaction, so redraws need no stored state

use serde::{Deserialize, Serialize};

use super::constants::defaults;
use super::services::FetchedImage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

/// Indices of the three visible slots after a navigation step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CarouselIndices {
    pub left: usize,
    pub center: usize,
    pub right: usize,
}

/// Rotate the carousel one step
///
/// Returns `None` for fewer than three items, where left/center/right would overlap.
pub fn advance(center: usize, item_count: usize, direction: Direction) -> Option<CarouselIndices> {
    if item_count < 3 {
        return None;
    }
    let center = center % item_count;
    let prev = |i: usize| (i + item_count - 1) % item_count;
    let next = |i: usize| (i + 1) % item_count;

    let indices = match direction {
        Direction::Left => {
            let new_center = prev(center);
            CarouselIndices {
                left: prev(new_center),
                center: new_center,
                right: center,
            }
        },
        Direction::Right => {
            let new_center = next(center);
            CarouselIndices {
                left: center,
                center: new_center,
                right: next(new_center),
            }
        },
    };
    Some(indices)
}

/// Default center for a fresh carousel of `len` items
pub fn default_center(len: usize) -> usize {
    defaults::CENTER_INDEX.min(len.saturating_sub(1))
}

/// One downloaded carousel image with its caption and click target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarouselFrame {
    pub image: FetchedImage,
    pub caption: Option<String>,
    pub click_uri: Option<String>,
}

/// Everything needed to redraw a manual or filmstrip carousel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarouselNavigationState {
    frames: Vec<CarouselFrame>,
    center_index: usize,
}

impl CarouselNavigationState {
    /// Start a carousel at the default center index
    pub fn new(frames: Vec<CarouselFrame>) -> Self {
        let center_index = default_center(frames.len());
        Self {
            frames,
            center_index,
        }
    }

    /// Rebuild the state carried by a navigation interaction
    ///
    /// An out of range center is reset to the default center.
    pub fn restore(frames: Vec<CarouselFrame>, center_index: usize) -> Self {
        let center_index = if center_index < frames.len() {
            center_index
        } else {
            tracing::debug!(
                center_index,
                len = frames.len(),
                "Carousel center index out of range, resetting"
            );
            default_center(frames.len())
        };
        Self {
            frames,
            center_index,
        }
    }

    pub fn frames(&self) -> &[CarouselFrame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn center_index(&self) -> usize {
        self.center_index
    }

    pub fn center(&self) -> Option<&CarouselFrame> {
        self.frames.get(self.center_index)
    }

    /// Left/center/right slots for a filmstrip layout
    pub fn visible(&self) -> Option<(&CarouselFrame, &CarouselFrame, &CarouselFrame)> {
        let len = self.frames.len();
        if len < 3 {
            return None;
        }
        let left = (self.center_index + len - 1) % len;
        let right = (self.center_index + 1) % len;
        Some((
            &self.frames[left],
            &self.frames[self.center_index],
            &self.frames[right],
        ))
    }

    /// Apply one navigation step
    pub fn reduce(self, direction: Direction) -> Self {
        match advance(self.center_index, self.frames.len(), direction) {
            Some(indices) => Self {
                center_index: indices.center,
                frames: self.frames,
            },
            None => {
                let center_index = default_center(self.frames.len());
                Self {
                    center_index,
                    frames: self.frames,
                }
            },
        }
    }
}

/// Left/right tap on a manual or filmstrip carousel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Navigate {
    pub direction: Direction,
    pub state: CarouselNavigationState,
}

impl Navigate {
    pub fn new(direction: Direction, state: CarouselNavigationState) -> Self {
        Self { direction, state }
    }

    pub fn apply(self) -> CarouselNavigationState {
        self.state.reduce(self.direction)
    }
}
