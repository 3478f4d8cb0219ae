use std::time::Duration;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Forward,
    Backward,
}

/// Timing knobs for a carousel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarouselSettings {
    /// Time between automatic advances.
    pub autoplay_interval: Duration,
    /// How long autoplay stays off after a user action. `None` keeps it off.
    pub resume_after: Option<Duration>,
    /// Suspend autoplay while the pointer is over the carousel.
    pub pause_on_hover: bool,
}

impl Default for CarouselSettings {
    fn default() -> Self {
        Self {
            autoplay_interval: Duration::from_secs(5),
            resume_after: Some(Duration::from_secs(10)),
            pause_on_hover: true,
        }
    }
}

/// Observable carousel state. `index` is `None` only for an empty carousel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CarouselState {
    pub index: Option<usize>,
    pub direction: Direction,
    pub autoplay: bool,
    pub len: usize,
    /// Bumped on every `replace_items`, so observers can tell which list a
    /// state belongs to.
    #[serde(skip)]
    pub generation: u64,
}

/// Index/direction/autoplay bookkeeping for a one-item-at-a-time carousel.
///
/// Pure state: timers live in [`super::session::CarouselSession`].
#[derive(Debug, Clone)]
pub struct CarouselController {
    len: usize,
    index: usize,
    direction: Direction,
    autoplay: bool,
    hovered: bool,
    generation: u64,
    settings: CarouselSettings,
}

impl CarouselController {
    pub fn new(len: usize, settings: CarouselSettings) -> Self {
        Self {
            len,
            index: 0,
            direction: Direction::Forward,
            autoplay: len > 1,
            hovered: false,
            generation: 0,
            settings,
        }
    }

    pub fn current(&self) -> Option<usize> {
        (self.len > 0).then_some(self.index)
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn settings(&self) -> &CarouselSettings {
        &self.settings
    }

    pub fn state(&self) -> CarouselState {
        CarouselState {
            index: self.current(),
            direction: self.direction(),
            autoplay: self.autoplay,
            len: self.len,
            generation: self.generation,
        }
    }

    /// Whether the autoplay timer should currently be armed.
    pub fn autoplay_armed(&self) -> bool {
        self.autoplay && self.len > 1 && !(self.settings.pause_on_hover && self.hovered)
    }

    /// Timer tick. Advances only while autoplay is armed.
    pub fn tick(&mut self) -> bool {
        if !self.autoplay_armed() {
            return false;
        }
        self.advance();
        true
    }

    /// User "next". Returns false when there is nothing to navigate.
    pub fn next(&mut self) -> bool {
        if self.len <= 1 {
            return false;
        }
        self.pause_autoplay();
        self.advance();
        true
    }

    /// User "previous", wrapping from the first item to the last.
    pub fn previous(&mut self) -> bool {
        if self.len <= 1 {
            return false;
        }
        self.pause_autoplay();
        self.direction = Direction::Backward;
        self.index = (self.index + self.len - 1) % self.len;
        true
    }

    /// User picked a dot. Out-of-range targets are ignored.
    pub fn go_to(&mut self, target: usize) -> bool {
        if self.len <= 1 || target >= self.len {
            return false;
        }
        self.pause_autoplay();
        self.direction = if target > self.index {
            Direction::Forward
        } else {
            Direction::Backward
        };
        self.index = target;
        true
    }

    /// Turn autoplay off and report how long until it should come back.
    pub fn pause_autoplay(&mut self) -> Option<Duration> {
        self.autoplay = false;
        self.settings.resume_after
    }

    pub fn resume_autoplay(&mut self) {
        self.autoplay = self.len > 1;
    }

    pub fn set_hover(&mut self, hovered: bool) {
        self.hovered = hovered;
    }

    /// The underlying list changed. Always restarts from the first item.
    pub fn replace_items(&mut self, len: usize) {
        self.len = len;
        self.generation += 1;
        self.index = 0;
        self.direction = Direction::Forward;
        self.autoplay = len > 1;
    }

    fn advance(&mut self) {
        self.direction = Direction::Forward;
        self.index = (self.index + 1) % self.len;
    }
}
