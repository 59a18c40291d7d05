//! Carousel / slider state machine and rendering.
//!
//! # Responsibility
//! - Own the current slide index and its boundary policy.
//! - Render index changes onto track, slides, dots and prev/next buttons.
//! - Translate swipe gestures, arrow keys and autoplay ticks into moves.
//!
//! # Invariants
//! - `current` is always in `[0, len)` and `len >= 1`.
//! - `len == ceil(items / per_view)`; `current` is a page index.
//! - `go_to(i)` with `i >= len` is a no-op.
//! - With `Wrap`, `next()` applied `len` times returns to the start index.
//! - With `Clamp`, prev/next are disabled at the respective ends.

use crate::dom::{aria_bool, UiElement};
use crate::input::Key;
use log::{debug, trace};
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const DEFAULT_SWIPE_THRESHOLD_PX: f64 = 50.0;

/// What happens when navigation runs past either end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPolicy {
    #[default]
    Wrap,
    Clamp,
}

impl BoundaryPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Wrap => "wrap",
            Self::Clamp => "clamp",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CarouselError {
    NoSlides,
    InvalidPerView(usize),
}

impl Display for CarouselError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoSlides => write!(f, "carousel needs at least one slide"),
            Self::InvalidPerView(value) => {
                write!(f, "carousel items per view must be >= 1, got {value}")
            }
        }
    }
}

impl Error for CarouselError {}

/// Navigation request from any input source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarouselMove {
    Next,
    Previous,
    GoTo(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Carousel {
    len: usize,
    current: usize,
    per_view: usize,
    policy: BoundaryPolicy,
}

impl Carousel {
    pub fn new(len: usize, policy: BoundaryPolicy) -> Result<Self, CarouselError> {
        if len == 0 {
            return Err(CarouselError::NoSlides);
        }
        Ok(Self {
            len,
            current: 0,
            per_view: 1,
            policy,
        })
    }

    /// Builds a carousel that pages through `items` showing `per_view` at once.
    pub fn paged(
        items: usize,
        per_view: usize,
        policy: BoundaryPolicy,
    ) -> Result<Self, CarouselError> {
        if per_view == 0 {
            return Err(CarouselError::InvalidPerView(per_view));
        }
        let mut carousel = Self::new(items.div_ceil(per_view), policy)?;
        carousel.per_view = per_view;
        Ok(carousel)
    }

    /// Re-pages the same items, keeping the first visible item on screen.
    /// Returns whether the page count or position changed.
    pub fn set_per_view(
        &mut self,
        items: usize,
        per_view: usize,
    ) -> Result<bool, CarouselError> {
        if per_view == 0 {
            return Err(CarouselError::InvalidPerView(per_view));
        }
        if items == 0 {
            return Err(CarouselError::NoSlides);
        }
        if per_view == self.per_view && items.div_ceil(per_view) == self.len {
            return Ok(false);
        }
        let first_visible = self.current * self.per_view;
        let len = items.div_ceil(per_view);
        let current = (first_visible / per_view).min(len - 1);
        let changed = len != self.len || current != self.current;
        debug!(
            "event=carousel_repage module=carousel status=ok per_view={}->{} pages={}",
            self.per_view, per_view, len
        );
        self.len = len;
        self.current = current;
        self.per_view = per_view;
        Ok(changed)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn current(&self) -> usize {
        self.current
    }

    /// Items shown on one page.
    pub fn per_view(&self) -> usize {
        self.per_view
    }

    /// Whether item `index` sits on the current page.
    pub fn is_on_current_page(&self, index: usize) -> bool {
        index / self.per_view == self.current
    }

    pub fn policy(&self) -> BoundaryPolicy {
        self.policy
    }

    /// Returns whether the index changed.
    pub fn next(&mut self) -> bool {
        let target = match self.policy {
            BoundaryPolicy::Wrap => (self.current + 1) % self.len,
            BoundaryPolicy::Clamp => (self.current + 1).min(self.len - 1),
        };
        self.set(target)
    }

    /// Returns whether the index changed.
    pub fn previous(&mut self) -> bool {
        let target = match self.policy {
            BoundaryPolicy::Wrap => (self.current + self.len - 1) % self.len,
            BoundaryPolicy::Clamp => self.current.saturating_sub(1),
        };
        self.set(target)
    }

    /// Jumps to `index`; out-of-range indices are ignored.
    pub fn go_to(&mut self, index: usize) -> bool {
        if index >= self.len {
            return false;
        }
        self.set(index)
    }

    pub fn apply(&mut self, movement: CarouselMove) -> bool {
        match movement {
            CarouselMove::Next => self.next(),
            CarouselMove::Previous => self.previous(),
            CarouselMove::GoTo(index) => self.go_to(index),
        }
    }

    pub fn can_go_previous(&self) -> bool {
        match self.policy {
            BoundaryPolicy::Wrap => self.len > 1,
            BoundaryPolicy::Clamp => self.current > 0,
        }
    }

    pub fn can_go_next(&self) -> bool {
        match self.policy {
            BoundaryPolicy::Wrap => self.len > 1,
            BoundaryPolicy::Clamp => self.current + 1 < self.len,
        }
    }

    /// Track translation for the current page, in percent.
    pub fn offset_percent(&self) -> f64 {
        0.0 - self.current as f64 * 100.0
    }

    fn set(&mut self, index: usize) -> bool {
        if index == self.current {
            return false;
        }
        trace!(
            "event=carousel_move module=carousel status=ok from={} to={}",
            self.current,
            index
        );
        self.current = index;
        true
    }
}

/// Maps arrow keys onto carousel moves.
pub fn move_for_key(key: Key) -> Option<CarouselMove> {
    match key {
        Key::ArrowLeft => Some(CarouselMove::Previous),
        Key::ArrowRight => Some(CarouselMove::Next),
        _ => None,
    }
}

/// Responsive items-per-view: the first `(min_width, per_view)` pair whose
/// `min_width <= width`, scanning widest first; `fallback` otherwise.
pub fn items_per_view_for_width(width: f64, breakpoints: &[(f64, usize)], fallback: usize) -> usize {
    let mut sorted = breakpoints.to_vec();
    sorted.sort_by(|a, b| b.0.total_cmp(&a.0));
    sorted
        .into_iter()
        .find(|(min_width, _)| width >= *min_width)
        .map_or(fallback, |(_, per_view)| per_view)
        .max(1)
}

/// Horizontal swipe detector.
#[derive(Debug, Clone)]
pub struct SwipeTracker {
    threshold_px: f64,
    start_x: Option<f64>,
}

impl SwipeTracker {
    pub fn new(threshold_px: f64) -> Self {
        Self {
            threshold_px,
            start_x: None,
        }
    }

    pub fn begin(&mut self, x: f64) {
        self.start_x = Some(x);
    }

    /// Finishes a gesture. A leftward drag (content moves left) goes forward.
    pub fn end(&mut self, x: f64) -> Option<CarouselMove> {
        let start = self.start_x.take()?;
        let delta = start - x;
        if delta > self.threshold_px {
            Some(CarouselMove::Next)
        } else if delta < -self.threshold_px {
            Some(CarouselMove::Previous)
        } else {
            None
        }
    }
}

impl Default for SwipeTracker {
    fn default() -> Self {
        Self::new(DEFAULT_SWIPE_THRESHOLD_PX)
    }
}

/// Autoplay pause bookkeeping; the host owns the actual timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Autoplay {
    interval_ms: u32,
    paused: bool,
}

impl Autoplay {
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms,
            paused: false,
        }
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Advances on a timer tick unless paused; returns whether it moved.
    pub fn tick(&self, carousel: &mut Carousel) -> bool {
        if self.paused {
            return false;
        }
        carousel.next()
    }
}

/// Element bindings for one carousel instance.
pub struct CarouselView<E: UiElement> {
    pub track: E,
    pub slides: Vec<E>,
    pub dots: Vec<E>,
    pub prev: Option<E>,
    pub next: Option<E>,
    pub active_class: String,
}

impl<E: UiElement> CarouselView<E> {
    pub fn new(track: E, slides: Vec<E>) -> Self {
        Self {
            track,
            slides,
            dots: Vec::new(),
            prev: None,
            next: None,
            active_class: "active".to_string(),
        }
    }

    pub fn render(&self, carousel: &Carousel) {
        let current = carousel.current();
        self.track.set_style(
            "transform",
            &format!("translateX({}%)", carousel.offset_percent()),
        );

        // Every slide on the current page counts as active.
        for (index, slide) in self.slides.iter().enumerate() {
            let active = carousel.is_on_current_page(index);
            slide.set_class(&self.active_class, active);
            slide.set_attribute("aria-hidden", aria_bool(!active));
        }

        for (index, dot) in self.dots.iter().enumerate() {
            let active = index == current;
            dot.set_class(&self.active_class, active);
            if active {
                dot.set_attribute("aria-current", "true");
            } else {
                dot.remove_attribute("aria-current");
            }
        }

        if let Some(prev) = &self.prev {
            prev.set_flag("disabled", !carousel.can_go_previous());
        }
        if let Some(next) = &self.next {
            next.set_flag("disabled", !carousel.can_go_next());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        items_per_view_for_width, move_for_key, BoundaryPolicy, Carousel, CarouselError,
        CarouselMove,
    };
    use crate::input::Key;

    #[test]
    fn rejects_empty_carousel() {
        assert_eq!(
            Carousel::new(0, BoundaryPolicy::Wrap).expect_err("zero slides must fail"),
            CarouselError::NoSlides
        );
    }

    #[test]
    fn paged_rounds_page_count_up() {
        let carousel = Carousel::paged(7, 3, BoundaryPolicy::Wrap).expect("paged carousel");
        assert_eq!(carousel.len(), 3);
        assert!(matches!(
            Carousel::paged(7, 0, BoundaryPolicy::Wrap),
            Err(CarouselError::InvalidPerView(0))
        ));
    }

    #[test]
    fn repaging_keeps_first_visible_item() {
        let mut carousel = Carousel::paged(12, 2, BoundaryPolicy::Wrap).expect("paged carousel");
        assert!(carousel.go_to(3));

        assert_eq!(carousel.set_per_view(12, 4), Ok(true));
        assert_eq!((carousel.len(), carousel.current()), (3, 1));
        assert_eq!(carousel.set_per_view(12, 4), Ok(false));

        assert_eq!(carousel.set_per_view(12, 1), Ok(true));
        assert_eq!((carousel.len(), carousel.current()), (12, 4));
        assert_eq!(
            carousel.set_per_view(12, 0),
            Err(CarouselError::InvalidPerView(0))
        );
    }

    #[test]
    fn single_slide_wrap_cannot_move() {
        let mut carousel = Carousel::new(1, BoundaryPolicy::Wrap).expect("carousel");
        assert!(!carousel.next());
        assert!(!carousel.can_go_next());
        assert!(!carousel.can_go_previous());
    }

    #[test]
    fn arrow_keys_map_to_moves() {
        assert_eq!(move_for_key(Key::ArrowLeft), Some(CarouselMove::Previous));
        assert_eq!(move_for_key(Key::ArrowRight), Some(CarouselMove::Next));
        assert_eq!(move_for_key(Key::Escape), None);
    }

    #[test]
    fn items_per_view_picks_widest_matching_breakpoint() {
        let breakpoints = [(640.0, 2), (1024.0, 4)];
        assert_eq!(items_per_view_for_width(1200.0, &breakpoints, 1), 4);
        assert_eq!(items_per_view_for_width(800.0, &breakpoints, 1), 2);
        assert_eq!(items_per_view_for_width(320.0, &breakpoints, 1), 1);
    }
}
