//! One-shot reveal-on-scroll animator and count-up counters.
//!
//! # Responsibility
//! - Track which registered targets are still waiting for first visibility.
//! - Decide, per intersection batch, which targets reveal and with what delay.
//!
//! # Invariants
//! - A target transitions from pending to revealed at most once.
//! - Revealed targets are deregistered; later samples for them are ignored,
//!   including "no longer intersecting" ones, so nothing is ever re-hidden.
//! - Stagger delays are assigned in batch order, starting at zero.
//! - A target too tall to ever reach `threshold` reveals once it covers half
//!   of the ratio it can reach.

use crate::dom::UiElement;
use log::trace;
use std::collections::BTreeSet;

pub const DEFAULT_THRESHOLD: f64 = 0.1;
pub const DEFAULT_MARGIN_PX: f64 = 50.0;
pub const DEFAULT_STAGGER_MS: u32 = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct RevealOptions {
    /// Fraction of the target that must be visible.
    pub threshold: f64,
    /// How far the trigger line is pulled up from the viewport bottom.
    pub margin_px: f64,
    /// Per-index delay inside one batch; `0` reveals simultaneously.
    pub stagger_ms: u32,
    pub visible_class: String,
}

impl RevealOptions {
    /// Root margin string for the host intersection observer.
    pub fn root_margin(&self) -> String {
        format!("0px 0px {}px 0px", -self.margin_px)
    }

    /// Observer thresholds: ten even steps up to `threshold`, so targets
    /// that top out below it still get notified while scrolling.
    pub fn observer_thresholds(&self) -> Vec<f64> {
        if self.threshold <= 0.0 {
            return vec![0.0];
        }
        (1..=10)
            .map(|step| self.threshold * f64::from(step) / 10.0)
            .collect()
    }

    /// Threshold for one target, lowered for targets taller than the root.
    pub fn effective_threshold(&self, max_ratio: f64) -> f64 {
        self.threshold.min(max_ratio / 2.0)
    }
}

/// Largest intersection ratio a target of `target_height` can reach inside a
/// root of `root_height`.
pub fn max_ratio(target_height: f64, root_height: f64) -> f64 {
    if target_height <= 0.0 || root_height <= 0.0 {
        return 1.0;
    }
    (root_height / target_height).min(1.0)
}

impl Default for RevealOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            margin_px: DEFAULT_MARGIN_PX,
            stagger_ms: DEFAULT_STAGGER_MS,
            visible_class: "visible".to_string(),
        }
    }
}

/// One intersection notification for a registered target.
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionSample<K> {
    pub key: K,
    pub ratio: f64,
    pub is_intersecting: bool,
    /// See [`max_ratio`]; `1.0` for targets that fit the root.
    pub max_ratio: f64,
}

impl<K> IntersectionSample<K> {
    pub fn new(key: K, ratio: f64, is_intersecting: bool) -> Self {
        Self {
            key,
            ratio,
            is_intersecting,
            max_ratio: 1.0,
        }
    }

    pub fn with_max_ratio(mut self, max_ratio: f64) -> Self {
        self.max_ratio = max_ratio;
        self
    }
}

/// Reveal decision for one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reveal<K> {
    pub key: K,
    pub delay_ms: u32,
}

#[derive(Debug, Clone)]
pub struct RevealAnimator<K: Ord + Clone> {
    options: RevealOptions,
    pending: BTreeSet<K>,
    revealed: BTreeSet<K>,
}

impl<K: Ord + Clone> RevealAnimator<K> {
    pub fn new(options: RevealOptions) -> Self {
        Self {
            options,
            pending: BTreeSet::new(),
            revealed: BTreeSet::new(),
        }
    }

    pub fn options(&self) -> &RevealOptions {
        &self.options
    }

    /// Registers a target; returns `false` when it is already tracked.
    pub fn register(&mut self, key: K) -> bool {
        if self.revealed.contains(&key) {
            return false;
        }
        self.pending.insert(key)
    }

    /// Processes one batch of notifications.
    pub fn observe(&mut self, batch: &[IntersectionSample<K>]) -> Vec<Reveal<K>> {
        let mut reveals = Vec::new();
        for sample in batch {
            if !self.crosses_threshold(sample) || !self.pending.remove(&sample.key) {
                continue;
            }
            let delay_ms = self.options.stagger_ms.saturating_mul(reveals.len() as u32);
            self.revealed.insert(sample.key.clone());
            reveals.push(Reveal {
                key: sample.key.clone(),
                delay_ms,
            });
        }
        if !reveals.is_empty() {
            trace!(
                "event=reveal_batch module=reveal status=ok revealed={} pending={}",
                reveals.len(),
                self.pending.len()
            );
        }
        reveals
    }

    pub fn is_revealed(&self, key: &K) -> bool {
        self.revealed.contains(key)
    }

    /// True once every registered target revealed; the host may disconnect.
    pub fn is_done(&self) -> bool {
        self.pending.is_empty()
    }

    fn crosses_threshold(&self, sample: &IntersectionSample<K>) -> bool {
        sample.is_intersecting
            && sample.ratio >= self.options.effective_threshold(sample.max_ratio)
    }
}

/// Applies the terminal visual state for one reveal.
pub fn apply_reveal<K>(element: &impl UiElement, reveal: &Reveal<K>, class: &str) {
    if reveal.delay_ms > 0 {
        element.set_style("transition-delay", &format!("{}ms", reveal.delay_ms));
    }
    element.set_class(class, true);
}

pub const DEFAULT_COUNTER_DURATION_MS: f64 = 2000.0;

/// Linear count-up from zero to a target value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CounterAnimation {
    target: f64,
    duration_ms: f64,
}

impl CounterAnimation {
    pub fn new(target: f64, duration_ms: f64) -> Self {
        Self {
            target,
            duration_ms: duration_ms.max(0.0),
        }
    }

    /// Parses a `data-target` attribute value; separators like `,` are dropped.
    pub fn parse_target(raw: &str) -> Option<f64> {
        let cleaned: String = raw
            .trim()
            .chars()
            .filter(|ch| ch.is_ascii_digit() || *ch == '.' || *ch == '-')
            .collect();
        cleaned.parse::<f64>().ok().filter(|value| value.is_finite())
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    /// Progress in `[0, 1]` after `elapsed_ms`.
    pub fn progress(&self, elapsed_ms: f64) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        (elapsed_ms / self.duration_ms).clamp(0.0, 1.0)
    }

    /// Displayed value; intermediate frames are floored, the last is exact.
    pub fn value_at(&self, elapsed_ms: f64) -> f64 {
        let progress = self.progress(elapsed_ms);
        if progress >= 1.0 {
            return self.target;
        }
        (self.target * progress).floor()
    }

    pub fn is_finished(&self, elapsed_ms: f64) -> bool {
        self.progress(elapsed_ms) >= 1.0
    }

    /// Text for one frame, without a trailing `.0` for whole numbers.
    pub fn text_at(&self, elapsed_ms: f64) -> String {
        let value = self.value_at(elapsed_ms);
        if value.fract() == 0.0 {
            format!("{}", value as i64)
        } else {
            format!("{value}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CounterAnimation, RevealOptions};

    #[test]
    fn root_margin_pulls_trigger_line_up() {
        assert_eq!(RevealOptions::default().root_margin(), "0px 0px -50px 0px");
    }

    #[test]
    fn counter_floors_intermediate_frames_and_lands_exactly() {
        let counter = CounterAnimation::new(250.0, 2000.0);
        assert_eq!(counter.value_at(0.0), 0.0);
        assert_eq!(counter.value_at(1000.0), 125.0);
        assert_eq!(counter.value_at(1001.0), 125.0);
        assert_eq!(counter.text_at(5000.0), "250");
        assert!(counter.is_finished(2000.0));
    }

    #[test]
    fn counter_keeps_fractional_targets_on_last_frame() {
        let counter = CounterAnimation::new(4.8, 1500.0);
        assert_eq!(counter.text_at(1500.0), "4.8");
        assert_eq!(counter.text_at(750.0), "2");
    }

    #[test]
    fn zero_duration_finishes_immediately() {
        let counter = CounterAnimation::new(10.0, 0.0);
        assert_eq!(counter.value_at(0.0), 10.0);
    }

    #[test]
    fn parse_target_drops_separators() {
        assert_eq!(CounterAnimation::parse_target("12,500"), Some(12500.0));
        assert_eq!(CounterAnimation::parse_target("4.9"), Some(4.9));
        assert_eq!(CounterAnimation::parse_target("n/a"), None);
    }
}
