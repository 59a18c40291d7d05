use landkit_core::reveal::{apply_reveal, max_ratio};
use landkit_core::{
    CounterAnimation, IntersectionSample, MemoryElement, Reveal, RevealAnimator, RevealOptions,
    UiElement,
};

fn sample(key: u32, ratio: f64, is_intersecting: bool) -> IntersectionSample<u32> {
    IntersectionSample::new(key, ratio, is_intersecting)
}

fn animator_with(keys: &[u32]) -> RevealAnimator<u32> {
    let mut animator = RevealAnimator::new(RevealOptions::default());
    for key in keys {
        assert!(animator.register(*key));
    }
    animator
}

#[test]
fn batch_reveals_with_index_stagger() {
    let mut animator = animator_with(&[1, 2, 3]);
    let reveals = animator.observe(&[sample(3, 0.4, true), sample(1, 0.2, true)]);

    assert_eq!(
        reveals,
        vec![
            Reveal {
                key: 3,
                delay_ms: 0
            },
            Reveal {
                key: 1,
                delay_ms: 100
            },
        ]
    );
    assert!(!animator.is_revealed(&2));
    assert!(!animator.is_done());
}

#[test]
fn reveal_is_one_shot_and_never_reverts() {
    let mut animator = animator_with(&[7]);
    assert_eq!(animator.observe(&[sample(7, 1.0, true)]).len(), 1);

    assert!(animator.observe(&[sample(7, 0.0, false)]).is_empty());
    assert!(animator.observe(&[sample(7, 1.0, true)]).is_empty());
    assert!(animator.is_revealed(&7));
    assert!(!animator.register(7));
    assert!(animator.is_done());
}

#[test]
fn samples_below_threshold_keep_target_pending() {
    let mut animator = animator_with(&[1]);
    assert!(animator.observe(&[sample(1, 0.05, true)]).is_empty());
    assert!(animator.observe(&[sample(1, 0.5, false)]).is_empty());
    assert!(!animator.is_revealed(&1));
}

#[test]
fn target_taller_than_viewport_reveals_at_half_its_reachable_ratio() {
    // 800px viewport, 20000px section: at most 4% of it is ever visible.
    let reachable = max_ratio(20_000.0, 800.0);
    assert_eq!(reachable, 0.04);

    let mut animator = animator_with(&[1, 2]);
    assert!(animator
        .observe(&[sample(1, 0.01, true).with_max_ratio(reachable)])
        .is_empty());
    let reveals = animator.observe(&[
        sample(1, 0.03, true).with_max_ratio(reachable),
        sample(2, 0.03, true),
    ]);
    assert_eq!(reveals.len(), 1);
    assert_eq!(reveals[0].key, 1);
    assert!(!animator.is_revealed(&2));
}

#[test]
fn observer_thresholds_step_up_to_configured_threshold() {
    let options = RevealOptions::default();
    let steps = options.observer_thresholds();
    assert_eq!(steps.len(), 10);
    assert!((steps[9] - 0.1).abs() < 1e-12);
    assert!(steps.windows(2).all(|pair| pair[0] < pair[1]));

    let zero = RevealOptions {
        threshold: 0.0,
        ..RevealOptions::default()
    };
    assert_eq!(zero.observer_thresholds(), vec![0.0]);
    assert_eq!(max_ratio(0.0, 800.0), 1.0);
    assert_eq!(max_ratio(400.0, 800.0), 1.0);
}

#[test]
fn unregistered_targets_are_ignored() {
    let mut animator = animator_with(&[1]);
    assert!(animator.observe(&[sample(99, 1.0, true)]).is_empty());
    assert!(!animator.is_revealed(&99));
}

#[test]
fn zero_stagger_reveals_simultaneously() {
    let mut animator = RevealAnimator::new(RevealOptions {
        stagger_ms: 0,
        ..RevealOptions::default()
    });
    animator.register("a");
    animator.register("b");
    let reveals = animator.observe(&[sample_str("a"), sample_str("b")]);
    assert!(reveals.iter().all(|reveal| reveal.delay_ms == 0));
}

fn sample_str(key: &'static str) -> IntersectionSample<&'static str> {
    IntersectionSample::new(key, 1.0, true)
}

#[test]
fn apply_reveal_sets_class_and_delay() {
    let first = MemoryElement::new();
    let second = MemoryElement::new();
    apply_reveal(&first, &Reveal { key: 0, delay_ms: 0 }, "visible");
    apply_reveal(
        &second,
        &Reveal {
            key: 1,
            delay_ms: 200,
        },
        "visible",
    );

    assert!(first.has_class("visible"));
    assert_eq!(first.style("transition-delay"), None);
    assert!(second.has_class("visible"));
    assert_eq!(second.style("transition-delay").as_deref(), Some("200ms"));
}

#[test]
fn counter_runs_from_zero_to_parsed_target() {
    let target = CounterAnimation::parse_target("1,200").expect("numeric target");
    let counter = CounterAnimation::new(target, 2000.0);
    assert_eq!(counter.text_at(0.0), "0");
    assert_eq!(counter.text_at(500.0), "300");
    assert!(!counter.is_finished(1999.0));
    assert_eq!(counter.text_at(2400.0), "1200");
}
