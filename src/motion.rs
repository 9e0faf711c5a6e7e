//! Declarative tweens and timelines.
//!
//! A [`Tween`] describes how a set of elements moves from one [`Pose`] to another.
//! A [`Timeline`] places tweens one after another, optionally overlapping the tail
//! of the previous step. Scheduling and sampling are pure so the timing can be
//! checked without a browser. The DOM side hands the schedule to CSS transitions.

use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub opacity: f64,
    pub x: f64,
    pub y: f64,
    pub scale: f64,
}

impl Pose {
    pub const VISIBLE: Pose = Pose {
        opacity: 1.0,
        x: 0.0,
        y: 0.0,
        scale: 1.0,
    };

    pub const fn hidden() -> Self {
        Pose {
            opacity: 0.0,
            ..Self::VISIBLE
        }
    }

    pub const fn shifted(self, x: f64, y: f64) -> Self {
        Pose { x, y, ..self }
    }

    pub const fn scaled(self, scale: f64) -> Self {
        Pose { scale, ..self }
    }

    pub fn interpolate(self, to: Pose, progress: f64) -> Pose {
        let lerp = |a: f64, b: f64| a + (b - a) * progress;
        Pose {
            opacity: lerp(self.opacity, to.opacity),
            x: lerp(self.x, to.x),
            y: lerp(self.y, to.y),
            scale: lerp(self.scale, to.scale),
        }
    }

    pub fn transform(&self) -> String {
        format!(
            "translate({}px, {}px) scale({})",
            self.x, self.y, self.scale
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ease {
    Power1Out,
    Power2Out,
    Power3Out,
}

impl Ease {
    fn exponent(self) -> i32 {
        match self {
            Self::Power1Out => 2,
            Self::Power2Out => 3,
            Self::Power3Out => 4,
        }
    }

    pub fn apply(self, progress: f64) -> f64 {
        let progress = progress.clamp(0.0, 1.0);
        1.0 - (1.0 - progress).powi(self.exponent())
    }

    /// Closest `cubic-bezier` for the CSS transition.
    pub fn css(self) -> &'static str {
        match self {
            Self::Power1Out => "cubic-bezier(0.25, 0.46, 0.45, 0.94)",
            Self::Power2Out => "cubic-bezier(0.215, 0.61, 0.355, 1)",
            Self::Power3Out => "cubic-bezier(0.165, 0.84, 0.44, 1)",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween {
    pub from: Pose,
    pub to: Pose,
    pub duration_ms: u32,
    pub stagger_ms: u32,
    pub ease: Ease,
}

impl Tween {
    pub const fn new(from: Pose, to: Pose, duration_ms: u32) -> Self {
        Self {
            from,
            to,
            duration_ms,
            stagger_ms: 0,
            ease: Ease::Power1Out,
        }
    }

    pub const fn stagger(self, stagger_ms: u32) -> Self {
        Self { stagger_ms, ..self }
    }

    pub const fn ease(self, ease: Ease) -> Self {
        Self { ease, ..self }
    }

    /// Time from the first target starting to the last target finishing.
    /// A tween without targets still occupies its duration.
    pub fn span_ms(&self, targets: usize) -> u32 {
        let extra = u32::try_from(targets.saturating_sub(1)).unwrap_or(u32::MAX);
        self.duration_ms
            .saturating_add(self.stagger_ms.saturating_mul(extra))
    }

    pub fn delay_ms(&self, index: usize) -> u32 {
        self.stagger_ms
            .saturating_mul(u32::try_from(index).unwrap_or(u32::MAX))
    }

    /// Playing backwards, the last target leaves first.
    pub fn reverse_delay_ms(&self, index: usize, targets: usize) -> u32 {
        self.delay_ms(targets.saturating_sub(index + 1))
    }

    pub fn pose_at(&self, index: usize, elapsed_ms: f64) -> Pose {
        let local = elapsed_ms - f64::from(self.delay_ms(index));
        let progress = if self.duration_ms == 0 {
            if local >= 0.0 {
                1.0
            } else {
                0.0
            }
        } else {
            (local / f64::from(self.duration_ms)).clamp(0.0, 1.0)
        };
        self.from.interpolate(self.to, self.ease.apply(progress))
    }

    pub fn transition(&self, delay_ms: u32) -> String {
        let duration = self.duration_ms;
        let ease = self.ease.css();
        format!(
            "opacity {duration}ms {ease} {delay_ms}ms, transform {duration}ms {ease} {delay_ms}ms"
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Position {
    AfterPrevious,
    /// Start this many milliseconds before the previous step ends.
    OverlapPrevious(u32),
}

#[derive(Clone, Debug, PartialEq)]
struct Step {
    selector: &'static str,
    tween: Tween,
    position: Position,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Timeline {
    steps: Vec<Step>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScheduledStep {
    pub selector: &'static str,
    pub tween: Tween,
    pub start_ms: u32,
    pub targets: usize,
}

impl ScheduledStep {
    pub fn end_ms(&self) -> u32 {
        self.start_ms.saturating_add(self.tween.span_ms(self.targets))
    }

    pub fn pose_at(&self, index: usize, timeline_ms: f64) -> Pose {
        self.tween
            .pose_at(index, timeline_ms - f64::from(self.start_ms))
    }
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(mut self, selector: &'static str, tween: Tween) -> Self {
        self.steps.push(Step {
            selector,
            tween,
            position: Position::AfterPrevious,
        });
        self
    }

    pub fn overlapping(mut self, selector: &'static str, tween: Tween, overlap_ms: u32) -> Self {
        self.steps.push(Step {
            selector,
            tween,
            position: Position::OverlapPrevious(overlap_ms),
        });
        self
    }

    /// Resolves start times given how many elements each selector matches.
    pub fn schedule(&self, targets: impl Fn(&str) -> usize) -> Vec<ScheduledStep> {
        let mut previous_end = 0_u32;
        self.steps
            .iter()
            .map(|step| {
                let start_ms = match step.position {
                    Position::AfterPrevious => previous_end,
                    Position::OverlapPrevious(overlap) => previous_end.saturating_sub(overlap),
                };
                let scheduled = ScheduledStep {
                    selector: step.selector,
                    tween: step.tween,
                    start_ms,
                    targets: targets(step.selector),
                };
                previous_end = scheduled.end_ms();
                scheduled
            })
            .collect()
    }
}

pub fn total_ms(schedule: &[ScheduledStep]) -> u32 {
    schedule
        .iter()
        .map(ScheduledStep::end_ms)
        .max()
        .unwrap_or(0)
}

pub fn query_all(root: &Element, selector: &str) -> Vec<HtmlElement> {
    let Ok(nodes) = root.query_selector_all(selector) else {
        return Vec::new();
    };

    (0..nodes.length())
        .filter_map(|index| nodes.item(index))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .collect()
}

pub fn set_pose(element: &HtmlElement, pose: Pose, transition: Option<&str>) {
    let style = element.style();
    let _ = style.set_property("transition", transition.unwrap_or("none"));
    let _ = style.set_property("opacity", &pose.opacity.to_string());
    let _ = style.set_property("transform", &pose.transform());
}

/// Snaps elements to the tween's start pose and flushes styles so the next
/// pose change runs as a transition instead of being coalesced.
pub fn prime(elements: &[HtmlElement], tween: &Tween) {
    for element in elements {
        set_pose(element, tween.from, None);
    }
    if let Some(first) = elements.first() {
        let _ = first.offset_width();
    }
}

pub fn play_forward(elements: &[HtmlElement], tween: &Tween, start_ms: u32) {
    for (index, element) in elements.iter().enumerate() {
        let delay = start_ms.saturating_add(tween.delay_ms(index));
        set_pose(element, tween.to, Some(&tween.transition(delay)));
    }
}

pub fn play_backward(elements: &[HtmlElement], tween: &Tween) {
    for (index, element) in elements.iter().enumerate() {
        let delay = tween.reverse_delay_ms(index, elements.len());
        set_pose(element, tween.from, Some(&tween.transition(delay)));
    }
}

/// Runs every step of `timeline` against the matches under `root`.
/// Steps whose selector matches nothing are skipped.
pub fn play_timeline(root: &Element, timeline: &Timeline) -> u32 {
    let schedule = timeline.schedule(|selector| query_all(root, selector).len());

    for step in &schedule {
        let elements = query_all(root, step.selector);
        if elements.is_empty() {
            continue;
        }
        prime(&elements, &step.tween);
        play_forward(&elements, &step.tween, step.start_ms);
    }

    total_ms(&schedule)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FADE: Tween = Tween::new(Pose::hidden().shifted(0.0, 20.0), Pose::VISIBLE, 600)
        .stagger(100)
        .ease(Ease::Power2Out);

    #[test]
    fn eases_start_at_zero_and_end_at_one() {
        for ease in [Ease::Power1Out, Ease::Power2Out, Ease::Power3Out] {
            assert_eq!(ease.apply(0.0), 0.0);
            assert_eq!(ease.apply(1.0), 1.0);
            assert!(ease.apply(0.5) > 0.5, "{ease:?} should decelerate");
        }
        assert!(Ease::Power3Out.apply(0.3) > Ease::Power1Out.apply(0.3));
    }

    #[test]
    fn stagger_extends_span_per_extra_target() {
        assert_eq!(FADE.span_ms(0), 600);
        assert_eq!(FADE.span_ms(1), 600);
        assert_eq!(FADE.span_ms(6), 1_100);
    }

    #[test]
    fn reverse_delays_run_last_target_first() {
        let delays: Vec<u32> = (0..4).map(|index| FADE.reverse_delay_ms(index, 4)).collect();
        assert_eq!(delays, vec![300, 200, 100, 0]);
    }

    #[test]
    fn overlap_starts_before_previous_end() {
        let base = Tween::new(Pose::hidden(), Pose::VISIBLE, 1_000);
        let timeline = Timeline::new()
            .then(".a", base)
            .overlapping(".b", base, 700)
            .overlapping(".c", FADE, 500);

        let schedule = timeline.schedule(|selector| if selector == ".c" { 3 } else { 1 });
        let starts: Vec<u32> = schedule.iter().map(|step| step.start_ms).collect();

        assert_eq!(starts, vec![0, 300, 800]);
        assert_eq!(total_ms(&schedule), 800 + 600 + 200);
    }

    #[test]
    fn overlap_never_goes_negative() {
        let base = Tween::new(Pose::hidden(), Pose::VISIBLE, 200);
        let schedule = Timeline::new()
            .overlapping(".a", base, 500)
            .overlapping(".b", base, 900)
            .schedule(|_| 1);

        assert_eq!(schedule[0].start_ms, 0);
        assert_eq!(schedule[1].start_ms, 0);
    }

    #[test]
    fn missing_targets_keep_timing_of_later_steps() {
        let base = Tween::new(Pose::hidden(), Pose::VISIBLE, 400);
        let timeline = Timeline::new().then(".absent", base).then(".present", base);

        let schedule = timeline.schedule(|selector| usize::from(selector == ".present"));
        assert_eq!(schedule[0].targets, 0);
        assert_eq!(schedule[1].start_ms, 400);
    }

    #[test]
    fn pose_sampling_follows_stagger_and_clamps() {
        let second_before_start = FADE.pose_at(1, 50.0);
        assert_eq!(second_before_start, FADE.from);

        let first_midway = FADE.pose_at(0, 300.0);
        assert!(first_midway.opacity > 0.5 && first_midway.opacity < 1.0);
        assert!(first_midway.y > 0.0 && first_midway.y < 20.0);

        assert_eq!(FADE.pose_at(5, 10_000.0), Pose::VISIBLE);
    }

    #[test]
    fn transition_css_carries_delay_and_curve() {
        let css = FADE.transition(250);
        assert_eq!(
            css,
            "opacity 600ms cubic-bezier(0.215, 0.61, 0.355, 1) 250ms, \
             transform 600ms cubic-bezier(0.215, 0.61, 0.355, 1) 250ms"
        );
    }

    #[test]
    fn pose_transform_css() {
        let pose = Pose::hidden().shifted(50.0, 0.0).scaled(0.9);
        assert_eq!(pose.transform(), "translate(50px, 0px) scale(0.9)");
    }
}
