//! Scroll-coupled reveal animations.
//!
//! Components do not talk to `IntersectionObserver` directly. They ask for a
//! [`VisibilityObserver`] through Yew context (falling back to the browser one)
//! so another host can drive the same enter/exit callbacks.

use crate::motion::{play_backward, play_forward, prime, query_all, Tween};
use std::rc::Rc;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{window, Element, HtmlElement, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};
use yew::prelude::*;

/// Elements carrying this class take part in their section's reveal.
pub const REVEAL_CLASS: &str = "fade-in";
pub const REVEAL_SELECTOR: &str = ".fade-in";

/// How far above the viewport the observer root reaches, as a percentage of
/// the viewport height.
const ROOT_REACH_ABOVE_PERCENT: u32 = 100_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealEvent {
    Enter,
    LeaveBack,
}

/// Tracks whether an element's top edge is above `start` (a fraction of the
/// viewport height, measured from the top).
///
/// Crossing the line downward plays, crossing back up reverses. Scrolling
/// further in either direction changes nothing, so the reveal replays every
/// time the line is crossed again.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollTrigger {
    start: f64,
    active: bool,
}

impl ScrollTrigger {
    pub fn new(start: f64) -> Self {
        Self {
            start: start.clamp(0.0, 1.0),
            active: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn update(&mut self, element_top: f64, viewport_height: f64) -> Option<RevealEvent> {
        let past_start = element_top <= viewport_height * self.start;
        match (self.active, past_start) {
            (false, true) => {
                self.active = true;
                Some(RevealEvent::Enter)
            }
            (true, false) => {
                self.active = false;
                Some(RevealEvent::LeaveBack)
            }
            _ => None,
        }
    }

    /// `rootMargin` for an observer root that runs from far above the page
    /// down to the start line. An element intersects it exactly while its top
    /// is past the line, so jumps (Home, anchors, `scrollTo`) still flip it.
    pub fn root_margin(&self) -> String {
        let inset = ((1.0 - self.start) * 100.0).round();
        format!("{ROOT_REACH_ABOVE_PERCENT}% 0px -{inset}% 0px")
    }
}

/// Keeps an observation alive. Dropping it stops the callbacks.
pub struct Registration {
    release: Option<Box<dyn FnOnce()>>,
}

impl Registration {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

pub trait VisibilityObserver {
    fn register(
        &self,
        element: &Element,
        start: f64,
        on_enter: Callback<()>,
        on_exit: Callback<()>,
    ) -> Option<Registration>;
}

/// Context value components use to reach the active observer.
#[derive(Clone)]
pub struct ObserverHandle(Rc<dyn VisibilityObserver>);

impl ObserverHandle {
    pub fn new(observer: impl VisibilityObserver + 'static) -> Self {
        Self(Rc::new(observer))
    }

    pub fn register(
        &self,
        element: &Element,
        start: f64,
        on_enter: Callback<()>,
        on_exit: Callback<()>,
    ) -> Option<Registration> {
        self.0.register(element, start, on_enter, on_exit)
    }
}

impl Default for ObserverHandle {
    fn default() -> Self {
        Self::new(IntersectionVisibility)
    }
}

impl PartialEq for ObserverHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

pub struct IntersectionVisibility;

fn viewport_height() -> f64 {
    window()
        .and_then(|w| w.inner_height().ok())
        .and_then(|value| value.as_f64())
        .unwrap_or(720.0)
}

impl VisibilityObserver for IntersectionVisibility {
    fn register(
        &self,
        element: &Element,
        start: f64,
        on_enter: Callback<()>,
        on_exit: Callback<()>,
    ) -> Option<Registration> {
        let mut trigger = ScrollTrigger::new(start);
        let root_margin = trigger.root_margin();

        let callback = Closure::<dyn FnMut(js_sys::Array)>::new(move |entries: js_sys::Array| {
            let viewport_height = viewport_height();
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                match trigger.update(entry.bounding_client_rect().top(), viewport_height) {
                    Some(RevealEvent::Enter) => on_enter.emit(()),
                    Some(RevealEvent::LeaveBack) => on_exit.emit(()),
                    None => {}
                }
            }
        });

        let options = IntersectionObserverInit::new();
        options.set_root_margin(&root_margin);
        options.set_threshold(&JsValue::from_f64(0.0));

        let observer = match IntersectionObserver::new_with_options(
            callback.as_ref().unchecked_ref(),
            &options,
        ) {
            Ok(observer) => observer,
            Err(error) => {
                log::warn!("visibility observer unavailable: {error:?}");
                return None;
            }
        };
        observer.observe(element);

        Some(Registration::new(move || {
            observer.disconnect();
            drop(callback);
        }))
    }
}

/// Reveals `root` (or its descendants matching `selector`) with `tween` when
/// its top edge crosses `start` of the viewport, and reverses on the way back.
#[hook]
pub fn use_reveal(root: NodeRef, selector: Option<&'static str>, tween: Tween, start: f64) {
    let observer = use_context::<ObserverHandle>().unwrap_or_default();

    use_effect_with(root, move |root| {
        let registration = root.cast::<HtmlElement>().and_then(|element| {
            let targets = match selector {
                Some(selector) => query_all(&element, selector),
                None => vec![element.clone()],
            };
            prime(&targets, &tween);

            let targets = Rc::new(targets);
            let on_enter = {
                let targets = Rc::clone(&targets);
                Callback::from(move |_| play_forward(&targets, &tween, 0))
            };
            let on_exit = Callback::from(move |_| play_backward(&targets, &tween));

            observer.register(&element, start, on_enter, on_exit)
        });

        move || drop(registration)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    const VIEWPORT: f64 = 1_000.0;

    #[test]
    fn crossing_start_line_downward_enters() {
        let mut trigger = ScrollTrigger::new(0.8);

        assert_eq!(trigger.update(1_200.0, VIEWPORT), None);
        assert_eq!(trigger.update(850.0, VIEWPORT), None);
        assert_eq!(trigger.update(790.0, VIEWPORT), Some(RevealEvent::Enter));
        assert!(trigger.is_active());
    }

    #[test]
    fn scrolling_past_the_section_keeps_it_revealed() {
        let mut trigger = ScrollTrigger::new(0.8);
        trigger.update(700.0, VIEWPORT);

        assert_eq!(trigger.update(100.0, VIEWPORT), None);
        assert_eq!(trigger.update(-2_000.0, VIEWPORT), None);
        assert_eq!(trigger.update(500.0, VIEWPORT), None);
    }

    #[test]
    fn scrolling_back_above_threshold_reverses_and_replays() {
        let mut trigger = ScrollTrigger::new(0.8);
        let mut events = Vec::new();

        for top in [900.0, 780.0, 400.0, 820.0, 950.0, 600.0] {
            if let Some(event) = trigger.update(top, VIEWPORT) {
                events.push(event);
            }
        }

        assert_eq!(
            events,
            vec![RevealEvent::Enter, RevealEvent::LeaveBack, RevealEvent::Enter]
        );
    }

    #[test]
    fn element_already_in_view_enters_immediately() {
        let mut trigger = ScrollTrigger::new(0.85);
        assert_eq!(trigger.update(120.0, VIEWPORT), Some(RevealEvent::Enter));
    }

    #[test]
    fn root_margin_matches_start_line() {
        assert_eq!(ScrollTrigger::new(0.8).root_margin(), "100000% 0px -20% 0px");
        assert_eq!(ScrollTrigger::new(0.85).root_margin(), "100000% 0px -15% 0px");
    }

    /// Top and bottom of the observer root in viewport coordinates, read back
    /// from a `rootMargin` string of the form `"T% 0px -B% 0px"`.
    fn root_band(root_margin: &str, viewport_height: f64) -> (f64, f64) {
        let percent = |token: &str| {
            token
                .trim_end_matches('%')
                .parse::<f64>()
                .expect("percent margin")
                / 100.0
        };
        let tokens: Vec<&str> = root_margin.split_whitespace().collect();
        let top = -percent(tokens[0]) * viewport_height;
        let bottom = viewport_height + percent(tokens[2]) * viewport_height;
        (top, bottom)
    }

    /// Feeds `tops` through the trigger the way `IntersectionObserver` does:
    /// once on observe, then only when the intersecting flag flips.
    fn deliver_like_observer(trigger: &mut ScrollTrigger, tops: &[f64]) -> Vec<RevealEvent> {
        const ELEMENT_HEIGHT: f64 = 400.0;
        let (band_top, band_bottom) = root_band(&trigger.root_margin(), VIEWPORT);
        let mut intersecting = None;
        let mut events = Vec::new();

        for &top in tops {
            let now = top < band_bottom && top + ELEMENT_HEIGHT > band_top;
            if intersecting != Some(now) {
                intersecting = Some(now);
                events.extend(trigger.update(top, VIEWPORT));
            }
        }
        events
    }

    #[test]
    fn jumping_back_to_top_reverses_and_scrolling_down_replays() {
        let mut trigger = ScrollTrigger::new(0.8);

        let events = deliver_like_observer(
            &mut trigger,
            &[900.0, 790.0, 400.0, 0.0, -300.0, -700.0, -5_000.0, 900.0, 790.0],
        );

        assert_eq!(
            events,
            vec![RevealEvent::Enter, RevealEvent::LeaveBack, RevealEvent::Enter]
        );
        assert!(trigger.is_active());
    }

    #[test]
    fn section_far_above_viewport_stays_revealed() {
        let mut trigger = ScrollTrigger::new(0.85);

        let events = deliver_like_observer(&mut trigger, &[1_200.0, 600.0, -3_000.0, -40_000.0]);

        assert_eq!(events, vec![RevealEvent::Enter]);
        assert!(trigger.is_active());
    }

    #[test]
    fn dropping_registration_releases_once() {
        let released = Rc::new(Cell::new(0));
        let registration = {
            let released = Rc::clone(&released);
            Registration::new(move || released.set(released.get() + 1))
        };

        assert_eq!(released.get(), 0);
        drop(registration);
        assert_eq!(released.get(), 1);
    }

    struct NeverObserves;

    impl VisibilityObserver for NeverObserves {
        fn register(
            &self,
            _element: &Element,
            _start: f64,
            _on_enter: Callback<()>,
            _on_exit: Callback<()>,
        ) -> Option<Registration> {
            None
        }
    }

    #[test]
    fn observer_handles_compare_by_identity() {
        let handle = ObserverHandle::new(NeverObserves);
        let same = handle.clone();
        let other = ObserverHandle::new(NeverObserves);

        assert!(handle == same);
        assert!(handle != other);
    }
}
