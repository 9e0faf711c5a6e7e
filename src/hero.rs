use crate::contact::{mailto_link, whatsapp_link};
use crate::icons;
use crate::motion::{play_timeline, Ease, Pose, Timeline, Tween};
use crate::reveal::REVEAL_CLASS;
use gloo_events::EventListener;
use wasm_bindgen::JsCast;
use web_sys::{window, Element, HtmlElement, MouseEvent, ScrollBehavior, ScrollIntoViewOptions};
use yew::prelude::*;

pub const OWNER_NAME: &str = "Daniel Pérez";
pub const OWNER_ROLE: &str = "Full Stack Developer";
pub const WHATSAPP_NUMBER: &str = "+52 555 123 4567";
pub const WHATSAPP_MESSAGE: &str = "Hi! I'd like to know more about your web development services.";
pub const CONTACT_EMAIL: &str = "hello@example.com";
pub const LINKEDIN_URL: &str = "https://www.linkedin.com/in/your-profile/";
pub const GITHUB_URL: &str = "https://github.com/your-user";
pub const PROFILE_IMAGE: &str = "/images/hero-profile.png";
pub const PROJECTS_ANCHOR: &str = "projects";

const FOLLOWER_OFFSET: f64 = 75.0;
const FOLLOWER_DURATION_MS: u32 = 800;

const TECH_STACK: [(&str, &str); 6] = [
    ("React", "blue"),
    ("Next.js", "gray"),
    ("Node.js", "green"),
    ("Python", "yellow"),
    ("MongoDB", "green"),
    ("Directus", "purple"),
];

const QUICK_STATS: [(&str, &str, &str); 3] = [
    ("3+", "Years", "blue"),
    ("10+", "Projects", "green"),
    ("100%", "Success", "purple"),
];

/// Text block, then the profile card over the text's tail, then the card's
/// details over the card's tail.
pub fn entrance_timeline() -> Timeline {
    Timeline::new()
        .then(
            ".hero-text",
            Tween::new(Pose::hidden().shifted(0.0, 50.0), Pose::VISIBLE, 1_000).ease(Ease::Power3Out),
        )
        .overlapping(
            ".profile-card",
            Tween::new(
                Pose::hidden().shifted(50.0, 0.0).scaled(0.9),
                Pose::VISIBLE,
                1_000,
            )
            .ease(Ease::Power3Out),
            700,
        )
        .overlapping(
            ".profile-card .fade-in",
            Tween::new(Pose::hidden().shifted(0.0, 20.0), Pose::VISIBLE, 600)
                .stagger(100)
                .ease(Ease::Power2Out),
            500,
        )
}

/// Where the glow's top-left corner should head so its centre sits on the pointer.
pub fn follower_target(client_x: i32, client_y: i32) -> (f64, f64) {
    (
        f64::from(client_x) - FOLLOWER_OFFSET,
        f64::from(client_y) - FOLLOWER_OFFSET,
    )
}

fn follower_transition() -> String {
    format!("transform {FOLLOWER_DURATION_MS}ms {}", Ease::Power2Out.css())
}

fn move_follower(follower: &HtmlElement, client_x: i32, client_y: i32) {
    let (x, y) = follower_target(client_x, client_y);
    let style = follower.style();
    let _ = style.set_property("transition", &follower_transition());
    let _ = style.set_property("transform", &format!("translate({x}px, {y}px)"));
}

fn scroll_to_projects() {
    let Some(target) = window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(PROJECTS_ANCHOR))
    else {
        return;
    };

    let options = ScrollIntoViewOptions::new();
    options.set_behavior(ScrollBehavior::Smooth);
    target.scroll_into_view_with_scroll_into_view_options(&options);
}

#[function_component(Hero)]
pub fn hero() -> Html {
    let hero_ref = use_node_ref();
    let follower_ref = use_node_ref();

    {
        let hero_ref = hero_ref.clone();
        use_effect_with((), move |_| {
            if let Some(root) = hero_ref.cast::<Element>() {
                let total_ms = play_timeline(&root, &entrance_timeline());
                log::debug!("hero entrance scheduled over {total_ms}ms");
            }
            || ()
        });
    }

    {
        let follower_ref = follower_ref.clone();
        use_effect_with((), move |_| {
            let listener = window().and_then(|w| w.document()).map(|document| {
                EventListener::new(&document, "mousemove", move |event| {
                    let Some(event) = event.dyn_ref::<MouseEvent>() else {
                        return;
                    };
                    if let Some(follower) = follower_ref.cast::<HtmlElement>() {
                        move_follower(&follower, event.client_x(), event.client_y());
                    }
                })
            });

            move || drop(listener)
        });
    }

    let whatsapp = whatsapp_link(WHATSAPP_NUMBER, WHATSAPP_MESSAGE);
    let on_view_projects = Callback::from(|_: MouseEvent| scroll_to_projects());

    html! {
        <section ref={hero_ref} class="hero" aria-labelledby="hero-heading">
            <div class="hero-backdrop" aria-hidden="true">
                <div class="beam beam-1"></div>
                <div class="beam beam-2"></div>
                <div class="beam beam-3"></div>
                <div class="hero-grid"></div>
            </div>

            <div ref={follower_ref} class="cursor-glow" aria-hidden="true"></div>

            <div class="hero-layout">
                <div class="hero-text">
                    <h1 id="hero-heading" class="hero-title">
                        {"I Build Solutions"}
                        <span class="hero-title-accent">{"That Deliver Results"}</span>
                    </h1>
                    <p class="hero-lead">
                        {"Specialist in complex business systems and smart automation that drive real growth."}
                    </p>
                    <p class="hero-body">
                        {"I turn ideas into powerful, scalable web applications. From automated booking systems to high-impact landing pages that turn visitors into customers."}
                    </p>

                    <div class="tech-stack">
                        <p class="muted">{"Tech stack:"}</p>
                        <ul class="chip-list">
                            { for TECH_STACK.iter().map(|(name, tone)| html! {
                                <li class={classes!("chip", format!("chip-{tone}"))}>{*name}</li>
                            }) }
                        </ul>
                    </div>

                    <div class="hero-actions">
                        <button type="button" class="button button-primary" onclick={on_view_projects}>
                            {"View Projects"}
                        </button>
                        <a
                            class="button button-whatsapp"
                            data-channel="whatsapp"
                            href={whatsapp.clone()}
                            target="_blank"
                            rel="noopener noreferrer"
                        >
                            {icons::whatsapp()}
                            {"Contact Now"}
                        </a>
                    </div>
                </div>

                <div class="hero-card-slot">
                    <article class="profile-card">
                        <img class="profile-photo" src={PROFILE_IMAGE} alt={OWNER_ROLE} />

                        <h2 class={REVEAL_CLASS}>{OWNER_NAME}</h2>
                        <p class={classes!(REVEAL_CLASS, "profile-role")}>{OWNER_ROLE}</p>
                        <p class={classes!(REVEAL_CLASS, "profile-bio")}>
                            {"Specialist in business automation and high-impact landing pages."}
                        </p>

                        <div class={classes!(REVEAL_CLASS, "profile-status")}>
                            <span class="status-dot" aria-hidden="true"></span>
                            <span class="muted">{CONTACT_EMAIL}</span>
                            <span class="status-available">{"Available"}</span>
                        </div>

                        <dl class={classes!(REVEAL_CLASS, "quick-stats")}>
                            { for QUICK_STATS.iter().map(|(value, label, tone)| html! {
                                <div class="quick-stat">
                                    <dt class={classes!("stat-value", format!("tone-{tone}"))}>{*value}</dt>
                                    <dd class="stat-label">{*label}</dd>
                                </div>
                            }) }
                        </dl>

                        <div class={classes!(REVEAL_CLASS, "profile-contact")}>
                            <a
                                class="button button-whatsapp button-block"
                                data-channel="whatsapp"
                                href={whatsapp}
                                target="_blank"
                                rel="noopener noreferrer"
                            >
                                {icons::whatsapp()}
                                {"Message me on WhatsApp"}
                            </a>
                            <nav class="social-links" aria-label="Social profiles">
                                <a href={mailto_link(CONTACT_EMAIL)} title="Email" data-channel="email">
                                    {icons::mail()}
                                </a>
                                <a href={LINKEDIN_URL} title="LinkedIn" data-channel="linkedin" target="_blank" rel="noopener noreferrer">
                                    {icons::linkedin()}
                                </a>
                                <a href={GITHUB_URL} title="GitHub" data-channel="github" target="_blank" rel="noopener noreferrer">
                                    {icons::github()}
                                </a>
                            </nav>
                        </div>
                    </article>
                </div>
            </div>

            <div class="scroll-hint" aria-hidden="true">{icons::arrow_down()}</div>
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::total_ms;
    use scraper::{Html as Document, Selector};

    async fn render_hero() -> Document {
        let markup = yew::ServerRenderer::<Hero>::new()
            .hydratable(false)
            .render()
            .await;
        Document::parse_fragment(&markup)
    }

    fn count(document: &Document, selector: &str) -> usize {
        let selector = Selector::parse(selector).expect("valid selector");
        document.select(&selector).count()
    }

    #[tokio::test]
    async fn whatsapp_links_use_fixed_number_and_encoded_message() {
        let document = render_hero().await;
        let selector = Selector::parse("a[data-channel=\"whatsapp\"]").expect("valid selector");
        let hrefs: Vec<&str> = document
            .select(&selector)
            .filter_map(|link| link.value().attr("href"))
            .collect();

        let expected = "https://wa.me/525551234567?text=Hi%21%20I%27d%20like%20to%20know%20more%20about%20your%20web%20development%20services.";
        assert_eq!(hrefs, vec![expected, expected]);
    }

    #[tokio::test]
    async fn contact_channels_are_linked() {
        let document = render_hero().await;
        let selector = Selector::parse(".social-links a").expect("valid selector");
        let hrefs: Vec<&str> = document
            .select(&selector)
            .filter_map(|link| link.value().attr("href"))
            .collect();

        assert_eq!(
            hrefs,
            vec!["mailto:hello@example.com", LINKEDIN_URL, GITHUB_URL]
        );
    }

    #[tokio::test]
    async fn text_block_is_fully_visible_by_end_of_entrance() {
        let document = render_hero().await;
        let schedule = entrance_timeline().schedule(|selector| count(&document, selector));
        let total = total_ms(&schedule);

        let text = schedule
            .iter()
            .find(|step| step.selector == ".hero-text")
            .expect("text step scheduled");
        assert_eq!(text.targets, 1);
        assert!(text.end_ms() <= total);
        assert_eq!(text.pose_at(0, f64::from(total)).opacity, 1.0);

        let details = count(&document, ".profile-card .fade-in");
        assert_eq!(details, 6);
        assert_eq!(total, 800 + 600 + 100 * 5);
    }

    #[tokio::test]
    async fn entrance_steps_only_target_hero_elements() {
        let document = render_hero().await;
        for step in entrance_timeline().schedule(|selector| count(&document, selector)) {
            assert!(step.targets > 0, "{} should match", step.selector);
        }
    }

    #[test]
    fn follower_centres_on_pointer() {
        assert_eq!(follower_target(200, 100), (125.0, 25.0));
        assert_eq!(follower_target(0, 0), (-75.0, -75.0));
    }
}
