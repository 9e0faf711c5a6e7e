use crate::content::{Metrics, Project};
use crate::icons;
use crate::media::{MediaCommand, MediaEvent, MediaSource, MediaState};
use crate::motion::{Ease, Pose, Tween};
use crate::reveal::use_reveal;
use gloo_timers::callback::Timeout;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Event, HtmlMediaElement, MouseEvent};
use yew::prelude::*;

pub const REVEAL_START: f64 = 0.85;
pub const CARD_REVEAL: Tween = Tween::new(
    Pose::hidden().shifted(0.0, 60.0).scaled(0.95),
    Pose::VISIBLE,
    1_200,
)
.ease(Ease::Power3Out);

pub const ENHANCE_DELAY_MS: u32 = 800;
const TECH_PREVIEW_LEN: usize = 3;

#[derive(Properties, PartialEq)]
pub struct ProjectShowcaseProps {
    pub project: Project,
    pub index: usize,
}

/// First few technologies plus how many were left out.
pub fn tech_preview(technologies: &[String]) -> (&[String], usize) {
    let shown = technologies.len().min(TECH_PREVIEW_LEN);
    (&technologies[..shown], technologies.len() - shown)
}

pub fn metric_label(key: &str) -> String {
    key.replace('_', " ")
}

fn run_command(video_ref: &NodeRef, command: MediaCommand) {
    let Some(video) = video_ref.cast::<HtmlMediaElement>() else {
        return;
    };

    match command {
        MediaCommand::Play => match video.play() {
            Ok(promise) => spawn_local(async move {
                if let Err(error) = JsFuture::from(promise).await {
                    log::debug!("video play() rejected: {error:?}");
                }
            }),
            Err(error) => log::debug!("video play() threw: {error:?}"),
        },
        MediaCommand::Pause => {
            let _ = video.pause();
        }
    }
}

fn metrics_panel(metrics: &Metrics) -> Html {
    html! {
        <div class="metrics-panel">
            <h3>{"Impact Metrics"}</h3>
            <dl class="metric-grid">
                { for metrics.iter().map(|(key, value)| html! {
                    <div class="metric">
                        <dt class="metric-value">{value.as_str()}</dt>
                        <dd class="metric-label">{metric_label(key)}</dd>
                    </div>
                }) }
            </dl>
        </div>
    }
}

#[function_component(ProjectShowcase)]
pub fn project_showcase(props: &ProjectShowcaseProps) -> Html {
    let project = &props.project;
    let source = MediaSource::for_project(project);

    let card_ref = use_node_ref();
    let video_ref = use_node_ref();
    let enhanced = use_state_eq(|| false);
    let media = {
        let initial = MediaState::initial(&source);
        use_reducer(move || initial)
    };

    use_reveal(card_ref.clone(), None, CARD_REVEAL, REVEAL_START);

    {
        let enhanced = enhanced.clone();
        use_effect_with(props.project.clone(), move |_| {
            enhanced.set(false);
            let timeout = Timeout::new(ENHANCE_DELAY_MS, move || enhanced.set(true));
            move || drop(timeout)
        });
    }

    {
        let media = media.clone();
        // The `muted` attribute alone does not mute elements created from script.
        let video_ref = video_ref.clone();
        use_effect_with(source.clone(), move |source| {
            media.dispatch(MediaEvent::Reset(MediaState::initial(source)));
            if let Some(video) = video_ref.cast::<HtmlMediaElement>() {
                video.set_muted(true);
            }
            || ()
        });
    }

    let dispatch = {
        let media = media.clone();
        let video_ref = video_ref.clone();
        Callback::from(move |event: MediaEvent| {
            if let (_, Some(command)) = (*media).apply(event) {
                run_command(&video_ref, command);
            }
            media.dispatch(event);
        })
    };

    let on_loaded = dispatch.reform(|_: Event| MediaEvent::FirstFrame);
    let on_play = dispatch.reform(|_: Event| MediaEvent::Played);
    let on_pause = dispatch.reform(|_: Event| MediaEvent::Paused);
    let on_toggle = {
        let dispatch = dispatch.clone();
        let video_ref = video_ref.clone();
        Callback::from(move |event: MouseEvent| {
            event.prevent_default();
            event.stop_propagation();
            if let Some(video) = video_ref.cast::<HtmlMediaElement>() {
                dispatch.emit(MediaEvent::Toggle {
                    element_paused: video.paused(),
                });
            }
        })
    };

    let media_left = props.index % 2 == 0;
    let is_video = source.is_video();
    let (preview, hidden_count) = tech_preview(&project.technologies);
    let link = project.link.clone();

    let media_view = match &source {
        MediaSource::Video(url) => html! {
            <video
                ref={video_ref}
                class={classes!("media-video", media.is_loaded().then_some("is-loaded"))}
                src={url.clone()}
                muted={true}
                loop={true}
                playsinline={true}
                autoplay={true}
                onloadeddata={on_loaded}
                onplay={on_play}
                onpause={on_pause}
            />
        },
        MediaSource::Image(url) => html! {
            <img class="media-image" src={url.clone()} alt={project.title.clone()} loading="lazy" />
        },
        MediaSource::None => html! {
            <div class="media-empty" aria-hidden="true"></div>
        },
    };

    let toggle = is_video.then(|| {
        let (label, icon) = if media.shows_pause() {
            ("Pause video", icons::pause())
        } else {
            ("Play video", icons::play())
        };
        html! {
            <div class="media-controls">
                <button
                    type="button"
                    class="media-toggle"
                    title={label}
                    aria-label={label}
                    onclick={on_toggle}
                >
                    {icon}
                </button>
            </div>
        }
    });

    html! {
        <div ref={card_ref} class="showcase" data-index={props.index.to_string()}>
            <article
                class={classes!(
                    "showcase-card",
                    if media_left { "layout-media-left" } else { "layout-media-right" },
                    (*enhanced).then_some("is-enhanced")
                )}
            >
                <div class="showcase-media">
                    <div class="browser-frame">
                        <div class="browser-bar">
                            <span class="browser-dots" aria-hidden="true">
                                <span></span><span></span><span></span>
                            </span>
                            <span class="browser-address">{project.display_address()}</span>
                        </div>

                        <div class="media-stage">
                            <a class="media-link" href={link.clone()} target="_blank" rel="noopener noreferrer">
                                <div class="media-frame">
                                    {media_view}
                                    <span class="live-badge">
                                        <span class="status-dot" aria-hidden="true"></span>
                                        {"LIVE DEMO"}
                                    </span>
                                    <div class="media-overlay">
                                        <h4>{project.title.clone()}</h4>
                                        <p class="media-overlay-description">{project.description.clone()}</p>
                                        <div class="media-overlay-footer">
                                            <ul class="tech-preview">
                                                { for preview.iter().map(|tech| html! {
                                                    <li class="tag">{tech.as_str()}</li>
                                                }) }
                                                if hidden_count > 0 {
                                                    <li class="tech-more">{format!("+{hidden_count} more")}</li>
                                                }
                                            </ul>
                                            <span class="media-kind" aria-hidden="true">
                                                {if is_video { "🎥" } else { "📸" }}
                                            </span>
                                            <span class="media-hint">{"Click to visit"}</span>
                                        </div>
                                    </div>
                                </div>
                            </a>
                            {for toggle}
                        </div>

                        <div class="browser-status">
                            <span class={classes!("status-indicator", is_video.then_some("is-live"))}>
                                {if is_video { "Interactive demo" } else { "Site capture" }}
                            </span>
                            <span class="muted">{project.kind.clone()}</span>
                            <span class="status-cta">{"Click to visit →"}</span>
                        </div>
                    </div>
                </div>

                <div class="showcase-details">
                    <span class="type-pill">{project.kind.clone()}</span>
                    <h2>{project.title.clone()}</h2>
                    <p class="showcase-description">{project.description.clone()}</p>

                    <div class="challenge">
                        <h3>{"Solution Delivered"}</h3>
                        <p>{project.challenge_solved.clone()}</p>
                    </div>

                    <div class="features">
                        <h3>{"Results"}</h3>
                        <ul>
                            { for project.features.iter().map(|feature| html! {
                                <li><span class="check" aria-hidden="true">{"✓"}</span>{feature.as_str()}</li>
                            }) }
                        </ul>
                    </div>

                    <div class="technologies">
                        <h3>{"Technologies Used"}</h3>
                        <ul class="tech-list">
                            { for project.technologies.iter().map(|tech| html! {
                                <li class="chip">{tech.as_str()}</li>
                            }) }
                        </ul>
                    </div>

                    { for project.metrics.as_ref().filter(|metrics| !metrics.is_empty()).map(metrics_panel) }

                    <div class="showcase-cta">
                        <a class="button button-primary" href={link} target="_blank" rel="noopener noreferrer">
                            {icons::open_link()}
                            {"Visit Website"}
                        </a>
                    </div>
                </div>
            </article>
        </div>
    }
}
