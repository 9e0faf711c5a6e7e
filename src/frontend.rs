use crate::about::AboutMe;
use crate::contact::mailto_link;
use crate::content::SiteContent;
use crate::hero::{Hero, CONTACT_EMAIL, OWNER_NAME, PROJECTS_ANCHOR};
use crate::showcase::ProjectShowcase;
use std::rc::Rc;
use yew::prelude::*;

#[cfg(target_arch = "wasm32")]
use crate::content::{ContentError, CONTENT_PATH};
#[cfg(target_arch = "wasm32")]
use crate::reveal::ObserverHandle;
#[cfg(target_arch = "wasm32")]
use gloo_net::http::Request;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen_futures::spawn_local;
#[cfg(target_arch = "wasm32")]
use web_sys::window;

#[derive(Properties, PartialEq)]
pub struct PageProps {
    /// `None` while the content document is loading or when it failed to load.
    #[prop_or_default]
    pub content: Option<Rc<SiteContent>>,
}

#[function_component(Page)]
pub fn page(props: &PageProps) -> Html {
    let sections = props.content.as_ref().map(|content| {
        html! {
            <>
                <AboutMe skills={content.skills.clone()} stats={content.stats.clone()} />
                <section id={PROJECTS_ANCHOR} class="projects" aria-labelledby="projects-heading">
                    <header class="section-header">
                        <h2 id="projects-heading">{"Featured Projects"}</h2>
                        <p class="muted">{"Real solutions running in production. Click any project to visit it."}</p>
                    </header>
                    { for content.projects.iter().enumerate().map(|(index, project)| html! {
                        <ProjectShowcase
                            key={format!("{index}-{}", project.title)}
                            project={project.clone()}
                            index={index}
                        />
                    }) }
                </section>
            </>
        }
    });

    html! {
        <>
            <main id="content">
                <Hero />
                { for sections }
            </main>
            <footer class="site-footer">
                <p>{OWNER_NAME}</p>
                <a href={mailto_link(CONTACT_EMAIL)}>{CONTACT_EMAIL}</a>
            </footer>
        </>
    }
}

#[cfg(target_arch = "wasm32")]
async fn fetch_content() -> Result<SiteContent, ContentError> {
    let response = Request::get(CONTENT_PATH)
        .send()
        .await
        .map_err(|error| ContentError::Transport(error.to_string()))?;

    if !response.ok() {
        return Err(ContentError::Transport(format!(
            "{CONTENT_PATH} answered HTTP {}",
            response.status()
        )));
    }

    let body = response
        .text()
        .await
        .map_err(|error| ContentError::Transport(error.to_string()))?;
    SiteContent::from_json(&body)
}

#[cfg(target_arch = "wasm32")]
#[function_component(App)]
fn app() -> Html {
    let observer = use_state(ObserverHandle::default);
    let content = use_state(|| None::<Rc<SiteContent>>);

    {
        let content = content.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                match fetch_content().await {
                    Ok(loaded) => {
                        log::debug!("loaded {} projects", loaded.projects.len());
                        content.set(Some(Rc::new(loaded)));
                    }
                    Err(error) => log::error!("{error}"),
                }
            });
            || ()
        });
    }

    html! {
        <ContextProvider<ObserverHandle> context={(*observer).clone()}>
            <Page content={(*content).clone()} />
        </ContextProvider<ObserverHandle>>
    }
}

#[cfg(target_arch = "wasm32")]
pub fn run() {
    console_error_panic_hook::set_once();
    let level = if cfg!(debug_assertions) {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    let _ = console_log::init_with_level(level);

    yew::Renderer::<App>::with_root(
        window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("app"))
            .expect("missing #app mount point"),
    )
    .render();
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html as Document, Selector};

    const SITE_JSON: &str = include_str!("../content/site.json");

    async fn render(content: Option<SiteContent>) -> Document {
        let markup = yew::ServerRenderer::<Page>::with_props(move || PageProps {
            content: content.map(Rc::new),
        })
        .hydratable(false)
        .render()
        .await;
        Document::parse_fragment(&markup)
    }

    fn section_classes(document: &Document) -> Vec<String> {
        let selector = Selector::parse("main > section").expect("valid selector");
        document
            .select(&selector)
            .filter_map(|section| section.value().attr("class"))
            .map(str::to_string)
            .collect()
    }

    #[tokio::test]
    async fn sections_stack_in_page_order() {
        let content = SiteContent::from_json(SITE_JSON).expect("bundled content");
        let document = render(Some(content)).await;

        assert_eq!(section_classes(&document), vec!["hero", "about", "projects"]);
    }

    #[tokio::test]
    async fn one_showcase_per_project() {
        let content = SiteContent::from_json(SITE_JSON).expect("bundled content");
        let expected = content.projects.len();
        let document = render(Some(content)).await;

        let selector = Selector::parse("#projects .showcase").expect("valid selector");
        let indexes: Vec<&str> = document
            .select(&selector)
            .filter_map(|card| card.value().attr("data-index"))
            .collect();
        let expected_indexes: Vec<String> = (0..expected).map(|index| index.to_string()).collect();

        assert_eq!(indexes, expected_indexes);
    }

    #[tokio::test]
    async fn hero_renders_before_content_arrives() {
        let document = render(None).await;

        assert_eq!(section_classes(&document), vec!["hero"]);
        let footer = Selector::parse(".site-footer").expect("valid selector");
        assert_eq!(document.select(&footer).count(), 1);
    }
}
