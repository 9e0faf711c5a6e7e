use crate::content::{ProfileStats, SkillSet};
use crate::icons;
use crate::motion::{Ease, Pose, Tween};
use crate::reveal::{use_reveal, REVEAL_CLASS, REVEAL_SELECTOR};
use yew::prelude::*;

pub const REVEAL_START: f64 = 0.8;
pub const REVEAL: Tween = Tween::new(Pose::hidden().shifted(0.0, 30.0), Pose::VISIBLE, 800)
    .stagger(200)
    .ease(Ease::Power1Out);

const ABOUT_IMAGE: &str = "/images/profile.jpg";

#[derive(Properties, PartialEq)]
pub struct AboutMeProps {
    pub skills: SkillSet,
    pub stats: ProfileStats,
}

/// Heading for a skill category key.
pub fn category_title(key: &str) -> String {
    match key {
        "frontend" => "Frontend Development".to_string(),
        "backend" => "Backend Development".to_string(),
        "database" => "Databases & CMS".to_string(),
        "tools" => "Tools & DevOps".to_string(),
        other => {
            let spaced = other.replace('_', " ");
            let mut chars = spaced.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
    }
}

fn category_tone(key: &str) -> &'static str {
    match key {
        "frontend" => "blue",
        "backend" => "green",
        "database" => "purple",
        _ => "cyan",
    }
}

#[function_component(AboutMe)]
pub fn about_me(props: &AboutMeProps) -> Html {
    let section_ref = use_node_ref();
    use_reveal(section_ref.clone(), Some(REVEAL_SELECTOR), REVEAL, REVEAL_START);

    let stats = &props.stats;
    let stat_cards = [
        (&stats.years_experience, "Years of Experience", "blue"),
        (&stats.projects_completed, "Projects", "green"),
        (&stats.technologies_mastered, "Technologies", "purple"),
        (&stats.response_time, "Response Time", "cyan"),
    ];

    html! {
        <section ref={section_ref} id="about" class="about" aria-labelledby="about-heading">
            <div class="about-layout">
                <div class={classes!(REVEAL_CLASS, "about-profile")}>
                    <div class="about-photo">
                        <img src={ABOUT_IMAGE} alt="Full stack developer portrait" />
                        <span class="about-badge" aria-hidden="true">{icons::bolt()}</span>
                    </div>
                    <h2 id="about-heading">{"Full Stack Developer"}</h2>
                    <p class="about-bio">
                        {"I build robust web solutions that solve real business problems, with experience in business management systems, high-impact landing pages and process automation."}
                    </p>
                    <dl class="stat-grid">
                        { for stat_cards.iter().map(|(value, label, tone)| html! {
                            <div class="stat-card">
                                <dt class={classes!("stat-value", format!("tone-{tone}"))}>{value.as_str()}</dt>
                                <dd class="stat-label">{*label}</dd>
                            </div>
                        }) }
                    </dl>
                </div>

                <div class={classes!(REVEAL_CLASS, "about-skills")}>
                    <h3>{"Tech Stack"}</h3>
                    { for props.skills.iter().map(|(category, skills)| html! {
                        <div class="skill-group" data-category={category.to_string()}>
                            <h4>{category_title(category)}</h4>
                            <ul class="chip-list">
                                { for skills.iter().map(|skill| html! {
                                    <li class={classes!("chip", format!("chip-{}", category_tone(category)))}>
                                        {skill.as_str()}
                                    </li>
                                }) }
                            </ul>
                        </div>
                    }) }
                </div>
            </div>
        </section>
    }
}
