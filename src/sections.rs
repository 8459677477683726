//! The page's authored choreography: which elements each section mounts,
//! the entrance sequences that run off the load timeline, and the reveal
//! entries that bind the rest to scroll.
//!
//! Everything here is data handed to the engine; nothing in this module
//! keeps state.

use crate::{
    contact::{CONTACT_FIELDS, ContactField},
    content::{PageContent, PageSpec, SectionRect},
    core::{ElementBounds, PropPatch},
    ease::Ease,
    error::{UnveilError, UnveilResult},
    reveal::{RevealEffect, RevealEntry},
    sequence::{SequenceSpec, StepSpec},
    tween::Repeat,
    viewport::TriggerRegion,
};

pub const SEQ_LOADER: &str = "loader";
pub const SEQ_LOADER_FADE: &str = "loader.fade";
pub const SEQ_HEADER: &str = "header";
pub const SEQ_HERO: &str = "hero";
pub const SEQ_TYPEWRITER: &str = "hero.typewriter";
pub const SEQ_FLOAT: &str = "hero.float";
pub const SEQ_MENU_OPEN: &str = "header.menu.open";
pub const SEQ_MENU_CLOSE: &str = "header.menu.close";
pub const SEQ_CONTACT_PULSE: &str = "contact.pulse";

/// Seconds per typed character of the hero tagline.
pub const TYPE_SECONDS_PER_CHAR: f64 = 0.05;

/// Off-canvas travel of the mobile menu drawer, matching its layout width.
pub const MENU_SLIDE_PX: f64 = 320.0;

/// Delays of the page-ready sequences, relative to the instant the loading
/// indicator's own sequence completes. The loader fade and the header
/// entrance overlap on purpose; the chrome slides in while the overlay is
/// still dissolving.
const LOADER_FADE_DELAY_S: f64 = 0.5;
const HEADER_DELAY_S: f64 = 0.5;
const HERO_DELAY_S: f64 = 1.0;
const TYPEWRITER_DELAY_S: f64 = 1.5;
const FLOAT_DELAY_S: f64 = 2.5;

const HERO_BUTTONS: usize = 2;
const HERO_SOCIALS: usize = 2;

/// One element a section mounts: its key, measured bounds if scroll
/// triggers watch it, seed text for text-animated elements, and the patch
/// applied at mount so load-revealed elements start hidden instead of
/// flashing in.
#[derive(Clone, Debug)]
pub struct PlannedElement {
    pub key: String,
    pub bounds: Option<ElementBounds>,
    pub text: Option<String>,
    pub initial: Option<PropPatch>,
}

impl PlannedElement {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            bounds: None,
            text: None,
            initial: None,
        }
    }

    pub fn bounds(mut self, bounds: ElementBounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn initial(mut self, patch: PropPatch) -> Self {
        self.initial = Some(patch);
        self
    }
}

/// When the page controller hands a sequence to the sequencer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LaunchSlot {
    /// The moment the page begins.
    AtBegin,
    /// When the loading indicator's sequence completes; the sequence delay
    /// is relative to that instant.
    AtPageReady,
}

#[derive(Clone, Debug, Default)]
pub struct SectionPlan {
    pub elements: Vec<PlannedElement>,
    pub sequences: Vec<(LaunchSlot, SequenceSpec)>,
    pub reveals: Vec<RevealEntry>,
}

/// Plans for every section, keyed by section name, in mount order.
pub fn page_plans(spec: &PageSpec) -> UnveilResult<Vec<(String, SectionPlan)>> {
    let content = &spec.content;
    let mut plans = Vec::new();
    plans.push(("loader".to_string(), loader_plan()));
    plans.push(("header".to_string(), header_plan(content)));
    for (name, plan) in [
        ("hero", hero_plan(content, rect(spec, "hero")?)),
        ("about", about_plan(content, rect(spec, "about")?)),
        ("skills", skills_plan(content, rect(spec, "skills")?)),
        ("projects", projects_plan(content, rect(spec, "projects")?)),
        ("contact", contact_plan(content, rect(spec, "contact")?)),
    ] {
        plans.push((name.to_string(), plan));
    }
    Ok(plans)
}

fn rect<'a>(spec: &'a PageSpec, section: &str) -> UnveilResult<&'a SectionRect> {
    spec.section_rect(section).ok_or_else(|| {
        UnveilError::validation(format!("layout is missing section '{section}'"))
    })
}

pub fn loader_plan() -> SectionPlan {
    let entrance = SequenceSpec::new(SEQ_LOADER)
        .step(
            StepSpec::tween(
                "loader.text",
                PropPatch::new().opacity(0.0).y(30.0),
                PropPatch::new().opacity(1.0).y(0.0),
                0.8,
            ),
        )
        .step(
            StepSpec::tween(
                "loader.progress",
                PropPatch::new().scale(0.0),
                PropPatch::new().scale(1.0),
                2.0,
            )
            .ease(Ease::InOutCubic)
            .offset(-0.3),
        );

    // Hold, then dissolve the overlay while the chrome comes in underneath.
    let fade = SequenceSpec::new(SEQ_LOADER_FADE)
        .delay(LOADER_FADE_DELAY_S)
        .step(
            StepSpec::tween("loader", PropPatch::new(), PropPatch::new().opacity(0.0), 0.8)
                .ease(Ease::InOutCubic),
        );

    SectionPlan {
        elements: vec![
            PlannedElement::new("loader"),
            PlannedElement::new("loader.text").initial(PropPatch::new().opacity(0.0).y(30.0)),
            PlannedElement::new("loader.progress").initial(PropPatch::new().scale(0.0)),
        ],
        sequences: vec![
            (LaunchSlot::AtBegin, entrance),
            (LaunchSlot::AtPageReady, fade),
        ],
        reveals: Vec::new(),
    }
}

pub fn header_plan(content: &PageContent) -> SectionPlan {
    let mut seq = SequenceSpec::new(SEQ_HEADER)
        .delay(HEADER_DELAY_S)
        .step(StepSpec::tween(
            "header",
            PropPatch::new().y(-100.0).opacity(0.0),
            PropPatch::new().y(0.0).opacity(1.0),
            0.8,
        ))
        .step(
            StepSpec::tween(
                "header.logo",
                PropPatch::new().x(-30.0).opacity(0.0),
                PropPatch::new().x(0.0).opacity(1.0),
                0.6,
            )
            .offset(-0.4),
        );

    let mut elements = vec![
        PlannedElement::new("header").initial(PropPatch::new().opacity(0.0).y(-100.0)),
        PlannedElement::new("header.logo").initial(PropPatch::new().opacity(0.0).x(-30.0)),
        // The drawer sits off-canvas until opened; it takes no part in the
        // entrance.
        PlannedElement::new("header.menu").initial(PropPatch::new().x(MENU_SLIDE_PX)),
    ];
    for i in 0..content.nav.len() {
        let key = format!("header.nav.{i}");
        elements.push(
            PlannedElement::new(&key).initial(PropPatch::new().opacity(0.0).y(-20.0)),
        );
        let offset = if i == 0 { -0.4 } else { stagger_offset(0.5, 0.1) };
        seq = seq.step(
            StepSpec::tween(
                key,
                PropPatch::new().y(-20.0).opacity(0.0),
                PropPatch::new().y(0.0).opacity(1.0),
                0.5,
            )
            .offset(offset),
        );
    }

    SectionPlan {
        elements,
        sequences: vec![(LaunchSlot::AtPageReady, seq)],
        reveals: Vec::new(),
    }
}

pub fn hero_plan(content: &PageContent, rect: &SectionRect) -> SectionPlan {
    let mut seq = SequenceSpec::new(SEQ_HERO)
        .delay(HERO_DELAY_S)
        .step(StepSpec::tween(
            "hero.title",
            PropPatch::new().opacity(0.0).y(50.0),
            PropPatch::new().opacity(1.0).y(0.0),
            1.0,
        ))
        .step(
            StepSpec::tween(
                "hero.subtitle",
                PropPatch::new().opacity(0.0).y(30.0),
                PropPatch::new().opacity(1.0).y(0.0),
                0.8,
            )
            .offset(-0.5),
        )
        .step(
            StepSpec::tween(
                "hero.description",
                PropPatch::new().opacity(0.0).y(30.0),
                PropPatch::new().opacity(1.0).y(0.0),
                0.8,
            )
            .offset(-0.3),
        );

    for i in 0..HERO_BUTTONS {
        let offset = if i == 0 { -0.3 } else { stagger_offset(0.6, 0.2) };
        seq = seq.step(
            StepSpec::tween(
                format!("hero.button.{i}"),
                PropPatch::new().opacity(0.0).y(20.0),
                PropPatch::new().opacity(1.0).y(0.0),
                0.6,
            )
            .offset(offset),
        );
    }
    for i in 0..HERO_SOCIALS {
        let offset = if i == 0 { -0.3 } else { stagger_offset(0.5, 0.1) };
        seq = seq.step(
            StepSpec::tween(
                format!("hero.social.{i}"),
                PropPatch::new().opacity(0.0).scale(0.0),
                PropPatch::new().opacity(1.0).scale(1.0),
                0.5,
            )
            .ease(Ease::OutBack { overshoot: 1.7 })
            .offset(offset),
        );
    }
    seq = seq.step(
        StepSpec::tween(
            "hero.cue",
            PropPatch::new().opacity(0.0).y(20.0),
            PropPatch::new().opacity(1.0).y(0.0),
            0.6,
        )
        .offset(-0.2),
    );

    let typewriter = SequenceSpec::new(SEQ_TYPEWRITER)
        .delay(TYPEWRITER_DELAY_S)
        .step(StepSpec::type_text(
            "hero.typing",
            content.profile.tagline.clone(),
            content.profile.tagline.chars().count() as f64 * TYPE_SECONDS_PER_CHAR,
        ));

    // Ambient bob on the scroll cue. Endpoints are explicit because the
    // loop starts while the cue's own entrance is still in flight; pinning
    // them keeps the bob anchored to the resting position.
    let float = SequenceSpec::new(SEQ_FLOAT).delay(FLOAT_DELAY_S).step(
        StepSpec::tween("hero.cue", PropPatch::new().y(0.0), PropPatch::new().y(10.0), 1.5)
            .ease(Ease::InOutCubic)
            .repeat(Repeat::forever().yoyo()),
    );

    let mut elements = vec![PlannedElement::new("hero")
        .bounds(rect.bounds())
        .initial(PropPatch::new().opacity(0.0).y(50.0))];
    for (key, rise) in [
        ("hero.title", 50.0),
        ("hero.subtitle", 30.0),
        ("hero.description", 30.0),
        ("hero.cue", 20.0),
    ] {
        elements.push(
            PlannedElement::new(key).initial(PropPatch::new().opacity(0.0).y(rise)),
        );
    }
    elements.push(PlannedElement::new("hero.typing").text(""));
    for i in 0..HERO_BUTTONS {
        elements.push(
            PlannedElement::new(format!("hero.button.{i}"))
                .initial(PropPatch::new().opacity(0.0).y(20.0)),
        );
    }
    for i in 0..HERO_SOCIALS {
        elements.push(
            PlannedElement::new(format!("hero.social.{i}"))
                .initial(PropPatch::new().opacity(0.0).scale(0.0)),
        );
    }

    SectionPlan {
        elements,
        sequences: vec![
            (LaunchSlot::AtPageReady, seq),
            (LaunchSlot::AtPageReady, typewriter),
            (LaunchSlot::AtPageReady, float),
        ],
        reveals: vec![section_fade("hero")],
    }
}

pub fn about_plan(content: &PageContent, rect: &SectionRect) -> SectionPlan {
    let band_region = TriggerRegion::enter_at(0.7).with_exit(0.3);
    let content_from = PropPatch::new().opacity(0.0).x(-50.0);
    let portrait_from = PropPatch::new().opacity(0.0).x(50.0).scale(0.8);

    let mut elements = vec![
        PlannedElement::new("about")
            .bounds(rect.bounds())
            .initial(PropPatch::new().opacity(0.0).y(50.0)),
        PlannedElement::new("about.content").initial(content_from),
        PlannedElement::new("about.portrait").initial(portrait_from),
        PlannedElement::new("about.stats").bounds(band(rect, 0.6, 0.3)),
    ];
    let mut reveals = vec![
        section_fade("about"),
        RevealEntry::reversible(
            "about.content",
            band_region,
            RevealEffect::Tween {
                from: content_from,
                to: PropPatch::new().opacity(1.0).x(0.0),
            },
            1.0,
        )
        .watched("about"),
        RevealEntry::reversible(
            "about.portrait",
            band_region,
            RevealEffect::Tween {
                from: portrait_from,
                to: PropPatch::new().opacity(1.0).x(0.0).scale(1.0),
            },
            1.0,
        )
        .watched("about"),
    ];

    for (i, stat) in content.stats.iter().enumerate() {
        let tile = format!("about.stat.{i}");
        let value = format!("about.stat.{i}.value");
        elements.push(
            PlannedElement::new(&tile).initial(PropPatch::new().opacity(0.0).y(30.0)),
        );
        elements.push(PlannedElement::new(&value).text("0"));
        reveals.push(
            RevealEntry::once(
                tile,
                TriggerRegion::enter_at(0.8),
                RevealEffect::Tween {
                    from: PropPatch::new().opacity(0.0).y(30.0),
                    to: PropPatch::new().opacity(1.0).y(0.0),
                },
                0.8,
            )
            .watched("about.stats")
            .delay(i as f64 * 0.1),
        );
        reveals.push(
            RevealEntry::once(
                value,
                TriggerRegion::enter_at(0.8),
                RevealEffect::Count { to: stat.value },
                2.0,
            )
            .watched("about.stats")
            .delay(0.5 + i as f64 * 0.1),
        );
    }

    SectionPlan {
        elements,
        sequences: Vec::new(),
        reveals,
    }
}

pub fn skills_plan(content: &PageContent, rect: &SectionRect) -> SectionPlan {
    let mut elements = vec![PlannedElement::new("skills")
        .bounds(rect.bounds())
        .initial(PropPatch::new().opacity(0.0).y(50.0))];
    let mut reveals = vec![section_fade("skills")];

    for i in 0..content.expertise.len() {
        let key = format!("skills.expertise.{i}");
        elements.push(
            PlannedElement::new(&key)
                .initial(PropPatch::new().opacity(0.0).y(30.0).scale(0.95)),
        );
        reveals.push(
            RevealEntry::once(
                key,
                TriggerRegion::enter_at(0.7),
                RevealEffect::Tween {
                    from: PropPatch::new().opacity(0.0).y(30.0).scale(0.95),
                    to: PropPatch::new().opacity(1.0).y(0.0).scale(1.0),
                },
                0.6,
            )
            .watched("skills")
            .delay(i as f64 * 0.1),
        );
    }

    let n = content.skills.len();
    let tilt = 15f64.to_radians();
    for i in 0..n {
        let tile = format!("skills.tile.{i}");
        elements.push(
            PlannedElement::new(&tile)
                .bounds(tile_band(rect, i, n))
                .initial(PropPatch::new().opacity(0.0).y(40.0).rotation_rad(tilt)),
        );
        elements.push(
            PlannedElement::new(format!("skills.tile.{i}.glow"))
                .initial(PropPatch::new().opacity(0.0)),
        );
        // Each tile waits for its own bounds, so a tall grid reveals row
        // by row as it scrolls in.
        reveals.push(
            RevealEntry::once(
                tile,
                TriggerRegion::enter_at(0.85),
                RevealEffect::Tween {
                    from: PropPatch::new().opacity(0.0).y(40.0).rotation_rad(tilt),
                    to: PropPatch::new().opacity(1.0).y(0.0).rotation_rad(0.0),
                },
                0.8,
            )
            .ease(Ease::OutQuart)
            .delay(i as f64 * 0.05),
        );
    }

    SectionPlan {
        elements,
        sequences: Vec::new(),
        reveals,
    }
}

pub fn projects_plan(content: &PageContent, rect: &SectionRect) -> SectionPlan {
    let mut elements = vec![PlannedElement::new("projects")
        .bounds(rect.bounds())
        .initial(PropPatch::new().opacity(0.0).y(50.0))];
    let mut reveals = vec![section_fade("projects")];

    for i in 0..content.projects.len() {
        let card = format!("projects.card.{i}");
        elements.push(
            PlannedElement::new(&card)
                .initial(PropPatch::new().opacity(0.0).y(50.0).scale(0.9)),
        );
        elements.push(PlannedElement::new(format!("projects.card.{i}.image")));
        elements.push(
            PlannedElement::new(format!("projects.card.{i}.overlay"))
                .initial(PropPatch::new().opacity(0.0)),
        );
        reveals.push(
            RevealEntry::once(
                card,
                TriggerRegion::enter_at(0.7),
                RevealEffect::Tween {
                    from: PropPatch::new().opacity(0.0).y(50.0).scale(0.9),
                    to: PropPatch::new().opacity(1.0).y(0.0).scale(1.0),
                },
                0.8,
            )
            .watched("projects")
            .delay(i as f64 * 0.2),
        );
    }

    SectionPlan {
        elements,
        sequences: Vec::new(),
        reveals,
    }
}

pub fn contact_plan(_content: &PageContent, rect: &SectionRect) -> SectionPlan {
    let info_from = PropPatch::new().opacity(0.0).x(-50.0);
    let form_from = PropPatch::new().opacity(0.0).x(50.0);

    let mut elements = vec![
        PlannedElement::new("contact")
            .bounds(rect.bounds())
            .initial(PropPatch::new().opacity(0.0).y(50.0)),
        PlannedElement::new("contact.info").initial(info_from),
        PlannedElement::new("contact.form").initial(form_from),
    ];
    for field in CONTACT_FIELDS {
        elements.push(PlannedElement::new(contact_label_key(field)));
    }

    SectionPlan {
        elements,
        sequences: Vec::new(),
        reveals: vec![
            section_fade("contact"),
            RevealEntry::once(
                "contact.info",
                TriggerRegion::enter_at(0.7),
                RevealEffect::Tween {
                    from: info_from,
                    to: PropPatch::new().opacity(1.0).x(0.0),
                },
                0.8,
            )
            .watched("contact"),
            RevealEntry::once(
                "contact.form",
                TriggerRegion::enter_at(0.7),
                RevealEffect::Tween {
                    from: form_from,
                    to: PropPatch::new().opacity(1.0).x(0.0),
                },
                0.8,
            )
            .watched("contact"),
        ],
    }
}

/// Hover lift for a project card. `entering` plays the lift; otherwise the
/// card settles back. All three tweens run in parallel.
pub fn project_card_hover(index: usize, entering: bool) -> SequenceSpec {
    let card = format!("projects.card.{index}");
    let image = format!("projects.card.{index}.image");
    let overlay = format!("projects.card.{index}.overlay");
    let (name, card_to, image_to, overlay_to) = if entering {
        (
            format!("{card}.hover"),
            PropPatch::new().y(-10.0),
            PropPatch::new().scale(1.05),
            PropPatch::new().opacity(1.0),
        )
    } else {
        (
            format!("{card}.rest"),
            PropPatch::new().y(0.0),
            PropPatch::new().scale(1.0),
            PropPatch::new().opacity(0.0),
        )
    };

    SequenceSpec::new(name)
        .step(StepSpec::tween(card, PropPatch::new(), card_to, 0.3))
        .step(StepSpec::tween(image, PropPatch::new(), image_to, 0.3).offset(-0.3))
        .step(StepSpec::tween(overlay, PropPatch::new(), overlay_to, 0.3).offset(-0.3))
}

/// Hover tilt for a skill tile plus its glow halo.
pub fn skill_tile_hover(index: usize, entering: bool) -> SequenceSpec {
    let tile = format!("skills.tile.{index}");
    let glow = format!("skills.tile.{index}.glow");
    let (name, tile_to, glow_to) = if entering {
        (
            format!("{tile}.hover"),
            PropPatch::new().y(-8.0).scale(1.05).rotation_rad(5f64.to_radians()),
            PropPatch::new().opacity(0.6).scale(1.2),
        )
    } else {
        (
            format!("{tile}.rest"),
            PropPatch::new().y(0.0).scale(1.0).rotation_rad(0.0),
            PropPatch::new().opacity(0.0).scale(1.0),
        )
    };

    SequenceSpec::new(name)
        .step(StepSpec::tween(tile, PropPatch::new(), tile_to, 0.3))
        .step(StepSpec::tween(glow, PropPatch::new(), glow_to, 0.3).offset(-0.3))
}

/// Mobile menu drawer slide. Opening pins both endpoints, so it always
/// sweeps in from fully off-canvas; closing runs from wherever the drawer
/// currently sits.
pub fn menu_slide(opening: bool) -> SequenceSpec {
    if opening {
        SequenceSpec::new(SEQ_MENU_OPEN).step(StepSpec::tween(
            "header.menu",
            PropPatch::new().x(MENU_SLIDE_PX),
            PropPatch::new().x(0.0),
            0.3,
        ))
    } else {
        SequenceSpec::new(SEQ_MENU_CLOSE).step(
            StepSpec::tween(
                "header.menu",
                PropPatch::new(),
                PropPatch::new().x(MENU_SLIDE_PX),
                0.3,
            )
            .ease(Ease::InCubic),
        )
    }
}

/// Stage key of the floating label over one form input.
pub fn contact_label_key(field: ContactField) -> String {
    format!("contact.form.label.{}", field.key())
}

/// Floating-label lift over a form input. Raised on focus; the rest
/// variant settles it back over an empty field.
pub fn contact_label_float(field: ContactField, raised: bool) -> SequenceSpec {
    let label = contact_label_key(field);
    let (name, to) = if raised {
        (
            format!("{label}.raise"),
            PropPatch::new().y(-10.0).scale(0.9),
        )
    } else {
        (format!("{label}.rest"), PropPatch::new().y(0.0).scale(1.0))
    };
    SequenceSpec::new(name).step(StepSpec::tween(label, PropPatch::new(), to, 0.3))
}

/// Quick squeeze on the contact form after a delivered submission.
pub fn contact_success_pulse() -> SequenceSpec {
    SequenceSpec::new(SEQ_CONTACT_PULSE).step(
        StepSpec::tween(
            "contact.form",
            PropPatch::new().scale(1.0),
            PropPatch::new().scale(0.95),
            0.1,
        )
        .ease(Ease::InOutCubic)
        .repeat(Repeat::times(2).yoyo()),
    )
}

fn section_fade(section: &str) -> RevealEntry {
    RevealEntry::once(
        section,
        TriggerRegion::enter_at(0.8),
        RevealEffect::Tween {
            from: PropPatch::new().opacity(0.0).y(50.0),
            to: PropPatch::new().opacity(1.0).y(0.0),
        },
        1.0,
    )
}

/// Next-step offset that places consecutive equal-length steps `gap_s`
/// apart start-to-start.
fn stagger_offset(duration_s: f64, gap_s: f64) -> f64 {
    gap_s - duration_s
}

fn band(rect: &SectionRect, start_frac: f64, height_frac: f64) -> ElementBounds {
    ElementBounds {
        top: rect.top + rect.height * start_frac,
        height: rect.height * height_frac,
    }
}

/// Tiles stack down the lower part of their section; each gets an equal
/// slice so the once-triggers fire in slab order on the way down.
fn tile_band(rect: &SectionRect, index: usize, count: usize) -> ElementBounds {
    let start = 0.35 + 0.6 * index as f64 / count as f64;
    band(rect, start, 0.6 / count as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{
        ContactBlurb, ExpertiseRecord, NavItem, PageContent, Profile, ProjectRecord, SkillRecord,
        StatRecord,
    };

    fn basic_content() -> PageContent {
        PageContent {
            profile: Profile {
                name: "Sasha Lin".into(),
                tagline: "Builds fast, quiet software".into(),
                summary: "Engineer.".into(),
                resume_href: "/files/resume.pdf".into(),
            },
            nav: (0..5)
                .map(|i| NavItem {
                    label: format!("Item {i}"),
                    anchor: format!("anchor-{i}"),
                })
                .collect(),
            stats: vec![
                StatRecord {
                    label: "Projects".into(),
                    value: 20,
                    suffix: "+".into(),
                },
                StatRecord {
                    label: "Clients".into(),
                    value: 15,
                    suffix: "+".into(),
                },
            ],
            expertise: vec![ExpertiseRecord {
                area: "Backend".into(),
                description: "Services".into(),
            }],
            skills: (0..8u32)
                .map(|i| SkillRecord {
                    name: format!("Skill {i}"),
                    years: i + 1,
                    category: "General".into(),
                })
                .collect(),
            projects: (0..3)
                .map(|i| ProjectRecord {
                    title: format!("Project {i}"),
                    description: "Things".into(),
                    technologies: vec!["Rust".into()],
                    highlights: vec!["Fast".into()],
                    featured: i == 0,
                    category: "Web".into(),
                    duration: "3 months".into(),
                })
                .collect(),
            contact: ContactBlurb {
                heading: "Let's talk".into(),
                pitch: "Open to interesting problems".into(),
                badges: vec!["Email".into()],
            },
        }
    }

    fn rect_at(section: &str, top: f64) -> SectionRect {
        SectionRect {
            section: section.into(),
            top,
            height: 900.0,
        }
    }

    #[test]
    fn every_planned_sequence_and_reveal_validates() {
        let content = basic_content();
        let plans = [
            loader_plan(),
            header_plan(&content),
            hero_plan(&content, &rect_at("hero", 0.0)),
            about_plan(&content, &rect_at("about", 900.0)),
            skills_plan(&content, &rect_at("skills", 1800.0)),
            projects_plan(&content, &rect_at("projects", 2700.0)),
            contact_plan(&content, &rect_at("contact", 3600.0)),
        ];
        for plan in plans {
            for (_, seq) in &plan.sequences {
                seq.validate().unwrap();
            }
            for entry in &plan.reveals {
                entry.validate().unwrap();
            }
        }
    }

    #[test]
    fn loader_entrance_spans_the_expected_window() {
        let plan = loader_plan();
        let (slot, seq) = &plan.sequences[0];
        assert_eq!(*slot, LaunchSlot::AtBegin);
        assert_eq!(seq.name, SEQ_LOADER);
        let starts = seq.step_starts();
        assert!((starts[0] - 0.0).abs() < 1e-9);
        assert!((starts[1] - 0.5).abs() < 1e-9);
        assert!((seq.total_duration_s().unwrap() - 2.5).abs() < 1e-9);
    }

    #[test]
    fn hero_entrance_spacing_matches_the_storyboard() {
        let content = basic_content();
        let plan = hero_plan(&content, &rect_at("hero", 0.0));
        let seq = &plan.sequences[0].1;
        assert_eq!(seq.name, SEQ_HERO);
        let starts = seq.step_starts();
        let expected = [0.0, 0.5, 1.0, 1.5, 1.7, 2.0, 2.1, 2.4];
        assert_eq!(starts.len(), expected.len());
        for (got, want) in starts.iter().zip(expected) {
            assert!((got - want).abs() < 1e-9, "got {got}, want {want}");
        }
        assert!((seq.total_duration_s().unwrap() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn typewriter_duration_tracks_tagline_length() {
        let content = basic_content();
        let plan = hero_plan(&content, &rect_at("hero", 0.0));
        let typewriter = plan
            .sequences
            .iter()
            .find(|(_, s)| s.name == SEQ_TYPEWRITER)
            .map(|(_, s)| s)
            .unwrap();
        let chars = content.profile.tagline.chars().count() as f64;
        assert!(
            (typewriter.steps[0].duration_s - chars * TYPE_SECONDS_PER_CHAR).abs() < 1e-9
        );
    }

    #[test]
    fn float_loop_never_ends() {
        let content = basic_content();
        let plan = hero_plan(&content, &rect_at("hero", 0.0));
        let float = plan
            .sequences
            .iter()
            .find(|(_, s)| s.name == SEQ_FLOAT)
            .map(|(_, s)| s)
            .unwrap();
        assert!(float.total_duration_s().is_none());
    }

    #[test]
    fn hover_sequences_run_their_tweens_in_parallel() {
        for seq in [
            project_card_hover(0, true),
            project_card_hover(0, false),
            skill_tile_hover(2, true),
            skill_tile_hover(2, false),
        ] {
            seq.validate().unwrap();
            for start in seq.step_starts() {
                assert!(start.abs() < 1e-9);
            }
        }
    }

    #[test]
    fn flourish_sequences_validate() {
        for seq in [menu_slide(true), menu_slide(false), contact_success_pulse()] {
            seq.validate().unwrap();
        }
        for field in CONTACT_FIELDS {
            contact_label_float(field, true).validate().unwrap();
            contact_label_float(field, false).validate().unwrap();
        }
    }

    #[test]
    fn menu_open_pins_its_off_canvas_start() {
        let open = menu_slide(true);
        match &open.steps[0].body {
            crate::sequence::StepBody::Tween { from, to } => {
                assert_eq!(from.x, Some(MENU_SLIDE_PX));
                assert_eq!(to.x, Some(0.0));
            }
            other => panic!("unexpected body {other:?}"),
        }
        // Closing is current-relative, so an interrupted open reverses
        // smoothly instead of snapping.
        let close = menu_slide(false);
        match &close.steps[0].body {
            crate::sequence::StepBody::Tween { from, to } => {
                assert!(from.is_empty());
                assert_eq!(to.x, Some(MENU_SLIDE_PX));
            }
            other => panic!("unexpected body {other:?}"),
        }
    }

    #[test]
    fn tile_bands_fire_in_order_down_the_section() {
        let rect = rect_at("skills", 1800.0);
        let a = tile_band(&rect, 0, 8);
        let b = tile_band(&rect, 7, 8);
        assert!(a.top < b.top);
        assert!(b.bottom() <= rect.top + rect.height + 1e-9);
    }

    #[test]
    fn page_plans_cover_every_section() {
        let spec = crate::content::PageSpec {
            viewport_height: 900.0,
            layout: vec![
                rect_at("hero", 0.0),
                rect_at("about", 900.0),
                rect_at("skills", 1800.0),
                rect_at("projects", 2700.0),
                rect_at("contact", 3600.0),
            ],
            content: basic_content(),
        };
        let plans = page_plans(&spec).unwrap();
        let names: Vec<&str> = plans.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(
            names,
            vec!["loader", "header", "hero", "about", "skills", "projects", "contact"]
        );
    }
}
