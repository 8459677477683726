use unveil::{
    ContactBlurb, ExpertiseRecord, NavItem, Page, PageContent, PageEvent, PageSpec, Profile,
    ProjectRecord, RevealDirection, RevealEvent, SCROLL_SECTIONS, SectionRect, SkillRecord,
    StatRecord,
};

fn demo_spec() -> PageSpec {
    PageSpec {
        viewport_height: 900.0,
        layout: SCROLL_SECTIONS
            .iter()
            .enumerate()
            .map(|(i, s)| SectionRect {
                section: (*s).to_string(),
                top: 900.0 * i as f64,
                height: 900.0,
            })
            .collect(),
        content: PageContent {
            profile: Profile {
                name: "Sasha Lin".into(),
                tagline: "Builds fast, quiet software".into(),
                summary: "Engineer.".into(),
                resume_href: "/files/resume.pdf".into(),
            },
            nav: vec![NavItem {
                label: "About".into(),
                anchor: "about".into(),
            }],
            stats: vec![StatRecord {
                label: "Deploys".into(),
                value: 500,
                suffix: "+".into(),
            }],
            expertise: vec![ExpertiseRecord {
                area: "Systems".into(),
                description: "Engines and services".into(),
            }],
            skills: vec![SkillRecord {
                name: "Rust".into(),
                years: 6,
                category: "Languages".into(),
            }],
            projects: vec![ProjectRecord {
                title: "Telemetry pipeline".into(),
                description: "Streaming ingest".into(),
                technologies: vec!["Rust".into()],
                highlights: vec!["Fast".into()],
                featured: true,
                category: "Infrastructure".into(),
                duration: "6 months".into(),
            }],
            contact: ContactBlurb {
                heading: "Let's talk".into(),
                pitch: "Open to interesting problems".into(),
                badges: vec!["Email".into()],
            },
        },
    }
}

fn entered(events: &[PageEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            PageEvent::Reveal(RevealEvent {
                element,
                direction: RevealDirection::Enter,
                ..
            }) => Some(element.clone()),
            _ => None,
        })
        .collect()
}

fn exited(events: &[PageEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            PageEvent::Reveal(RevealEvent {
                element,
                direction: RevealDirection::Exit,
                ..
            }) => Some(element.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn about_panels_reveal_and_reverse_with_scroll() {
    let mut page = Page::new(demo_spec()).unwrap();
    page.begin(0.0).unwrap();
    page.tick(7.0);

    // Not scrolled yet: panels hold their hidden mount values.
    let before = page.stage().props("about.content").unwrap();
    assert_eq!(before.opacity, 0.0);
    assert_eq!(before.x, -50.0);

    // Scroll the about band into view; events come in registration order.
    let events = page.publish_scroll(400.0, 7.0);
    assert_eq!(entered(&events), vec!["about", "about.content", "about.portrait"]);

    page.tick(8.0);
    let content = page.stage().props("about.content").unwrap();
    assert_eq!(content.opacity, 1.0);
    assert_eq!(content.x, 0.0);
    assert_eq!(page.stage().props("about.portrait").unwrap().scale, 1.0);

    // Back above the band: the reversible pair animates out again. The
    // section fade is once-only and stays quiet.
    let events = page.publish_scroll(0.0, 8.5);
    assert_eq!(exited(&events), vec!["about.content", "about.portrait"]);
    page.tick(9.0);
    page.tick(9.5);
    let content = page.stage().props("about.content").unwrap();
    assert_eq!(content.opacity, 0.0);
    assert_eq!(content.x, -50.0);

    // Third pass: reversible entries fire again, the fade does not.
    let events = page.publish_scroll(400.0, 10.0);
    assert_eq!(entered(&events), vec!["about.content", "about.portrait"]);
}

#[test]
fn stat_counters_latch_and_keep_their_value() {
    let mut page = Page::new(demo_spec()).unwrap();
    page.begin(0.0).unwrap();
    page.tick(7.0);

    let events = page.publish_scroll(800.0, 7.0);
    let fired = entered(&events);
    assert!(fired.contains(&"about.stat.0".to_string()));
    assert!(fired.contains(&"about.stat.0.value".to_string()));

    // Tile lands fast; the counter's 0.5 s delay holds it back.
    page.tick(8.0);
    assert_eq!(page.stage().props("about.stat.0").unwrap().opacity, 1.0);
    let partial: u64 = page
        .stage()
        .text("about.stat.0.value")
        .unwrap()
        .parse()
        .unwrap();
    assert!(partial < 500);

    page.tick(10.0);
    assert_eq!(page.stage().text("about.stat.0.value"), Some("500"));

    // Leaving and re-entering replays nothing that already fired.
    page.publish_scroll(0.0, 10.5);
    page.tick(11.0);
    let events = page.publish_scroll(800.0, 11.5);
    assert!(entered(&events).iter().all(|e| !e.starts_with("about.stat")));
    page.tick(12.0);
    assert_eq!(page.stage().text("about.stat.0.value"), Some("500"));
    assert_eq!(page.stage().props("about.stat.0").unwrap().opacity, 1.0);
}

#[test]
fn a_taller_viewport_reveals_without_scrolling() {
    let mut page = Page::new(demo_spec()).unwrap();
    page.begin(0.0).unwrap();

    // At 900 px nothing below the hero is inside any region.
    let events = page.publish_scroll(0.0, 1.0);
    assert!(entered(&events).is_empty());

    // Growing the window pushes the 70% line past the about band's top.
    let events = page.publish_resize(1400.0, 1.0).unwrap();
    let fired = entered(&events);
    assert!(fired.contains(&"about.content".to_string()));
    assert!(fired.contains(&"about.portrait".to_string()));
}
