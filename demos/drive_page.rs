use unveil::{Page, PageEvent, PageSpec};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let s = include_str!("../tests/data/portfolio.json");
    let spec: PageSpec = serde_json::from_str(s)?;

    let mut page = Page::new(spec)?;
    for event in page.begin(0.0)? {
        report(0.0, &event);
    }

    // Ten seconds at 60 fps, with one scroll down to the about band.
    for frame in 1..=600u64 {
        let t = frame as f64 / 60.0;
        if frame == 420 {
            for event in page.publish_scroll(1200.0, t) {
                report(t, &event);
            }
        }
        for event in page.tick(t) {
            report(t, &event);
        }
    }

    println!("final phase: {:?}", page.phase());
    for key in ["hero.title", "hero.typing", "about.content"] {
        if let Some(state) = page.stage().get(key) {
            println!("{key}: props {:?} text {:?}", state.props, state.text);
        }
    }
    Ok(())
}

fn report(t: f64, event: &PageEvent) {
    match event {
        PageEvent::PhaseChanged(phase) => println!("{t:>7.3}s  phase -> {phase:?}"),
        PageEvent::SequenceCompleted { name } => println!("{t:>7.3}s  completed {name}"),
        PageEvent::Reveal(reveal) => {
            println!("{t:>7.3}s  reveal {} {:?}", reveal.element, reveal.direction)
        }
    }
}
