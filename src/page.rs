use std::collections::BTreeMap;

use crate::{
    contact::{ContactField, ContactForm, MessageDelivery, SubmitStatus},
    content::PageSpec,
    core::{ElementBounds, Viewport},
    error::{UnveilError, UnveilResult},
    reveal::{RevealEvent, RevealToken, Revealer},
    sections::{self, LaunchSlot, SEQ_HERO, SEQ_LOADER, SEQ_LOADER_FADE},
    sequence::{SequenceEvent, SequenceHandle, SequenceSpec, Sequencer},
    stage::Stage,
};

/// Where the page sits in its entrance arc. Phases only ever move forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum PagePhase {
    /// Loading indicator playing; content sections sit hidden.
    Loading,
    /// Indicator finished; chrome (header, then hero) is coming in while
    /// the overlay dissolves.
    RevealingChrome,
    /// The hero entrance has started.
    RevealingContent,
    /// Every finite load sequence has completed. Ambient loops keep
    /// running; scroll reveals stay live.
    Idle,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub enum PageEvent {
    PhaseChanged(PagePhase),
    SequenceCompleted { name: String },
    Reveal(RevealEvent),
}

/// Owns the whole choreography for one page: the stage, the sequencer, the
/// revealer, and the contact form, glued together by the load-phase state
/// machine.
///
/// Single-threaded by construction. The host drives it with `tick` once per
/// frame and `publish_scroll`/`publish_resize` per viewport change; nothing
/// here blocks or spawns.
pub struct Page {
    spec: PageSpec,
    stage: Stage,
    sequencer: Sequencer,
    revealer: Revealer,
    contact: ContactForm,
    viewport: Viewport,
    phase: PagePhase,
    begun: bool,
    ready_at_s: Option<f64>,
    hero_starts_at_s: Option<f64>,
    pending_ready: Vec<(String, SequenceSpec)>,
    load_handles: Vec<SequenceHandle>,
    section_sequences: BTreeMap<String, Vec<SequenceHandle>>,
    section_reveals: BTreeMap<String, Vec<RevealToken>>,
}

impl Page {
    pub fn new(spec: PageSpec) -> UnveilResult<Self> {
        spec.validate()?;
        let viewport = Viewport::new(0.0, spec.viewport_height)?;
        Ok(Self {
            spec,
            stage: Stage::new(),
            sequencer: Sequencer::new(),
            revealer: Revealer::new(),
            contact: ContactForm::new(),
            viewport,
            phase: PagePhase::Loading,
            begun: false,
            ready_at_s: None,
            hero_starts_at_s: None,
            pending_ready: Vec::new(),
            load_handles: Vec::new(),
            section_sequences: BTreeMap::new(),
            section_reveals: BTreeMap::new(),
        })
    }

    /// Mounts every section, kicks off the loading indicator, and runs the
    /// first trigger evaluation. Returns the reveals that fire immediately
    /// (the hero sits in view at scroll 0). A page begins once.
    #[tracing::instrument(skip(self))]
    pub fn begin(&mut self, now_s: f64) -> UnveilResult<Vec<PageEvent>> {
        if self.begun {
            return Err(UnveilError::validation("page already begun"));
        }
        let plans = sections::page_plans(&self.spec)?;
        for (section, plan) in plans {
            for planned in &plan.elements {
                let state = self.stage.mount(&planned.key);
                if let Some(patch) = &planned.initial {
                    patch.apply_to(&mut state.props);
                }
                if let Some(text) = &planned.text {
                    state.text = Some(text.clone());
                }
                if let Some(bounds) = planned.bounds {
                    state.bounds = Some(bounds);
                }
            }
            for entry in plan.reveals {
                let token = self.revealer.register(entry)?;
                self.section_reveals
                    .entry(section.clone())
                    .or_default()
                    .push(token);
            }
            for (slot, seq) in plan.sequences {
                match slot {
                    LaunchSlot::AtBegin => {
                        let finite = seq.total_duration_s().is_some();
                        let handle = self.sequencer.schedule(seq, now_s)?;
                        if finite {
                            self.load_handles.push(handle);
                        }
                        self.track_sequence(&section, handle);
                    }
                    LaunchSlot::AtPageReady => {
                        seq.validate()?;
                        self.pending_ready.push((section.clone(), seq));
                    }
                }
            }
        }
        self.begun = true;
        tracing::debug!(elements = self.stage.len(), "page began");

        let mut events = Vec::new();
        self.publish(now_s, &mut events);
        Ok(events)
    }

    /// Advances all animation to `now_s`. Call once per frame with a
    /// monotonically non-decreasing clock.
    pub fn tick(&mut self, now_s: f64) -> Vec<PageEvent> {
        let mut events = Vec::new();
        if !self.begun {
            return events;
        }

        for completion in self.sequencer.advance(&mut self.stage, now_s) {
            let SequenceEvent::Completed { handle, name } = completion;
            self.load_handles.retain(|h| *h != handle);
            if name == SEQ_LOADER && self.ready_at_s.is_none() {
                // Page-ready instant: the chrome timeline hangs off it.
                self.ready_at_s = Some(now_s);
                self.launch_ready(now_s);
            }
            if name == SEQ_LOADER_FADE {
                self.stage.unmount_prefix("loader");
            }
            events.push(PageEvent::SequenceCompleted { name });
        }

        if self.phase == PagePhase::Loading && self.ready_at_s.is_some() {
            self.set_phase(PagePhase::RevealingChrome, &mut events);
        }
        if self.phase == PagePhase::RevealingChrome {
            if let Some(at) = self.hero_starts_at_s {
                if now_s >= at {
                    self.set_phase(PagePhase::RevealingContent, &mut events);
                }
            }
        }
        if self.phase == PagePhase::RevealingContent && self.load_handles.is_empty() {
            self.set_phase(PagePhase::Idle, &mut events);
        }

        self.revealer.advance(&mut self.stage, now_s);
        self.contact.tick(now_s);
        events
    }

    /// Publishes a new scroll position and evaluates every trigger against
    /// it. Negative positions clamp to 0 (rubber-band overscroll);
    /// non-finite ones are dropped.
    pub fn publish_scroll(&mut self, scroll_top: f64, now_s: f64) -> Vec<PageEvent> {
        let mut events = Vec::new();
        if !scroll_top.is_finite() {
            tracing::debug!(scroll_top, "ignoring non-finite scroll position");
            return events;
        }
        self.viewport.scroll_top = scroll_top.max(0.0);
        self.publish(now_s, &mut events);
        events
    }

    /// Publishes a new viewport height, then re-evaluates triggers; a
    /// resize can move elements across thresholds just like a scroll.
    pub fn publish_resize(&mut self, height: f64, now_s: f64) -> UnveilResult<Vec<PageEvent>> {
        self.viewport = Viewport::new(self.viewport.scroll_top, height)?;
        let mut events = Vec::new();
        self.publish(now_s, &mut events);
        Ok(events)
    }

    /// Pointer entered a hoverable element. Unknown keys are ignored.
    pub fn pointer_enter(&mut self, element: &str, now_s: f64) {
        self.hover(element, true, now_s);
    }

    /// Pointer left a hoverable element; plays the settle-back.
    pub fn pointer_leave(&mut self, element: &str, now_s: f64) {
        self.hover(element, false, now_s);
    }

    /// Slides the mobile menu drawer in. Opening always starts from the
    /// fully off-canvas position, even over an unfinished close.
    pub fn menu_open(&mut self, now_s: f64) {
        self.menu_slide(true, now_s);
    }

    /// Slides the drawer back out, from wherever it currently sits. Also
    /// the call to make when a nav link is picked while the menu is open.
    pub fn menu_close(&mut self, now_s: f64) {
        self.menu_slide(false, now_s);
    }

    /// A form input gained focus; its floating label lifts out of the way.
    pub fn focus_field(&mut self, field: ContactField, now_s: f64) {
        self.label_float(field, true, now_s);
    }

    /// A form input lost focus. The label settles back only while the
    /// field is empty; a filled field keeps it raised.
    pub fn blur_field(&mut self, field: ContactField, now_s: f64) {
        if self.contact.fields.value(field).is_empty() {
            self.label_float(field, false, now_s);
        }
    }

    /// Runs a contact submission through `delivery`. A delivered message
    /// plays the success pulse on the form.
    pub fn submit_contact(
        &mut self,
        delivery: &mut dyn MessageDelivery,
        now_s: f64,
    ) -> UnveilResult<SubmitStatus> {
        let status = self.contact.submit_via(delivery, now_s)?;
        if status == SubmitStatus::Sent {
            self.schedule_extra("contact", sections::contact_success_pulse(), now_s);
        }
        Ok(status)
    }

    /// Tears one section down: cancels its sequences, unregisters its
    /// reveals, and unmounts its elements. Safe mid-flight.
    pub fn unmount_section(&mut self, section: &str) {
        if let Some(handles) = self.section_sequences.remove(section) {
            for handle in handles {
                self.sequencer.cancel(handle);
                self.load_handles.retain(|h| *h != handle);
            }
        }
        if let Some(tokens) = self.section_reveals.remove(section) {
            for token in tokens {
                self.revealer.unregister(token);
            }
        }
        self.pending_ready.retain(|(s, _)| s != section);
        let removed = self.stage.unmount_prefix(section);
        tracing::debug!(section, removed, "section unmounted");
    }

    /// Updated layout measurement for one element, typically after a
    /// resize reflow.
    pub fn set_element_bounds(&mut self, key: &str, bounds: ElementBounds) -> bool {
        self.stage.set_bounds(key, bounds)
    }

    pub fn phase(&self) -> PagePhase {
        self.phase
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn contact(&self) -> &ContactForm {
        &self.contact
    }

    pub fn contact_mut(&mut self) -> &mut ContactForm {
        &mut self.contact
    }

    /// Where the resume download points. The engine carries this opaquely;
    /// the host starts the actual transfer.
    pub fn resume_href(&self) -> &str {
        &self.spec.content.profile.resume_href
    }

    fn publish(&mut self, now_s: f64, events: &mut Vec<PageEvent>) {
        for reveal in self.revealer.publish(self.viewport, now_s, &self.stage) {
            events.push(PageEvent::Reveal(reveal));
        }
    }

    fn launch_ready(&mut self, now_s: f64) {
        let hero_delay = self
            .pending_ready
            .iter()
            .find(|(_, s)| s.name == SEQ_HERO)
            .map(|(_, s)| s.delay_s)
            // No hero waiting (unmounted mid-load): the content gate opens
            // at the ready instant so the phase walk still completes.
            .unwrap_or(0.0);
        self.hero_starts_at_s = Some(now_s + hero_delay);
        let pending = std::mem::take(&mut self.pending_ready);
        for (section, seq) in pending {
            let finite = seq.total_duration_s().is_some();
            match self.sequencer.schedule(seq, now_s) {
                Ok(handle) => {
                    if finite {
                        self.load_handles.push(handle);
                    }
                    self.track_sequence(&section, handle);
                }
                // Validated at begin; only a broken clock gets here.
                Err(err) => tracing::debug!(error = %err, "dropping page-ready sequence"),
            }
        }
    }

    fn hover(&mut self, element: &str, entering: bool, now_s: f64) {
        if !self.begun || !self.stage.contains(element) {
            return;
        }
        let spec = if let Some(rest) = element.strip_prefix("projects.card.") {
            rest.parse::<usize>()
                .ok()
                .map(|i| ("projects", sections::project_card_hover(i, entering)))
        } else if let Some(rest) = element.strip_prefix("skills.tile.") {
            rest.parse::<usize>()
                .ok()
                .map(|i| ("skills", sections::skill_tile_hover(i, entering)))
        } else {
            None
        };
        if let Some((section, seq)) = spec {
            self.schedule_extra(section, seq, now_s);
        }
    }

    fn menu_slide(&mut self, opening: bool, now_s: f64) {
        if !self.begun || !self.stage.contains("header.menu") {
            return;
        }
        self.schedule_extra("header", sections::menu_slide(opening), now_s);
    }

    fn label_float(&mut self, field: ContactField, raised: bool, now_s: f64) {
        if !self.begun || !self.stage.contains(&sections::contact_label_key(field)) {
            return;
        }
        self.schedule_extra("contact", sections::contact_label_float(field, raised), now_s);
    }

    fn schedule_extra(&mut self, section: &str, seq: SequenceSpec, now_s: f64) {
        match self.sequencer.schedule(seq, now_s) {
            Ok(handle) => self.track_sequence(section, handle),
            Err(err) => tracing::debug!(error = %err, "dropping sequence"),
        }
    }

    fn track_sequence(&mut self, section: &str, handle: SequenceHandle) {
        self.section_sequences
            .entry(section.to_string())
            .or_default()
            .push(handle);
    }

    fn set_phase(&mut self, phase: PagePhase, events: &mut Vec<PageEvent>) {
        if self.phase != phase {
            self.phase = phase;
            tracing::debug!(?phase, "page phase changed");
            events.push(PageEvent::PhaseChanged(phase));
        }
    }
}
