//! Unveil is a deterministic choreography engine for page entrances and
//! scroll-driven reveals.
//!
//! It owns the timing model of a single page: the load-time entrance
//! timeline, scroll-position triggers, property tweens, animated counters,
//! and a typewriter, all evaluated headlessly. The host owns the clock, the
//! scroll position, and the drawing; Unveil turns those inputs into element
//! properties and events.
//!
//! The driving loop is small:
//!
//! - Build a [`Page`] from a validated [`PageSpec`]
//! - Call [`Page::begin`] once, then [`Page::tick`] every frame
//! - Feed scroll and resize through [`Page::publish_scroll`] and
//!   [`Page::publish_resize`]
//! - Read element properties back from [`Page::stage`] and draw them
//!
//! Key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: the same spec and the same input timeline produce
//!   the same stage states and events, exactly.
//! - **No IO, no threads, no clock**: time arrives as `f64` seconds from
//!   the host; nothing here sleeps or spawns.
#![forbid(unsafe_code)]

pub mod contact;
pub mod content;
pub mod core;
pub mod ease;
pub mod error;
pub mod page;
pub mod reveal;
pub mod sections;
pub mod sequence;
pub mod stage;
pub mod tween;
pub mod viewport;

pub use contact::{
    ContactField, ContactFields, ContactForm, ContactMessage, DeliveryOutcome, MessageDelivery,
    SubmitStatus,
};
pub use content::{
    ContactBlurb, ExpertiseRecord, NavItem, PageContent, PageSpec, Profile, ProjectRecord,
    SCROLL_SECTIONS, SectionRect, SkillRecord, StatRecord,
};
pub use self::core::{ElementBounds, PropPatch, Viewport, VisualProps};
pub use ease::Ease;
pub use error::{UnveilError, UnveilResult};
pub use page::{Page, PageEvent, PagePhase};
pub use reveal::{RevealDirection, RevealEffect, RevealEntry, RevealEvent, RevealMode, Revealer};
pub use sequence::{SequenceEvent, SequenceHandle, SequenceSpec, Sequencer, StepSpec};
pub use stage::Stage;
pub use tween::{Lerp, PropTween, Repeat};
pub use viewport::TriggerRegion;
