use crate::{
    core::ElementBounds,
    error::{UnveilError, UnveilResult},
};

/// The scrollable sections every page carries, in page order. The loading
/// overlay and the fixed header sit outside the scroll flow and have no
/// layout rectangle.
pub const SCROLL_SECTIONS: [&str; 5] = ["hero", "about", "skills", "projects", "contact"];

/// Page-space rectangle one section occupies, as measured by the host.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SectionRect {
    pub section: String,
    pub top: f64,
    pub height: f64,
}

impl SectionRect {
    pub fn bounds(&self) -> ElementBounds {
        ElementBounds {
            top: self.top,
            height: self.height,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Profile {
    pub name: String,
    /// Typed out character by character under the hero title.
    pub tagline: String,
    pub summary: String,
    /// Carried opaquely; the host starts the actual download.
    pub resume_href: String,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NavItem {
    pub label: String,
    pub anchor: String,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StatRecord {
    pub label: String,
    /// Counter target; the reveal counts the display up to exactly this.
    pub value: u64,
    pub suffix: String,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ExpertiseRecord {
    pub area: String,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SkillRecord {
    pub name: String,
    pub years: u32,
    pub category: String,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ProjectRecord {
    pub title: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub highlights: Vec<String>,
    pub featured: bool,
    pub category: String,
    pub duration: String,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ContactBlurb {
    pub heading: String,
    pub pitch: String,
    pub badges: Vec<String>,
}

/// Everything the page displays. The engine treats the fields as opaque
/// records; only list lengths, the tagline, and the stat values feed the
/// choreography.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PageContent {
    pub profile: Profile,
    pub nav: Vec<NavItem>,
    pub stats: Vec<StatRecord>,
    pub expertise: Vec<ExpertiseRecord>,
    pub skills: Vec<SkillRecord>,
    pub projects: Vec<ProjectRecord>,
    pub contact: ContactBlurb,
}

/// The whole configuration surface: measured geometry plus content.
/// Loaded from JSON and validated before a [`crate::page::Page`] is built.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PageSpec {
    pub viewport_height: f64,
    pub layout: Vec<SectionRect>,
    pub content: PageContent,
}

impl PageSpec {
    pub fn section_rect(&self, section: &str) -> Option<&SectionRect> {
        self.layout.iter().find(|r| r.section == section)
    }

    pub fn validate(&self) -> UnveilResult<()> {
        if !(self.viewport_height.is_finite() && self.viewport_height > 0.0) {
            return Err(UnveilError::validation("viewport_height must be > 0"));
        }

        for rect in &self.layout {
            if !SCROLL_SECTIONS.contains(&rect.section.as_str()) {
                return Err(UnveilError::validation(format!(
                    "layout names unknown section '{}'",
                    rect.section
                )));
            }
            if !(rect.top.is_finite() && rect.top >= 0.0) {
                return Err(UnveilError::validation(format!(
                    "section '{}' top must be >= 0",
                    rect.section
                )));
            }
            if !(rect.height.is_finite() && rect.height > 0.0) {
                return Err(UnveilError::validation(format!(
                    "section '{}' height must be > 0",
                    rect.section
                )));
            }
        }
        for section in SCROLL_SECTIONS {
            let count = self.layout.iter().filter(|r| r.section == section).count();
            if count == 0 {
                return Err(UnveilError::validation(format!(
                    "layout is missing section '{section}'"
                )));
            }
            if count > 1 {
                return Err(UnveilError::validation(format!(
                    "layout repeats section '{section}'"
                )));
            }
        }

        let c = &self.content;
        if c.profile.name.trim().is_empty() {
            return Err(UnveilError::validation("profile name must be non-empty"));
        }
        if c.profile.tagline.trim().is_empty() {
            return Err(UnveilError::validation("profile tagline must be non-empty"));
        }
        let lists = [
            ("nav", c.nav.len()),
            ("stats", c.stats.len()),
            ("expertise", c.expertise.len()),
            ("skills", c.skills.len()),
            ("projects", c.projects.len()),
        ];
        for (name, len) in lists {
            if len == 0 {
                return Err(UnveilError::validation(format!(
                    "content list '{name}' must not be empty"
                )));
            }
        }
        for project in &c.projects {
            if project.title.trim().is_empty() {
                return Err(UnveilError::validation("project title must be non-empty"));
            }
        }
        Ok(())
    }
}
