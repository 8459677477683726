use std::collections::BTreeMap;

use crate::core::{ElementBounds, PropPatch, VisualProps};

/// One mounted element: its animated props plus the layout facts the host
/// reported for it.
#[derive(Clone, Debug, Default)]
pub struct ElementState {
    pub props: VisualProps,
    /// Current display text, for elements whose text is animated (counters,
    /// typewriter targets). `None` for purely visual elements.
    pub text: Option<String>,
    /// Page-space extent measured by the host after layout. Scroll triggers
    /// cannot watch an element until this is set.
    pub bounds: Option<ElementBounds>,
}

/// Registry of everything currently mounted on the page, keyed by stable
/// dotted element keys like `"hero.title"`.
///
/// All animation writes land here; the host reads the map back each frame
/// and draws however it likes. Writes against unmounted keys are dropped,
/// never errors, so late cancellation and teardown stay cheap.
#[derive(Clone, Debug, Default)]
pub struct Stage {
    elements: BTreeMap<String, ElementState>,
}

impl Stage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mounts `key` with default state, or returns the live state if the
    /// key is already mounted.
    pub fn mount(&mut self, key: impl Into<String>) -> &mut ElementState {
        self.elements.entry(key.into()).or_default()
    }

    pub fn unmount(&mut self, key: &str) -> bool {
        self.elements.remove(key).is_some()
    }

    /// Unmounts `prefix` itself plus every `"{prefix}."` descendant.
    /// Returns how many elements were removed.
    pub fn unmount_prefix(&mut self, prefix: &str) -> usize {
        let before = self.elements.len();
        self.elements
            .retain(|key, _| key != prefix && !is_descendant(key, prefix));
        before - self.elements.len()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.elements.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&ElementState> {
        self.elements.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut ElementState> {
        self.elements.get_mut(key)
    }

    pub fn props(&self, key: &str) -> Option<VisualProps> {
        self.elements.get(key).map(|e| e.props)
    }

    pub fn bounds(&self, key: &str) -> Option<ElementBounds> {
        self.elements.get(key).and_then(|e| e.bounds)
    }

    pub fn set_bounds(&mut self, key: &str, bounds: ElementBounds) -> bool {
        match self.elements.get_mut(key) {
            Some(e) => {
                e.bounds = Some(bounds);
                true
            }
            None => false,
        }
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.elements.get(key).and_then(|e| e.text.as_deref())
    }

    pub fn set_text(&mut self, key: &str, text: impl Into<String>) -> bool {
        match self.elements.get_mut(key) {
            Some(e) => {
                e.text = Some(text.into());
                true
            }
            None => false,
        }
    }

    /// Overwrites the patched fields of `key`'s props. Returns false if the
    /// key is not mounted.
    pub fn apply_patch(&mut self, key: &str, patch: &PropPatch) -> bool {
        match self.elements.get_mut(key) {
            Some(e) => {
                patch.apply_to(&mut e.props);
                true
            }
            None => false,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.elements.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

fn is_descendant(key: &str, prefix: &str) -> bool {
    key.len() > prefix.len() && key.starts_with(prefix) && key.as_bytes()[prefix.len()] == b'.'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mount_is_idempotent() {
        let mut stage = Stage::new();
        stage.mount("hero.title").props.opacity = 0.0;
        // Second mount returns the live state, not a reset one.
        assert_eq!(stage.mount("hero.title").props.opacity, 0.0);
        assert_eq!(stage.len(), 1);
    }

    #[test]
    fn unmount_prefix_takes_the_subtree_only() {
        let mut stage = Stage::new();
        stage.mount("about");
        stage.mount("about.portrait");
        stage.mount("about.stat.0");
        stage.mount("aboutish");

        let removed = stage.unmount_prefix("about");
        assert_eq!(removed, 3);
        assert!(stage.contains("aboutish"));
        assert!(!stage.contains("about.stat.0"));
    }

    #[test]
    fn writes_against_missing_keys_are_dropped() {
        let mut stage = Stage::new();
        assert!(!stage.apply_patch("ghost", &PropPatch::new().opacity(0.5)));
        assert!(!stage.set_text("ghost", "1"));
        assert!(
            !stage.set_bounds("ghost", ElementBounds::new(0.0, 10.0).unwrap())
        );
        assert!(stage.props("ghost").is_none());
    }

    #[test]
    fn patch_and_text_land_on_mounted_elements() {
        let mut stage = Stage::new();
        stage.mount("about.stat.0.value");
        assert!(stage.apply_patch("about.stat.0.value", &PropPatch::new().opacity(0.25)));
        assert!(stage.set_text("about.stat.0.value", "17"));
        assert_eq!(stage.props("about.stat.0.value").map(|p| p.opacity), Some(0.25));
        assert_eq!(stage.text("about.stat.0.value"), Some("17"));
    }
}
