//! Tab title that reacts to page visibility.

/// Swaps the document title between an active and an inactive variant as
/// the page gains and loses visibility.
///
/// Events are only honored between `mount()` and `unmount()`; after
/// unmounting the exposed title is frozen.
#[derive(Debug, Clone)]
pub struct DynamicTitle {
    active_title: String,
    inactive_title: String,
    mounted: bool,
    hidden: bool,
}

impl DynamicTitle {
    /// Create a new title pair. Starts unmounted and visible.
    #[must_use]
    pub fn new(active_title: impl Into<String>, inactive_title: impl Into<String>) -> Self {
        Self {
            active_title: active_title.into(),
            inactive_title: inactive_title.into(),
            mounted: false,
            hidden: false,
        }
    }

    /// Mount the component. The active title is shown.
    pub fn mount(&mut self) {
        self.mounted = true;
        self.hidden = false;
    }

    /// Unmount the component. Subsequent visibility events are ignored.
    pub fn unmount(&mut self) {
        self.mounted = false;
    }

    /// Handle a visibility change event. Ignored unless mounted.
    pub fn visibility_changed(&mut self, hidden: bool) {
        if self.mounted {
            self.hidden = hidden;
        }
    }

    /// The title currently exposed to the document.
    #[must_use]
    pub fn title(&self) -> &str {
        if self.hidden {
            &self.inactive_title
        } else {
            &self.active_title
        }
    }

    /// The title shown while the page is visible.
    #[must_use]
    pub fn active_title(&self) -> &str {
        &self.active_title
    }

    /// The title shown while the page is hidden.
    #[must_use]
    pub fn inactive_title(&self) -> &str {
        &self.inactive_title
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mount_shows_active_title() {
        let mut title = DynamicTitle::new("A", "B");
        title.mount();
        assert_eq!(title.title(), "A");
    }

    #[test]
    fn test_hidden_swaps_to_inactive_title() {
        let mut title = DynamicTitle::new("A", "B");
        title.mount();
        title.visibility_changed(true);
        assert_eq!(title.title(), "B");
    }

    #[test]
    fn test_restored_swaps_back_to_active_title() {
        let mut title = DynamicTitle::new("A", "B");
        title.mount();
        title.visibility_changed(true);
        title.visibility_changed(false);
        assert_eq!(title.title(), "A");
    }

    #[test]
    fn test_events_after_unmount_are_ignored() {
        let mut title = DynamicTitle::new("A", "B");
        title.mount();
        title.unmount();
        title.visibility_changed(true);
        assert_eq!(title.title(), "A");
    }

    #[test]
    fn test_events_before_mount_are_ignored() {
        let mut title = DynamicTitle::new("A", "B");
        title.visibility_changed(true);
        assert_eq!(title.title(), "A");
    }

    #[test]
    fn test_unmount_freezes_inactive_title() {
        let mut title = DynamicTitle::new("A", "B");
        title.mount();
        title.visibility_changed(true);
        title.unmount();
        title.visibility_changed(false);
        assert_eq!(title.title(), "B");
    }
}
