//! Selectable card in the landing page deck.

/// One card in the deck. Selection drives the rendered class list; a
/// registered callback fires on click.
pub struct DeckCard {
    is_selected: bool,
    on_click: Option<Box<dyn FnMut() + Send>>,
}

impl DeckCard {
    /// Create a new card.
    #[must_use]
    pub const fn new(is_selected: bool) -> Self {
        Self {
            is_selected,
            on_click: None,
        }
    }

    /// Whether the card is currently selected.
    #[must_use]
    pub const fn is_selected(&self) -> bool {
        self.is_selected
    }

    /// Change the selection state.
    pub fn set_selected(&mut self, selected: bool) {
        self.is_selected = selected;
    }

    /// The class list to render for the card element.
    #[must_use]
    pub const fn class_list(&self) -> &'static str {
        if self.is_selected {
            "deck-card selected"
        } else {
            "deck-card"
        }
    }

    /// Register the click callback, replacing any previous one.
    pub fn on_click<F>(&mut self, callback: F)
    where
        F: FnMut() + Send + 'static,
    {
        self.on_click = Some(Box::new(callback));
    }

    /// Handle a click: invokes the registered callback exactly once.
    pub fn click(&mut self) {
        if let Some(callback) = self.on_click.as_mut() {
            callback();
        }
    }
}

impl std::fmt::Debug for DeckCard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeckCard")
            .field("is_selected", &self.is_selected)
            .field("on_click", &self.on_click.is_some())
            .finish()
    }
}
