//! Wrapping image carousel for the landing page.

/// Ordered list of image URLs with a cursor that wraps in both directions.
#[derive(Debug, Clone)]
pub struct ImageSlider {
    images: Vec<String>,
    index: usize,
}

impl ImageSlider {
    /// Create a slider over the given images, starting at the first.
    #[must_use]
    pub const fn new(images: Vec<String>) -> Self {
        Self { images, index: 0 }
    }

    /// The image under the cursor, if any.
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.images.get(self.index).map(String::as_str)
    }

    /// Move the cursor forward, wrapping past the last image.
    pub fn advance(&mut self) {
        if !self.images.is_empty() {
            self.index = (self.index + 1) % self.images.len();
        }
    }

    /// Move the cursor backward, wrapping past the first image.
    pub fn rewind(&mut self) {
        if !self.images.is_empty() {
            self.index = self
                .index
                .checked_sub(1)
                .unwrap_or(self.images.len() - 1);
        }
    }

    /// All images in display order.
    #[must_use]
    pub fn images(&self) -> &[String] {
        &self.images
    }

    /// Number of images in the slider.
    #[must_use]
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Whether the slider holds no images.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slider() -> ImageSlider {
        ImageSlider::new(vec![
            "one.jpg".to_string(),
            "two.jpg".to_string(),
            "three.jpg".to_string(),
        ])
    }

    #[test]
    fn test_starts_at_first_image() {
        assert_eq!(slider().current(), Some("one.jpg"));
    }

    #[test]
    fn test_advance_moves_forward() {
        let mut s = slider();
        s.advance();
        assert_eq!(s.current(), Some("two.jpg"));
    }

    #[test]
    fn test_advance_wraps_past_last() {
        let mut s = slider();
        s.advance();
        s.advance();
        s.advance();
        assert_eq!(s.current(), Some("one.jpg"));
    }

    #[test]
    fn test_rewind_wraps_past_first() {
        let mut s = slider();
        s.rewind();
        assert_eq!(s.current(), Some("three.jpg"));
    }

    #[test]
    fn test_rewind_undoes_advance() {
        let mut s = slider();
        s.advance();
        s.rewind();
        assert_eq!(s.current(), Some("one.jpg"));
    }

    #[test]
    fn test_empty_slider_stays_empty() {
        let mut s = ImageSlider::new(Vec::new());
        assert_eq!(s.current(), None);
        s.advance();
        s.rewind();
        assert_eq!(s.current(), None);
        assert!(s.is_empty());
    }
}
