//! View-model logic behind the landing page templates.
//!
//! These types carry no rendering contract. Templates read their state for
//! the initial render and the small client-side glue mirrors the same
//! transitions.

pub mod deck_card;
pub mod dynamic_title;
pub mod image_slider;

pub use deck_card::DeckCard;
pub use dynamic_title::DynamicTitle;
pub use image_slider::ImageSlider;
