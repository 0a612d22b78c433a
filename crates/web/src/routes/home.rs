//! Landing page handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use axum::response::IntoResponse;

use crate::components::{DeckCard, DynamicTitle, ImageSlider};
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::CurrentAccount;
use crate::state::AppState;

/// Background images for the landing slider, served through the `/img`
/// proxy so only allowlisted hosts are ever referenced.
const SLIDER_IMAGES: &[&str] = &[
    "https://images.unsplash.com/photo-1519681393784-d120267933ba",
    "https://images.unsplash.com/photo-1506744038136-46273834b3fb",
    "https://images.unsplash.com/photo-1470770841072-f978cf4d019e",
];

/// One selectable deck on the landing page.
pub struct Deck {
    pub name: &'static str,
    pub tagline: &'static str,
    pub card: DeckCard,
}

/// Landing page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub current_account: Option<CurrentAccount>,
    pub title: DynamicTitle,
    pub slider: ImageSlider,
    pub decks: Vec<Deck>,
}

/// Display the landing page.
pub async fn home(
    State(state): State<AppState>,
    OptionalAuth(current_account): OptionalAuth,
) -> impl IntoResponse {
    state.analytics().record_page_view("/");

    let mut title = DynamicTitle::new("AykaSosyal", "AykaSosyal — hâlâ buradayız");
    title.mount();

    let slider = ImageSlider::new(
        SLIDER_IMAGES
            .iter()
            .map(|url| format!("/img?url={}", urlencoding::encode(url)))
            .collect(),
    );

    let decks = vec![
        Deck {
            name: "Matrix",
            tagline: "The shared deck everyone starts with",
            card: DeckCard::new(true),
        },
        Deck {
            name: "Topluluk",
            tagline: "Community picks, refreshed daily",
            card: DeckCard::new(false),
        },
        Deck {
            name: "Keşfet",
            tagline: "Discover decks from other members",
            card: DeckCard::new(false),
        },
    ];

    HomeTemplate {
        current_account,
        title,
        slider,
        decks,
    }
}
