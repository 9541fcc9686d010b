pub mod commands;
pub mod deck;
pub mod theme;
pub mod types;

pub use commands::{RenderCommand, RevealStage, TextAlign};
pub use deck::{Deck, DeckMeta, LayoutTag, Panel, Slide, SlideBody};
pub use theme::ThemeToken;
pub use types::{Color, Point, Rect, Viewport};
