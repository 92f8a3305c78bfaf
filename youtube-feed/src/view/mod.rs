//! Headless view models for a video grid.
//!
//! Nothing here draws anything. These types hold the decisions a grid UI has to make
//! (how many columns, when to load more, what to show while loading, when a hover
//! preview appears) so that any front-end, including the bundled CLI, can share them.

mod card;
mod grid;

pub use card::{Card, HoverPreview, Selection};
pub use grid::{CARD_SPACING, GridItem, GridModel, GridStatus, column_count, item_width};
