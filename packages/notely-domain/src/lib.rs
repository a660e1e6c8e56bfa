//! Rules shared by every storage backend and transport: how notes are normalized and validated,
//! how the list view filters and orders them, and how rich documents render to HTML.

pub mod category;
pub mod filter;
pub mod note;
pub mod palette;
pub mod rich_text;
pub mod theme;
