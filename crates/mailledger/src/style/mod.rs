//! Styling and theming for the application.

mod theme;
pub mod widgets;

// Theme will be used when we integrate custom styling
#[allow(unused_imports)]
pub use theme::Theme;
