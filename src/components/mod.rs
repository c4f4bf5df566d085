pub mod background;
pub mod copy_button;
pub mod error_banner;
pub mod footer;
pub mod objective;
pub mod results;
pub mod scene;
pub mod theme_toggle;
pub mod ui;
