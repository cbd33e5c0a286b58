pub mod app;
pub mod indicator;
pub mod theme;
pub mod timeline;
pub mod window;
