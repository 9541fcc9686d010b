pub mod export;
pub mod loader;
pub mod navigator;
pub mod svg;
pub mod tracker;
pub mod views;
