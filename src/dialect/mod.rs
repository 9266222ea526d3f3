pub mod cmx340;
pub mod cmx3600;
pub mod config;
pub mod gvg;
pub mod openshot;
pub mod render;
pub mod grammar;
