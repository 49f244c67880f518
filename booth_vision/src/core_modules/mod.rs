pub mod canvas;
pub mod channel_splitter;
pub mod color_converter;
pub mod face_region;
pub mod geometric_filter;
pub mod grid_layout;
pub mod pixel;
pub mod pixel_buffer;
pub mod render;
pub mod threshold;
pub mod tile;
pub mod utils;
