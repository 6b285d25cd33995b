pub mod geometry;
pub mod gradient;
pub mod line_buffer;
pub mod pixel;
pub mod stream_adapter;
pub mod window;
pub mod window_engine;
