mod render;

pub use render::render_markdown;
