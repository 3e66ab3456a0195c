pub mod renderer;
pub mod session;
pub mod web;

pub use renderer::Renderer;
pub use web::WebDriverRenderer;
