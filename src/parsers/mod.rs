pub mod html;
pub mod text;


pub use html::parse;
