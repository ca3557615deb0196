pub mod color;
pub mod token;

pub use color::Color;
pub use token::Token;
