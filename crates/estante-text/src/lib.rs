pub mod extract;
pub mod normalize;
pub mod token;

pub use extract::extract;
pub use token::TypedToken;
