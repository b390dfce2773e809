mod errors;
mod types;
mod validator;

pub use errors::OriginError;
pub use types::{Origin, OriginMatching};
pub use validator::{OriginMatcher, OriginValidator, ServerOrigins};
