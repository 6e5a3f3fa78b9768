//! Everything between a dropped/picked path and a playable `Track`:
//! path collection, validation and playable-URL issuing.

mod collect;
mod display;
mod model;
mod url;
mod validate;

pub use collect::{collect, parse_dropped};
pub use model::{FileCandidate, Track};
pub use url::UrlRegistry;
pub use validate::Validator;
