//! The PDF value model: the closed set of object shapes the writer emits.

mod dictionary;
mod name;
mod primitive;
mod stream;

pub use dictionary::Dictionary;
pub use name::Name;
pub use primitive::{IndirectObject, Object, ObjectId};
pub use stream::{Filter, Stream};

/// The reference type used throughout the public API.
pub type Reference = ObjectId;
