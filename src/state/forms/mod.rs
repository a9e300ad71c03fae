//! Dynamic form engine: documents, validators, fill sessions, and editors

mod builder;
mod document;
mod editor;
mod field;
mod question;
mod session;
mod validate;

pub use builder::*;
pub use document::*;
pub use editor::*;
pub use field::*;
pub use question::*;
pub use session::*;
pub use validate::*;
