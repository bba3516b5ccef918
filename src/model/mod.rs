//! Object model for extracted application packages.
//!
//! Every object kind embeds an [`ObjectCore`] carrying identity, version
//! information and the raw document; the [`AppObject`] tagged union adds
//! the kind-specific structure. Objects are built once per package scan and
//! shared through the [`ObjectDirectory`] afterwards.

mod blueprint;
mod directory;
mod object;
mod process;
mod tree;
mod version;

pub use blueprint::*;
pub use directory::*;
pub use object::*;
pub use process::*;
pub use tree::*;
pub use version::*;
