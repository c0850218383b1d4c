//! Entity Component System integration with hecs.
//!
//! Entities are owned by a [`hecs::World`]; everything else in the crate holds
//! `hecs::Entity` handles only.

pub mod components;

pub mod prelude {
    pub use super::components::*;
}
