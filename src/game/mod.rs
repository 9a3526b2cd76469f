pub mod collision;
pub mod color;
pub mod constants;
pub mod error;
pub mod kill;
pub mod movement;
pub mod registry;
pub mod respawn;
pub mod room;
pub mod trail;
pub mod types;
