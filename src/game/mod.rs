//! Game model and decision modules

pub mod boundary;
pub mod controller;
pub mod engagement;
pub mod geometry;
pub mod object;
pub mod opportunity;
pub mod selection;
pub mod threat;
pub mod world;

pub use controller::TurnController;
pub use world::WorldState;
