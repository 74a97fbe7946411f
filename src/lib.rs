pub mod city;
pub mod config;
pub mod erosion;
pub mod error;
pub mod grid;
pub mod heightmap;
pub mod preview;
pub mod simulation;
pub mod site;
pub mod water;
pub mod world;

pub use city::{BuildingPlacement, PlacementEvent, expand_city};
pub use config::{ErosionSettings, GenerationSettings, SimulationParams};
pub use error::{Error, Result};
pub use grid::GridPos;
pub use heightmap::{Heightmap, generate_heightmap};
pub use simulation::{Phase, Simulation};
pub use site::{CitySite, Orientation, find_site};
pub use world::World;
