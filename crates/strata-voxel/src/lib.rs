//! Block storage for the volumetric terrain: lazily populated blocks of
//! density and environment samples, seamless cross-block access, edit fan-out
//! and per-block re-polygonization.

pub mod block;
pub mod layer;
pub mod populator;
pub mod view;
pub mod world;

pub use block::{Block, UNPOPULATED};
pub use layer::Layer;
pub use populator::{EmptyPopulator, Populator};
pub use view::{BlockSurface, BlockView};
pub use world::{World, WorldPosition, boundary_fanout};
