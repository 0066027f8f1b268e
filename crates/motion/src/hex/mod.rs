mod boundary;
mod coord;
mod map;

pub use boundary::{Edges, HexBoundary};
pub use coord::{CoordError, HecsCoord, HexDirection};
pub use map::{Cell, HexMap};
