//! **mazeroute-core** — grid coordinates and obstacle maps.
//!
//! This crate provides the types shared by the *mazeroute* crates:
//! geometry primitives, the `"<x>:<y>"` node-key format used for
//! grid-derived graphs, and the rectangular [`Map`] of [`Tile`]s.

pub mod geom;
pub mod map;

pub use geom::{Point, Range, node_key, parse_node_key};
pub use map::{Map, MapError, Tile};
