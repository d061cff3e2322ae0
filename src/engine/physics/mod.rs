// Scene queries using parry3d
//
// The character never simulates rigid bodies; it only asks what lies ahead.

mod world;

pub use world::{Obstacle, ObstacleHandle, ProbeWorld, RayHit};
