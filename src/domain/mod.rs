pub mod ai;
pub mod entity;
pub mod tile;
