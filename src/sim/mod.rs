pub mod event;
pub mod level;
pub mod mode;
pub mod step;
pub mod world;
