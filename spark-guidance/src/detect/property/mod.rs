pub mod direction;
pub mod distance;
pub mod free_path;
pub mod obstacle;
pub mod position;
pub mod target;
