pub mod clouds;
pub mod effects;
pub mod enemy;
pub mod player;
pub mod projectile;
pub mod render;
