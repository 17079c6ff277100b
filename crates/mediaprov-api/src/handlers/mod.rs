pub mod asset;
pub mod container;
pub mod health;
pub mod transform;
