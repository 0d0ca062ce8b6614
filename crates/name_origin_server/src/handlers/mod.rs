pub mod health;
pub mod names;
pub mod popular;
pub mod token;
