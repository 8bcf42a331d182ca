pub mod enact;
pub mod health;
pub mod rectifier;
