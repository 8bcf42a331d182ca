pub mod health;
pub mod rectifiers;
