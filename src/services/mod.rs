pub mod advisors;
pub mod signals;
