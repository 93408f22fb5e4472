pub mod internship;
pub mod roster;
