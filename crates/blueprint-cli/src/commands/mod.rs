pub mod check;
pub mod index;
pub mod nodes;
pub mod render;
