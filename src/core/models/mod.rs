pub mod points;
pub mod value;
pub mod view;
