pub mod macros;
pub mod model;
pub mod view;
