pub mod gate;
pub mod goal;
pub mod item;
pub mod load;
pub mod project;
pub mod status;
pub mod view;
