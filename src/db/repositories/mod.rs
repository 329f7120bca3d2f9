pub mod movie;
pub mod reference;
