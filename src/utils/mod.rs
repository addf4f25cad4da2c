pub mod discovery;
pub mod validation;
