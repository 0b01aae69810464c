pub mod folio;
pub mod time;
pub mod validation;
