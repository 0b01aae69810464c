pub mod candidate;
pub mod import_run;
pub mod interview;
pub mod role;
pub mod user;
