pub mod aggregate;
pub mod run;
