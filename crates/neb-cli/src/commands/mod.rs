pub mod run;
pub mod scenarios;
