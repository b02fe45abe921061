pub mod run;
pub mod ship;
pub mod verify;
