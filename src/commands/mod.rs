pub mod commits;
pub mod create;
pub mod verify;
