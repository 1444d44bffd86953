pub mod auth;
pub mod meetings;
pub mod plants;
pub mod rooms;
pub mod users;
