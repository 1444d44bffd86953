pub mod auth;
pub mod booking_service;
pub mod mail_service;
pub mod plant_service;
pub mod room_service;
pub mod user_service;
