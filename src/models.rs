pub mod auth;
pub mod meeting;
pub mod plant;
pub mod response;
pub mod room;
pub mod user;
pub mod validation;
