pub mod draft;
pub mod media;
pub mod pet;
pub mod post;
pub mod user;
