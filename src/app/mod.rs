pub mod auth;
pub mod feed;
pub mod form;
pub mod media;
pub mod pets;
pub mod posts;
pub mod preview;
pub mod registry;
pub mod validation;
