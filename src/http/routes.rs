//! Paths of the remote API, relative to `API_BASE_URL`.

pub const AUTH_LOGIN: &str = "auth/login";
pub const AUTH_VERIFY_OTP: &str = "auth/verify-otp";
pub const PET_FORMS: &str = "pets/allPetsForms";
pub const FEED_POSTS: &str = "feed/posts";
