// Google login, bearer tokens, and the extractor guarding the profile API.

pub mod extractor;
pub mod google;
pub mod handlers;
pub mod jwt;
pub mod linking;
pub mod state_cookie;
