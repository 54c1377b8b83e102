mod token;

pub use token::{AdminToken, AUTH_TOKEN_HEADER};
