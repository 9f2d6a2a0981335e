pub mod errors;
pub mod models;
pub mod store;

pub use errors::RefreshTokenError;
pub use models::RefreshToken;
pub use store::RefreshTokenStore;
