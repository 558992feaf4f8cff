/// Authentication module
///
/// Password hashing, access-token issuance and validation, refresh-token
/// generation, the credential lifecycle, and the ownership check.

mod bearer;
mod claims;
mod jwt;
mod ownership;
mod password;
mod refresh_token;
mod session;

pub use bearer::{authenticate, extract_api_key, extract_bearer, ApiKey};
pub use claims::Claims;
pub use jwt::AccessTokenCodec;
pub use ownership::assert_owner;
pub use password::{hash_password, verify_password, PasswordCheck};
pub use refresh_token::{generate_refresh_token, hash_token};
pub use session::{CredentialManager, IssuedCredentials};
