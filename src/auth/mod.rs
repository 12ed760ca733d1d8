// Authentication module
// Resolves configured credentials into a token source

mod credentials;
mod discovery;
mod refresh;
mod resolver;
mod token_source;
mod types;

pub use credentials::{parse_document, read_path_or_contents, PathOrContents};
pub use discovery::{ApplicationDefaultCredentials, CredentialDiscovery};
pub use resolver::{default_scopes, CredentialResolver, DEFAULT_CLIENT_SCOPES};
pub use token_source::{
    AuthorizedUserTokenSource, GcpTokenSource, StaticTokenSource, TokenSource, TokenSourceKind,
};
pub use types::{AuthorizedUserSecret, CredentialsFile, ServiceAccountKey, Token};
