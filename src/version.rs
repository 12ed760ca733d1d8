// Provider version and user agent composition

/// Version of this provider
pub const PROVIDER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Provider name used in the user agent
pub const PROVIDER_NAME: &str = "terraform-provider-gtm";

/// Host version assumed when the host does not report one
pub const DEFAULT_TERRAFORM_VERSION: &str = "0.12.0";

const TERRAFORM_WEBSITE: &str = "(+https://www.terraform.io)";

/// User agent of the host tool, e.g. `Terraform/0.12.0`
pub fn terraform_user_agent(terraform_version: &str) -> String {
    format!("Terraform/{}", terraform_version)
}

/// Full user agent sent to Google APIs:
/// `Terraform/<host> (+https://www.terraform.io) terraform-provider-gtm/<version>`
pub fn user_agent(terraform_version: &str) -> String {
    format!(
        "{} {} {}/{}",
        terraform_user_agent(terraform_version),
        TERRAFORM_WEBSITE,
        PROVIDER_NAME,
        PROVIDER_VERSION
    )
}
