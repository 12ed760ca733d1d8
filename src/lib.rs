// Terraform provider for Google Tag Manager - library root

pub mod auth;
pub mod config;
pub mod error;
pub mod http_client;
pub mod provider;
pub mod tagmanager;
pub mod version;
