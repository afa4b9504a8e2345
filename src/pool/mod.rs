//! Credential pool: the YAML file listing providers and their API keys

mod presets;
mod store;
mod types;
mod validate;

pub(crate) use store::{CredentialFile, write_default};
pub(crate) use types::{Candidate, Endpoint};
