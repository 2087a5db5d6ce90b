use anyhow::{Context, Result};
use keyring::Entry;

const SERVICE_NAME: &str = "matricare";

/// Identity token at rest in the OS keychain, keyed by principal.
pub struct CredentialStore;

impl CredentialStore {
    /// Store the identity token for a principal in the OS keychain
    pub fn store(principal: &str, token: &str) -> Result<()> {
        let entry =
            Entry::new(SERVICE_NAME, principal).context("Failed to create keyring entry")?;
        entry
            .set_password(token)
            .context("Failed to store token in keychain")?;
        Ok(())
    }

    /// Retrieve the stored token for a principal from the OS keychain
    pub fn get_token(principal: &str) -> Result<String> {
        let entry =
            Entry::new(SERVICE_NAME, principal).context("Failed to create keyring entry")?;
        entry
            .get_password()
            .context("Failed to retrieve token from keychain")
    }

    /// Delete the stored token for a principal
    pub fn delete(principal: &str) -> Result<()> {
        let entry =
            Entry::new(SERVICE_NAME, principal).context("Failed to create keyring entry")?;
        entry
            .delete_credential()
            .context("Failed to delete token from keychain")?;
        Ok(())
    }

    /// Check if a token is stored for a principal
    pub fn has_token(principal: &str) -> bool {
        if let Ok(entry) = Entry::new(SERVICE_NAME, principal) {
            entry.get_password().is_ok()
        } else {
            false
        }
    }
}
