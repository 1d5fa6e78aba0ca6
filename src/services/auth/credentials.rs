/*
 * Responsibility
 * - Fixed in-memory username/password table backing the login endpoint
 * - Decide which role gets embedded into the issued token
 */
use std::{collections::HashMap, fmt};

use subtle::ConstantTimeEq;

pub const ROLE_USER: &str = "User";
pub const ROLE_ADMIN: &str = "Admin";

struct Account {
    password: &'static str,
    // First entry is the default role.
    roles: &'static [&'static str],
}

pub struct CredentialTable {
    accounts: HashMap<&'static str, Account>,
}

impl fmt::Debug for CredentialTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print passwords
        f.debug_struct("CredentialTable")
            .field("accounts", &self.accounts.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl CredentialTable {
    pub fn builtin() -> Self {
        let accounts = HashMap::from([
            (
                "user1",
                Account {
                    password: "password1",
                    roles: &[ROLE_USER],
                },
            ),
            (
                "admin",
                Account {
                    password: "password2",
                    roles: &[ROLE_ADMIN, ROLE_USER],
                },
            ),
            (
                "alice",
                Account {
                    password: "alice-password",
                    roles: &[ROLE_USER],
                },
            ),
        ]);

        Self { accounts }
    }

    /// Returns the role to embed when the credentials match.
    ///
    /// A requested role must be one the account actually holds.
    pub fn authenticate(
        &self,
        username: &str,
        password: &str,
        requested_role: Option<&str>,
    ) -> Option<&'static str> {
        let account = self.accounts.get(username)?;
        if !bool::from(account.password.as_bytes().ct_eq(password.as_bytes())) {
            return None;
        }

        match requested_role {
            Some(role) => account.roles.iter().copied().find(|r| *r == role),
            None => account.roles.first().copied(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_credentials_get_the_default_role() {
        let table = CredentialTable::builtin();
        assert_eq!(table.authenticate("user1", "password1", None), Some(ROLE_USER));
        assert_eq!(table.authenticate("admin", "password2", None), Some(ROLE_ADMIN));
    }

    #[test]
    fn requested_role_must_be_granted() {
        let table = CredentialTable::builtin();
        assert_eq!(
            table.authenticate("admin", "password2", Some(ROLE_USER)),
            Some(ROLE_USER)
        );
        assert_eq!(table.authenticate("user1", "password1", Some(ROLE_ADMIN)), None);
    }

    #[test]
    fn wrong_password_or_unknown_user_fails() {
        let table = CredentialTable::builtin();
        assert_eq!(table.authenticate("user1", "password2", None), None);
        assert_eq!(table.authenticate("mallory", "password1", None), None);
    }

    #[test]
    fn prefixes_and_extensions_of_the_password_fail() {
        let table = CredentialTable::builtin();
        assert_eq!(table.authenticate("user1", "password", None), None);
        assert_eq!(table.authenticate("user1", "password1 ", None), None);
        assert_eq!(table.authenticate("user1", "", None), None);
    }

    #[test]
    fn debug_hides_passwords() {
        let rendered = format!("{:?}", CredentialTable::builtin());
        assert!(!rendered.contains("password1"));
    }
}
