//! Credential resolution.

use std::io::{self, IsTerminal};

use anyhow::{Context, Result};
use branchnet_github::Credentials;
use tracing::{info, warn};

/// Builds credentials from the command line and environment.
///
/// A user without a token is asked for one, without echo, when stdin is a
/// terminal.
pub fn resolve(user: Option<String>, token: Option<String>) -> Result<Option<Credentials>> {
    from_parts(user, token, |user| {
        if io::stdin().is_terminal() {
            prompt_secret(user).map(Some)
        } else {
            Ok(None)
        }
    })
}

fn from_parts(
    user: Option<String>,
    token: Option<String>,
    ask: impl FnOnce(&str) -> Result<Option<String>>,
) -> Result<Option<Credentials>> {
    let user = user.filter(|u| !u.trim().is_empty());
    let token = token.filter(|t| !t.is_empty());

    match (user, token) {
        (Some(user), Some(token)) => Ok(Some(Credentials::new(user, token))),
        (None, Some(token)) => Ok(Some(Credentials::token(token))),
        (Some(user), None) => match ask(&user)?.filter(|s| !s.is_empty()) {
            Some(secret) => Ok(Some(Credentials::new(user, secret))),
            None => {
                warn!(%user, "no password or token given, using anonymous access");
                Ok(None)
            }
        },
        (None, None) => {
            info!("no credentials, using anonymous access (60 requests per hour)");
            Ok(None)
        }
    }
}

fn prompt_secret(user: &str) -> Result<String> {
    rpassword::prompt_password(format!("GitHub password or token for {user}: "))
        .context("failed to read password")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn never(_: &str) -> Result<Option<String>> {
        panic!("should not prompt")
    }

    #[test]
    fn test_user_and_token() {
        let credentials = from_parts(Some("ada".into()), Some("s3cret".into()), never)
            .unwrap()
            .unwrap();
        assert_eq!(credentials.username, "ada");
        assert_eq!(credentials.secret(), "s3cret");
    }

    #[test]
    fn test_token_only() {
        let credentials = from_parts(None, Some("ghp_x".into()), never)
            .unwrap()
            .unwrap();
        assert!(credentials.username.is_empty());
        assert_eq!(credentials.secret(), "ghp_x");
    }

    #[test]
    fn test_user_prompts_for_secret() {
        let mut asked_for = None;
        let credentials = from_parts(Some("ada".into()), None, |user| {
            asked_for = Some(user.to_string());
            Ok(Some("typed".into()))
        })
        .unwrap()
        .unwrap();
        assert_eq!(asked_for.as_deref(), Some("ada"));
        assert_eq!(credentials.username, "ada");
        assert_eq!(credentials.secret(), "typed");
    }

    #[test]
    fn test_user_without_secret_is_anonymous() {
        assert!(from_parts(Some("ada".into()), None, |_| Ok(None)).unwrap().is_none());
        assert!(from_parts(Some("ada".into()), None, |_| Ok(Some(String::new())))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_nothing_is_anonymous() {
        assert!(from_parts(None, None, never).unwrap().is_none());
        assert!(from_parts(Some("  ".into()), Some(String::new()), never).unwrap().is_none());
    }
}
