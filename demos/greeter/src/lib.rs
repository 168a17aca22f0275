//! Minimal connect, authenticate, greet flow.
//!
//! `run` opens a connection, authenticates the fixed `admin` account and
//! writes a greeting for whatever identity the backend hands back. The
//! connection handle is held only for its lifetime; nothing reads from it.

use std::fmt;
use std::io::Write;

use anyhow::{Context, Result};

/// Opaque session token returned by a backend. Dropping it closes the session.
#[derive(Debug)]
pub struct ConnectionHandle {
    pub session_id: u64,
}

/// The identity a backend resolves a login to. May differ from the
/// requested account name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity(pub String);

impl fmt::Display for UserIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("connection refused")]
    ConnectionRefused,
    #[error("unknown account: {0}")]
    UnknownAccount(String),
}

pub trait Connector {
    fn connect(&self) -> Result<ConnectionHandle, BackendError>;
}

pub trait Authenticator {
    fn authenticate(&self, account: &str) -> Result<UserIdentity, BackendError>;
}

/// Connect, authenticate as `admin`, and greet the resolved identity.
///
/// Each backend call happens exactly once, in order, and a failure at
/// either step propagates before anything is written to `out`.
pub fn run(
    connector: &dyn Connector,
    authenticator: &dyn Authenticator,
    out: &mut impl Write,
) -> Result<()> {
    let _handle = connector.connect().context("open connection")?;
    let user = authenticator
        .authenticate("admin")
        .context("authenticate admin")?;
    writeln!(out, "Hello {user}").context("write greeting")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct StubConnector {
        calls: Cell<usize>,
        fail: bool,
    }

    impl StubConnector {
        fn ok() -> Self {
            Self { calls: Cell::new(0), fail: false }
        }

        fn failing() -> Self {
            Self { calls: Cell::new(0), fail: true }
        }
    }

    impl Connector for StubConnector {
        fn connect(&self) -> Result<ConnectionHandle, BackendError> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                return Err(BackendError::ConnectionRefused);
            }
            Ok(ConnectionHandle { session_id: 7 })
        }
    }

    struct StubAuthenticator {
        calls: Cell<usize>,
        identity: Option<String>,
        seen_account: Cell<Option<&'static str>>,
    }

    impl StubAuthenticator {
        fn resolving(identity: &str) -> Self {
            Self {
                calls: Cell::new(0),
                identity: Some(identity.to_string()),
                seen_account: Cell::new(None),
            }
        }

        fn failing() -> Self {
            Self {
                calls: Cell::new(0),
                identity: None,
                seen_account: Cell::new(None),
            }
        }
    }

    impl Authenticator for StubAuthenticator {
        fn authenticate(&self, account: &str) -> Result<UserIdentity, BackendError> {
            self.calls.set(self.calls.get() + 1);
            if account == "admin" {
                self.seen_account.set(Some("admin"));
            }
            match &self.identity {
                Some(id) => Ok(UserIdentity(id.clone())),
                None => Err(BackendError::UnknownAccount(account.to_string())),
            }
        }
    }

    #[test]
    fn greets_resolved_identity() {
        let connector = StubConnector::ok();
        let authenticator = StubAuthenticator::resolving("alice");
        let mut out = Vec::new();

        run(&connector, &authenticator, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Hello alice\n");
    }

    #[test]
    fn always_authenticates_the_admin_account() {
        let connector = StubConnector::ok();
        let authenticator = StubAuthenticator::resolving("root");
        let mut out = Vec::new();

        run(&connector, &authenticator, &mut out).unwrap();
        assert_eq!(authenticator.seen_account.get(), Some("admin"));
    }

    #[test]
    fn empty_identity_still_greets() {
        let connector = StubConnector::ok();
        let authenticator = StubAuthenticator::resolving("");
        let mut out = Vec::new();

        run(&connector, &authenticator, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Hello \n");
    }

    #[test]
    fn connect_failure_skips_auth_and_output() {
        let connector = StubConnector::failing();
        let authenticator = StubAuthenticator::resolving("alice");
        let mut out = Vec::new();

        assert!(run(&connector, &authenticator, &mut out).is_err());
        assert_eq!(authenticator.calls.get(), 0);
        assert!(out.is_empty());
    }

    #[test]
    fn auth_failure_produces_no_output() {
        let connector = StubConnector::ok();
        let authenticator = StubAuthenticator::failing();
        let mut out = Vec::new();

        assert!(run(&connector, &authenticator, &mut out).is_err());
        assert!(out.is_empty());
    }

    #[test]
    fn each_backend_call_happens_once() {
        let connector = StubConnector::ok();
        let authenticator = StubAuthenticator::resolving("alice");
        let mut out = Vec::new();

        run(&connector, &authenticator, &mut out).unwrap();
        assert_eq!(connector.calls.get(), 1);
        assert_eq!(authenticator.calls.get(), 1);
    }
}
