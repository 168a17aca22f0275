use anyhow::Result;
use greeter::{Authenticator, BackendError, ConnectionHandle, Connector, UserIdentity};

struct LocalConnector;

impl Connector for LocalConnector {
    fn connect(&self) -> Result<ConnectionHandle, BackendError> {
        Ok(ConnectionHandle { session_id: 1 })
    }
}

struct LocalAuthenticator;

impl Authenticator for LocalAuthenticator {
    fn authenticate(&self, account: &str) -> Result<UserIdentity, BackendError> {
        Ok(UserIdentity(account.to_string()))
    }
}

fn main() -> Result<()> {
    let mut stdout = std::io::stdout();
    greeter::run(&LocalConnector, &LocalAuthenticator, &mut stdout)
}
