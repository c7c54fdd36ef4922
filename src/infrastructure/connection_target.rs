use std::sync::LazyLock;

use regex::Regex;
use sqlx::mysql::MySqlConnectOptions;

use crate::domain::error::ProcessGrepError;

pub const DEFAULT_MYSQL_PORT: u16 = 3306;

// user[:password]@host[:port][:socket]
static SPECIFIER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<user>[^:@]+)(?::(?P<password>[^@]*))?@(?P<host>[^:@]+)(?::(?P<port>\d+))?(?::(?P<socket>[^:]+))?$",
    )
    .expect("connection specifier pattern is a valid regex")
});

/// One parsed server specifier of the form
/// `user[:password]@host[:port][:socket]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionTarget {
    user: String,
    password: Option<String>,
    host: String,
    port: u16,
    unix_socket: Option<String>,
}

impl ConnectionTarget {
    pub fn parse(specifier: &str) -> Result<Self, ProcessGrepError> {
        let invalid = || ProcessGrepError::InvalidConnectionSpecifier(specifier.to_string());
        let captures = SPECIFIER_PATTERN.captures(specifier).ok_or_else(invalid)?;

        let port = match captures.name("port") {
            Some(digits) => digits.as_str().parse::<u16>().map_err(|_| invalid())?,
            None => DEFAULT_MYSQL_PORT,
        };

        Ok(Self {
            user: captures["user"].to_string(),
            password: captures
                .name("password")
                .map(|m| m.as_str().to_string())
                .filter(|password| !password.is_empty()),
            host: captures["host"].to_string(),
            port,
            unix_socket: captures.name("socket").map(|m| m.as_str().to_string()),
        })
    }

    /// Password-masked display form, used as the Connection column of the
    /// report.
    pub fn label(&self) -> String {
        let mut label = format!("{}:*@{}:{}", self.user, self.host, self.port);
        if let Some(socket) = &self.unix_socket {
            label.push(':');
            label.push_str(socket);
        }
        label
    }

    pub fn connect_options(&self) -> MySqlConnectOptions {
        let mut options = MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user);
        if let Some(password) = &self.password {
            options = options.password(password);
        }
        if let Some(socket) = &self.unix_socket {
            options = options.socket(socket);
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::{ConnectionTarget, DEFAULT_MYSQL_PORT};
    use crate::domain::error::ProcessGrepError;

    #[test]
    fn parses_a_full_specifier() {
        let target =
            ConnectionTarget::parse("root:secret@db1.example.com:3307:/tmp/mysql.sock")
                .expect("specifier should parse");
        assert_eq!(target.user, "root");
        assert_eq!(target.password.as_deref(), Some("secret"));
        assert_eq!(target.host, "db1.example.com");
        assert_eq!(target.port, 3307);
        assert_eq!(target.unix_socket.as_deref(), Some("/tmp/mysql.sock"));
    }

    #[test]
    fn port_defaults_when_omitted() {
        let target = ConnectionTarget::parse("monitor@localhost").expect("specifier should parse");
        assert_eq!(target.port, DEFAULT_MYSQL_PORT);
        assert_eq!(target.password, None);
        assert_eq!(target.unix_socket, None);
    }

    #[test]
    fn socket_can_follow_the_host_directly() {
        let target = ConnectionTarget::parse("root@localhost:/var/run/mysqld/mysqld.sock")
            .expect("specifier should parse");
        assert_eq!(target.port, DEFAULT_MYSQL_PORT);
        assert_eq!(
            target.unix_socket.as_deref(),
            Some("/var/run/mysqld/mysqld.sock")
        );
    }

    #[test]
    fn empty_password_is_treated_as_absent() {
        let target = ConnectionTarget::parse("root:@localhost").expect("specifier should parse");
        assert_eq!(target.password, None);
    }

    #[test]
    fn invalid_specifiers_are_rejected_with_the_offending_text() {
        for specifier in ["", "no-at-sign", "@host-only", "user@", "user@host:", "user@host:70000"] {
            let error = ConnectionTarget::parse(specifier).expect_err("specifier should be rejected");
            match error {
                ProcessGrepError::InvalidConnectionSpecifier(reported) => {
                    assert_eq!(reported, specifier)
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn label_masks_the_password() {
        let target = ConnectionTarget::parse("root:secret@localhost:3306")
            .expect("specifier should parse");
        assert_eq!(target.label(), "root:*@localhost:3306");

        let with_socket = ConnectionTarget::parse("root@localhost:3306:/tmp/my.sock")
            .expect("specifier should parse");
        assert_eq!(with_socket.label(), "root:*@localhost:3306:/tmp/my.sock");
    }
}
