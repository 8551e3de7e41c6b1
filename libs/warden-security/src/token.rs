use std::fmt;

use secrecy::SecretString;

/// Credentials presented by a subject for a single login attempt.
pub trait AuthenticationToken: Send + Sync + fmt::Debug {
    /// The claimed identity (for example a username).
    fn principal(&self) -> &str;

    /// The secret proving the claimed identity.
    fn credentials(&self) -> &SecretString;

    fn is_remember_me(&self) -> bool {
        false
    }

    /// Origin of the attempt, if known.
    fn host(&self) -> Option<&str> {
        None
    }

    /// Stable tag realms use to decide whether they handle this token type.
    fn kind(&self) -> &'static str;
}

/// Username and password login.
#[derive(Clone)]
pub struct UsernamePasswordToken {
    username: String,
    password: SecretString,
    remember_me: bool,
    host: Option<String>,
}

impl UsernamePasswordToken {
    pub const KIND: &'static str = "username_password";

    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
            remember_me: false,
            host: None,
        }
    }

    #[must_use]
    pub fn with_remember_me(mut self, remember_me: bool) -> Self {
        self.remember_me = remember_me;
        self
    }

    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }
}

impl fmt::Debug for UsernamePasswordToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UsernamePasswordToken")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("remember_me", &self.remember_me)
            .field("host", &self.host)
            .finish()
    }
}

impl AuthenticationToken for UsernamePasswordToken {
    fn principal(&self) -> &str {
        &self.username
    }

    fn credentials(&self) -> &SecretString {
        &self.password
    }

    fn is_remember_me(&self) -> bool {
        self.remember_me
    }

    fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    fn kind(&self) -> &'static str {
        Self::KIND
    }
}
