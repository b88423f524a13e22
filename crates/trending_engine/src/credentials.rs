//! Login credentials for password-protected report sites.
//!
//! Credentials come from a netrc file and are looked up by site key (the
//! netrc `machine` name). They are loaded once at startup and never change
//! during a run.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::iter::Peekable;
use std::path::Path;
use std::str::Chars;

use engine_logging::engine_warn;
use trending_core::PageSpec;

use crate::error::ConfigurationError;

#[derive(Clone, PartialEq, Eq)]
pub struct Login {
    pub login: String,
    pub password: String,
}

impl Login {
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Login {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Login")
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    machines: HashMap<String, Login>,
    default: Option<Login>,
}

impl Credentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_login(mut self, site: impl Into<String>, login: Login) -> Self {
        self.machines.insert(site.into(), login);
        self
    }

    /// Reads a netrc file. A missing file yields an empty store so that runs
    /// without protected pages need no netrc at all.
    pub fn load_netrc(path: &Path) -> Result<Self, ConfigurationError> {
        match fs::read_to_string(path) {
            Ok(text) => Self::from_netrc(&text),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                engine_warn!("No netrc file at {:?}; continuing without credentials", path);
                Ok(Self::new())
            }
            Err(source) => Err(ConfigurationError::CredentialFile {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn from_netrc(text: &str) -> Result<Self, ConfigurationError> {
        let mut credentials = Self::new();
        let mut entry: Option<Entry> = None;
        let mut lexer = Lexer::new(text);

        while let Some(token) = lexer.next_token() {
            let line = token.line;
            // Comments only start where a keyword is expected; `#` may begin a value.
            if !token.quoted && token.text.starts_with('#') {
                lexer.skip_line();
                continue;
            }
            match token.text.as_str() {
                "machine" => {
                    let name = lexer
                        .next_token()
                        .ok_or_else(|| netrc_error(line, "machine without a name"))?;
                    credentials.finish(entry.take())?;
                    entry = Some(Entry::new(Some(name.text), line));
                }
                "default" => {
                    credentials.finish(entry.take())?;
                    entry = Some(Entry::new(None, line));
                }
                "macdef" => lexer.skip_macro(),
                keyword @ ("login" | "password" | "account") => {
                    let value = lexer
                        .next_token()
                        .ok_or_else(|| netrc_error(line, format!("{keyword} without a value")))?;
                    let current = entry
                        .as_mut()
                        .ok_or_else(|| netrc_error(line, format!("{keyword} outside of a machine entry")))?;
                    match keyword {
                        "login" => current.login = Some(value.text),
                        "password" => current.password = Some(value.text),
                        _ => {}
                    }
                }
                other => return Err(netrc_error(line, format!("unexpected token {other:?}"))),
            }
        }
        credentials.finish(entry)?;
        Ok(credentials)
    }

    /// Site-specific entry first, then the netrc `default` entry.
    pub fn get(&self, site: &str) -> Option<&Login> {
        self.machines.get(site).or(self.default.as_ref())
    }

    /// The login a page must send, if it needs one.
    pub fn login_for(&self, spec: &PageSpec) -> Result<Option<&Login>, ConfigurationError> {
        match spec.auth_site() {
            None => Ok(None),
            Some(site) => self
                .get(site)
                .map(Some)
                .ok_or_else(|| ConfigurationError::MissingCredential {
                    page: spec.key().to_string(),
                    site: site.to_string(),
                }),
        }
    }

    fn finish(&mut self, entry: Option<Entry>) -> Result<(), ConfigurationError> {
        let Some(entry) = entry else {
            return Ok(());
        };
        let login = entry
            .login
            .ok_or_else(|| netrc_error(entry.line, "entry has no login"))?;
        let login = Login::new(login, entry.password.unwrap_or_default());
        match entry.machine {
            Some(machine) => {
                self.machines.insert(machine, login);
            }
            None => self.default = Some(login),
        }
        Ok(())
    }
}

struct Entry {
    machine: Option<String>,
    login: Option<String>,
    password: Option<String>,
    line: usize,
}

impl Entry {
    fn new(machine: Option<String>, line: usize) -> Self {
        Self {
            machine,
            login: None,
            password: None,
            line,
        }
    }
}

struct Token {
    text: String,
    quoted: bool,
    line: usize,
}

/// netrc lexer: whitespace separated words, or double-quoted strings with
/// backslash escapes. Line numbers are 1-based.
struct Lexer<'t> {
    chars: Peekable<Chars<'t>>,
    line: usize,
}

impl<'t> Lexer<'t> {
    fn new(text: &'t str) -> Self {
        Self {
            chars: text.chars().peekable(),
            line: 1,
        }
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn next_token(&mut self) -> Option<Token> {
        while self.chars.peek().is_some_and(|c| c.is_whitespace()) {
            self.bump();
        }
        let line = self.line;
        let mut text = String::new();

        if self.chars.peek() == Some(&'"') {
            self.bump();
            while let Some(c) = self.bump() {
                match c {
                    '"' => break,
                    '\\' => text.extend(self.bump()),
                    c => text.push(c),
                }
            }
            return Some(Token { text, quoted: true, line });
        }

        while let Some(&c) = self.chars.peek() {
            if c.is_whitespace() {
                break;
            }
            text.push(c);
            self.bump();
        }
        (!text.is_empty()).then_some(Token { text, quoted: false, line })
    }

    /// Drops everything up to and including the next newline.
    fn skip_line(&mut self) {
        while let Some(c) = self.bump() {
            if c == '\n' {
                break;
            }
        }
    }

    /// A `macdef` body runs from the line after its name to the next blank line.
    fn skip_macro(&mut self) {
        self.skip_line();
        loop {
            let mut seen = false;
            let mut blank = true;
            while let Some(c) = self.bump() {
                seen = true;
                if c == '\n' {
                    break;
                }
                blank &= c.is_whitespace();
            }
            if !seen || blank {
                break;
            }
        }
    }
}

fn netrc_error(line: usize, message: impl Into<String>) -> ConfigurationError {
    ConfigurationError::Netrc {
        line,
        message: message.into(),
    }
}
