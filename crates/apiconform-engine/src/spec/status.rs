//! Response status keys: exact codes, wildcard classes, and `default`

/// A key of an operation's `responses` map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusKey {
    /// Exact code, e.g. `204`
    Code(u16),
    /// Wildcard class, e.g. `2XX` or `20X`. `None` digits are wildcards.
    Class([Option<u8>; 3]),
    /// `default`: any status not covered by another key
    Default,
}

impl StatusKey {
    /// Parse a `responses` key.
    ///
    /// # Errors
    ///
    /// Returns the reason the key is not a status code, class, or `default`.
    pub fn parse(raw: &str) -> Result<Self, String> {
        if raw.eq_ignore_ascii_case("default") {
            return Ok(Self::Default);
        }
        let bytes = raw.as_bytes();
        if bytes.len() != 3 {
            return Err(format!("'{raw}' is not a status code, class, or 'default'"));
        }
        if !(b'1'..=b'5').contains(&bytes[0]) {
            return Err(format!("'{raw}' must start with a digit from 1 to 5"));
        }
        let mut digits = [None; 3];
        for (slot, &b) in digits.iter_mut().zip(bytes) {
            *slot = match b {
                b'0'..=b'9' => Some(b - b'0'),
                b'X' | b'x' => None,
                _ => return Err(format!("'{raw}' is not a status code, class, or 'default'")),
            };
        }
        match digits {
            [Some(a), Some(b), Some(c)] => Ok(Self::Code(
                u16::from(a) * 100 + u16::from(b) * 10 + u16::from(c),
            )),
            _ => Ok(Self::Class(digits)),
        }
    }

    /// Whether this key covers `status`
    #[must_use]
    pub fn covers(&self, status: u16) -> bool {
        match self {
            Self::Code(code) => *code == status,
            Self::Class(pattern) => {
                if !(100..1000).contains(&status) {
                    return false;
                }
                let actual = [status / 100, status / 10 % 10, status % 10];
                pattern
                    .iter()
                    .zip(actual)
                    .all(|(p, a)| p.is_none_or(|d| u16::from(d) == a))
            }
            Self::Default => true,
        }
    }

    /// Lookup precedence: lower wins. Exact codes first, then classes with
    /// fewer wildcards, then `default`.
    #[must_use]
    pub fn precedence(&self) -> u8 {
        match self {
            Self::Code(_) => 0,
            Self::Class(pattern) => {
                1 + u8::try_from(pattern.iter().filter(|d| d.is_none()).count()).unwrap_or(3)
            }
            Self::Default => 5,
        }
    }
}

impl std::fmt::Display for StatusKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Code(code) => write!(f, "{code}"),
            Self::Class(pattern) => {
                for d in pattern {
                    match d {
                        Some(d) => write!(f, "{d}")?,
                        None => f.write_str("X")?,
                    }
                }
                Ok(())
            }
            Self::Default => f.write_str("default"),
        }
    }
}
