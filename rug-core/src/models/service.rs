use serde::{Deserialize, Serialize};

/// Service tier chosen on the package step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Package {
    Standard,
    Premium,
}

impl Package {
    pub fn all() -> &'static [Package] {
        &[Package::Standard, Package::Premium]
    }

    /// Stable token used on the host bridge and in config files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Premium => "premium",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Some(Self::Standard),
            "premium" => Some(Self::Premium),
            _ => None,
        }
    }
}

/// Pile length category of the rug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pile {
    Short,
    Long,
}

impl Pile {
    pub fn all() -> &'static [Pile] {
        &[Pile::Short, Pile::Long]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Long => "long",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "short" => Some(Self::Short),
            "long" => Some(Self::Long),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn package_tokens_round_trip_through_parse() {
        for package in Package::all() {
            assert_eq!(Package::parse(package.as_str()), Some(*package));
        }
    }

    #[test]
    fn parse_ignores_case_and_whitespace() {
        assert_eq!(Package::parse("  Premium "), Some(Package::Premium));
        assert_eq!(Pile::parse("LONG"), Some(Pile::Long));
    }

    #[test]
    fn parse_rejects_unknown_tokens() {
        assert_eq!(Package::parse("deluxe"), None);
        assert_eq!(Pile::parse(""), None);
    }

    #[test]
    fn serde_uses_lowercase_tokens() {
        let json = serde_json::to_string(&(Package::Standard, Pile::Long)).unwrap();

        assert_eq!(json, r#"["standard","long"]"#);
    }
}
