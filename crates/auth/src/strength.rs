//! Password strength scoring.

/// Strength level shown while choosing a password.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PasswordStrength {
    None,
    Weak,
    Fair,
    Good,
    Strong,
    Excellent,
}

impl PasswordStrength {
    /// Scores a password from 0 to 5.
    ///
    /// One point each for: at least 8 characters, at least 12 characters,
    /// both upper and lower case, a digit, a non-alphanumeric character.
    pub fn score(password: &str) -> u8 {
        let len = password.chars().count();
        let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
        let has_lower = password.chars().any(|c| c.is_ascii_lowercase());

        [
            len >= 8,
            len >= 12,
            has_upper && has_lower,
            password.chars().any(|c| c.is_ascii_digit()),
            password.chars().any(|c| !c.is_ascii_alphanumeric()),
        ]
        .into_iter()
        .filter(|&hit| hit)
        .count() as u8
    }

    /// Classifies a password.
    pub fn of(password: &str) -> Self {
        match Self::score(password) {
            0 => Self::None,
            1 => Self::Weak,
            2 => Self::Fair,
            3 => Self::Good,
            4 => Self::Strong,
            _ => Self::Excellent,
        }
    }

    /// Meter fill percentage.
    pub fn percent(&self) -> u8 {
        match self {
            Self::None => 0,
            Self::Weak => 20,
            Self::Fair => 40,
            Self::Good => 70,
            Self::Strong => 90,
            Self::Excellent => 100,
        }
    }

    /// Label shown next to the meter.
    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "",
            Self::Weak => "Weak",
            Self::Fair => "Fair",
            Self::Good => "Good",
            Self::Strong => "Strong",
            Self::Excellent => "Excellent",
        }
    }
}
