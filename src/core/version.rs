use crate::error::{AppError, AppResult};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Go 版本号
///
/// 由 (major, minor, patch) 组成；patch 缺省时按 0 参与比较，
/// 但显示与拼接 URL 时保持原样（"1.21" 不会变成 "1.21.0"）。
/// 比较按数值而非字典序："2.0" < "10.0"。
#[derive(Debug, Clone)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: Option<u32>,
}

impl Version {
    pub fn new(major: u32, minor: u32, patch: Option<u32>) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// 数值比较键，缺省 patch 视为 0
    fn key(&self) -> (u32, u32, u32) {
        (self.major, self.minor, self.patch.unwrap_or(0))
    }
}

impl FromStr for Version {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        let trimmed = s.trim();
        let parts: Vec<&str> = trimmed.split('.').collect();
        if parts.len() < 2 || parts.len() > 3 {
            return Err(AppError::invalid_version(s));
        }

        let parse_part = |part: &str| {
            part.parse::<u32>()
                .map_err(|_| AppError::invalid_version(s))
        };

        let major = parse_part(parts[0])?;
        let minor = parse_part(parts[1])?;
        let patch = match parts.get(2) {
            Some(part) => Some(parse_part(part)?),
            None => None,
        };

        Ok(Self {
            major,
            minor,
            patch,
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)?;
        if let Some(patch) = self.patch {
            write!(f, ".{patch}")?;
        }
        Ok(())
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_version() {
        let v: Version = "1.22.1".parse().unwrap();
        assert_eq!(v.major, 1);
        assert_eq!(v.minor, 22);
        assert_eq!(v.patch, Some(1));
    }

    #[test]
    fn test_parse_without_patch() {
        let v: Version = "1.21".parse().unwrap();
        assert_eq!(v.patch, None);
        assert_eq!(v.to_string(), "1.21");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<Version>().is_err());
        assert!("1".parse::<Version>().is_err());
        assert!("1.2.3.4".parse::<Version>().is_err());
        assert!("1.x".parse::<Version>().is_err());
        assert!("v1.21".parse::<Version>().is_err());
    }

    #[test]
    fn test_numeric_not_lexicographic_order() {
        let a: Version = "2.0".parse().unwrap();
        let b: Version = "10.0".parse().unwrap();
        assert!(a < b);

        let a: Version = "1.9".parse().unwrap();
        let b: Version = "1.10.2".parse().unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_missing_patch_compares_as_zero() {
        let short: Version = "1.21".parse().unwrap();
        let long: Version = "1.21.0".parse().unwrap();
        assert_eq!(short, long);
        assert_eq!(short.cmp(&long), Ordering::Equal);
        // 显示仍保持原样
        assert_eq!(short.to_string(), "1.21");
        assert_eq!(long.to_string(), "1.21.0");
    }

    #[test]
    fn test_sorting_is_ascending_numeric() {
        let mut versions: Vec<Version> = ["1.9", "1.10.2", "1.2"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        versions.sort();
        let rendered: Vec<String> = versions.iter().map(|v| v.to_string()).collect();
        assert_eq!(rendered, vec!["1.2", "1.9", "1.10.2"]);
    }
}
