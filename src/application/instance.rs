// Problem parameters and their plain-text input format

use std::fmt;
use std::fs;
use std::num::ParseIntError;
use std::path::Path;
use std::str::FromStr;

/// Errors raised while reading an instance
#[derive(Debug, thiserror::Error)]
pub enum InstanceError {
    #[error("Cannot read instance file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Missing value for {0}")]
    MissingField(&'static str),

    #[error("Invalid value '{token}' for {field}: {source}")]
    InvalidInteger {
        field: &'static str,
        token: String,
        #[source]
        source: ParseIntError,
    },

    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: i64 },

    #[error("Instance is too large: {0}")]
    TooLarge(String),
}

/// Social Golfer instance
///
/// The number of golfers is always `nb_groups * group_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instance {
    nb_groups: usize,
    group_size: usize,
    nb_weeks: usize,
}

impl Instance {
    /// Creates an instance, rejecting zero parameters and sizes whose
    /// variable or meeting count would not fit in memory addressing.
    pub fn new(nb_groups: usize, group_size: usize, nb_weeks: usize) -> Result<Self, InstanceError> {
        for (field, value) in [
            ("nbGroups", nb_groups),
            ("groupSize", group_size),
            ("nbWeeks", nb_weeks),
        ] {
            if value == 0 {
                return Err(InstanceError::NonPositive { field, value: 0 });
            }
        }
        let too_large = || {
            InstanceError::TooLarge(format!(
                "{} groups of {} golfers over {} weeks",
                nb_groups, group_size, nb_weeks
            ))
        };
        let nb_golfers = nb_groups.checked_mul(group_size).ok_or_else(too_large)?;
        // Per (week, group): one variable per golfer and one meeting per pair.
        // The meeting table is the largest structure built from an instance.
        let nb_pairs = nb_golfers
            .checked_mul(nb_golfers - 1)
            .map(|ordered| ordered / 2)
            .ok_or_else(too_large)?;
        for per_group in [nb_golfers, nb_pairs] {
            per_group
                .checked_mul(nb_groups)
                .and_then(|per_week| per_week.checked_mul(nb_weeks))
                .ok_or_else(too_large)?;
        }

        Ok(Self {
            nb_groups,
            group_size,
            nb_weeks,
        })
    }

    /// Reads an instance file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, InstanceError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| InstanceError::Io {
            path: path.display().to_string(),
            source,
        })?;
        text.parse()
    }

    pub fn nb_groups(&self) -> usize {
        self.nb_groups
    }

    pub fn group_size(&self) -> usize {
        self.group_size
    }

    pub fn nb_weeks(&self) -> usize {
        self.nb_weeks
    }

    pub fn nb_golfers(&self) -> usize {
        self.nb_groups * self.group_size
    }

    /// Number of assignment variables, `nbWeeks * nbGroups * nbGolfers`
    pub fn nb_slots(&self) -> usize {
        self.nb_weeks * self.nb_groups * self.nb_golfers()
    }
}

impl FromStr for Instance {
    type Err = InstanceError;

    /// Parses `nbGroups groupSize nbWeeks`; anything after the third value
    /// is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split_whitespace();
        let mut next = |field: &'static str| -> Result<usize, InstanceError> {
            let token = tokens.next().ok_or(InstanceError::MissingField(field))?;
            let value: i64 = token.parse().map_err(|source| InstanceError::InvalidInteger {
                field,
                token: token.to_string(),
                source,
            })?;
            if value <= 0 {
                return Err(InstanceError::NonPositive { field, value });
            }
            usize::try_from(value).map_err(|_| InstanceError::TooLarge(format!("{} = {}", field, value)))
        };

        let nb_groups = next("nbGroups")?;
        let group_size = next("groupSize")?;
        let nb_weeks = next("nbWeeks")?;
        Instance::new(nb_groups, group_size, nb_weeks)
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} groups x {} golfers, {} weeks ({} golfers)",
            self.nb_groups,
            self.group_size,
            self.nb_weeks,
            self.nb_golfers()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_instance() {
        let instance: Instance = "8 4 10\n".parse().unwrap();
        assert_eq!(instance.nb_groups(), 8);
        assert_eq!(instance.group_size(), 4);
        assert_eq!(instance.nb_weeks(), 10);
        assert_eq!(instance.nb_golfers(), 32);
        assert_eq!(instance.nb_slots(), 10 * 8 * 32);
    }

    #[test]
    fn test_parse_ignores_trailing_data() {
        let instance: Instance = "2 2\n3 extra tokens 17".parse().unwrap();
        assert_eq!(instance, Instance::new(2, 2, 3).unwrap());
    }

    #[test]
    fn test_parse_missing_field() {
        let err = "2 2".parse::<Instance>().unwrap_err();
        assert!(matches!(err, InstanceError::MissingField("nbWeeks")));
    }

    #[test]
    fn test_parse_non_numeric() {
        let err = "2 two 3".parse::<Instance>().unwrap_err();
        match err {
            InstanceError::InvalidInteger { field, token, .. } => {
                assert_eq!(field, "groupSize");
                assert_eq!(token, "two");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_non_positive() {
        let err = "0 2 3".parse::<Instance>().unwrap_err();
        assert!(matches!(
            err,
            InstanceError::NonPositive {
                field: "nbGroups",
                value: 0
            }
        ));
        assert!("2 2 -1".parse::<Instance>().is_err());
    }

    #[test]
    fn test_too_large() {
        let err = Instance::new(usize::MAX / 2, 4, 1).unwrap_err();
        assert!(matches!(err, InstanceError::TooLarge(_)));
    }

    #[test]
    fn test_meeting_table_too_large() {
        // About 2^45 assignments fit, 2^67 meeting expressions do not
        let err = Instance::new(1 << 22, 2, 1).unwrap_err();
        assert!(matches!(err, InstanceError::TooLarge(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = Instance::from_file("/nonexistent/instance.txt").unwrap_err();
        assert!(matches!(err, InstanceError::Io { .. }));
    }
}
