// Schedule extraction, output format and validation
//
// Output format:
//   - the objective value
//   - for each week and each group, the golfers of the group
//     (nbWeeks x nbGroups lines), with a blank line after each week.

use std::ffi::OsString;
use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::domain::{Solution, SolutionStatus};

use super::golfer_model::SocialGolferModel;
use super::instance::Instance;
use super::lattice::Slot;
use super::meeting::{Pair, PairIndex};

/// Errors raised while extracting, reading or writing a schedule
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("No solution found: {0}")]
    NoSolution(SolutionStatus),

    #[error("Cannot write schedule to '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Malformed schedule at line {line}: {reason}")]
    Malformed { line: usize, reason: String },
}

/// First broken partition invariant found in a schedule
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleViolation {
    #[error("week {week}, group {group}: golfer {golfer} does not exist")]
    UnknownGolfer {
        week: usize,
        group: usize,
        golfer: usize,
    },

    #[error("week {week}: golfer {golfer} plays in more than one group")]
    PlaysTwice { week: usize, golfer: usize },

    #[error("week {week}: golfer {golfer} does not play")]
    MissingGolfer { week: usize, golfer: usize },

    #[error("{weeks} weeks instead of {expected}")]
    WrongWeekCount { weeks: usize, expected: usize },

    #[error("week {week}: {groups} groups instead of {expected}")]
    WrongGroupCount {
        week: usize,
        groups: usize,
        expected: usize,
    },

    #[error("week {week}, group {group}: {size} golfers instead of {expected}")]
    WrongGroupSize {
        week: usize,
        group: usize,
        size: usize,
        expected: usize,
    },
}

/// Weekly groups of a solved instance plus the reported objective
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    instance: Instance,
    objective: i64,
    /// Golfers of each (week, group), `week * nbGroups + group`, ascending
    groups: Vec<Vec<usize>>,
}

impl Schedule {
    /// Reads the schedule out of an engine solution
    ///
    /// Refuses solutions without an incumbent instead of reading unset
    /// variable values.
    pub fn extract(sgm: &SocialGolferModel, solution: &Solution) -> Result<Self, ScheduleError> {
        let objective = match solution.objective_value {
            Some(objective) if solution.is_feasible() => objective,
            _ => return Err(ScheduleError::NoSolution(solution.status)),
        };

        let instance = *sgm.instance();
        let lattice = sgm.lattice();
        let mut groups = Vec::with_capacity(instance.nb_weeks() * instance.nb_groups());
        for w in 0..instance.nb_weeks() {
            for gr in 0..instance.nb_groups() {
                let members: Vec<usize> = (0..instance.nb_golfers())
                    .filter(|&gf| lattice.value(solution, Slot::new(w, gr, gf)) == Some(true))
                    .collect();
                groups.push(members);
            }
        }

        Ok(Self {
            instance,
            objective,
            groups,
        })
    }

    /// Builds a schedule from explicit groups, `groups[week][group]`
    ///
    /// Rejects inputs that do not have `nbWeeks` weeks of `nbGroups` groups.
    /// Group contents are checked by [`Schedule::validate`].
    pub fn from_groups(
        instance: Instance,
        objective: i64,
        groups: Vec<Vec<Vec<usize>>>,
    ) -> Result<Self, ScheduleViolation> {
        if groups.len() != instance.nb_weeks() {
            return Err(ScheduleViolation::WrongWeekCount {
                weeks: groups.len(),
                expected: instance.nb_weeks(),
            });
        }
        if let Some((week, week_groups)) = groups
            .iter()
            .enumerate()
            .find(|(_, week_groups)| week_groups.len() != instance.nb_groups())
        {
            return Err(ScheduleViolation::WrongGroupCount {
                week,
                groups: week_groups.len(),
                expected: instance.nb_groups(),
            });
        }

        let mut flat: Vec<Vec<usize>> = groups.into_iter().flatten().collect();
        for members in &mut flat {
            members.sort_unstable();
        }
        Ok(Self {
            instance,
            objective,
            groups: flat,
        })
    }

    /// Parses the output format back for `instance`
    pub fn parse(text: &str, instance: Instance) -> Result<Self, ScheduleError> {
        let lines: Vec<&str> = text.lines().collect();
        let malformed = |line: usize, reason: String| ScheduleError::Malformed { line, reason };

        let first = lines
            .first()
            .ok_or_else(|| malformed(1, "missing objective value".into()))?;
        let objective = first
            .trim()
            .parse::<i64>()
            .map_err(|e| malformed(1, format!("invalid objective '{}': {}", first.trim(), e)))?;

        let mut groups = Vec::with_capacity(instance.nb_weeks() * instance.nb_groups());
        let mut idx = 1;
        for w in 0..instance.nb_weeks() {
            for gr in 0..instance.nb_groups() {
                let line = lines.get(idx).ok_or_else(|| {
                    malformed(idx + 1, format!("missing line for week {} group {}", w, gr))
                })?;
                let mut members = line
                    .split_whitespace()
                    .map(|token| {
                        token.parse::<usize>().map_err(|e| {
                            malformed(idx + 1, format!("invalid golfer '{}': {}", token, e))
                        })
                    })
                    .collect::<Result<Vec<usize>, ScheduleError>>()?;
                members.sort_unstable();
                groups.push(members);
                idx += 1;
            }
            match lines.get(idx) {
                Some(line) if !line.trim().is_empty() => {
                    return Err(malformed(
                        idx + 1,
                        format!("expected a blank line after week {}", w),
                    ));
                }
                _ => idx += 1,
            }
        }

        Ok(Self {
            instance,
            objective,
            groups,
        })
    }

    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    /// Objective value reported by the engine
    pub fn objective(&self) -> i64 {
        self.objective
    }

    /// Golfers of `group` on `week`, ascending
    ///
    /// Panics if `week` or `group` is outside the instance.
    pub fn group(&self, week: usize, group: usize) -> &[usize] {
        assert!(week < self.instance.nb_weeks() && group < self.instance.nb_groups());
        &self.groups[week * self.instance.nb_groups() + group]
    }

    /// Groups of each week, in week order
    pub fn weeks(&self) -> impl Iterator<Item = &[Vec<usize>]> {
        self.groups.chunks(self.instance.nb_groups())
    }

    /// Checks that there are `nbWeeks` weeks of `nbGroups` groups and that
    /// every week partitions the golfers into groups of `groupSize`
    pub fn validate(&self) -> Result<(), ScheduleViolation> {
        let nb_golfers = self.instance.nb_golfers();
        let expected = self.instance.group_size();

        self.check_shape()?;
        for (week, groups) in self.weeks().enumerate() {
            let mut has_played = vec![false; nb_golfers];
            for (group, members) in groups.iter().enumerate() {
                for &golfer in members {
                    if golfer >= nb_golfers {
                        return Err(ScheduleViolation::UnknownGolfer {
                            week,
                            group,
                            golfer,
                        });
                    }
                    if has_played[golfer] {
                        return Err(ScheduleViolation::PlaysTwice { week, golfer });
                    }
                    has_played[golfer] = true;
                }
            }
            if let Some(golfer) = has_played.iter().position(|&played| !played) {
                return Err(ScheduleViolation::MissingGolfer { week, golfer });
            }
            for (group, members) in groups.iter().enumerate() {
                if members.len() != expected {
                    return Err(ScheduleViolation::WrongGroupSize {
                        week,
                        group,
                        size: members.len(),
                        expected,
                    });
                }
            }
        }
        Ok(())
    }

    fn check_shape(&self) -> Result<(), ScheduleViolation> {
        let nb_groups = self.instance.nb_groups();
        if let Some((week, groups)) = self
            .weeks()
            .enumerate()
            .find(|(_, groups)| groups.len() != nb_groups)
        {
            return Err(ScheduleViolation::WrongGroupCount {
                week,
                groups: groups.len(),
                expected: nb_groups,
            });
        }
        let weeks = self.groups.len() / nb_groups;
        if weeks != self.instance.nb_weeks() {
            return Err(ScheduleViolation::WrongWeekCount {
                weeks,
                expected: self.instance.nb_weeks(),
            });
        }
        Ok(())
    }

    /// Number of (week, group) slots each pair shares, in pair index order
    ///
    /// Golfers outside the instance are ignored.
    pub fn pair_meeting_counts(&self) -> Vec<u32> {
        let nb_golfers = self.instance.nb_golfers();
        let pairs = PairIndex::new(nb_golfers);
        let mut counts = vec![0u32; pairs.len()];

        for members in &self.groups {
            for (i, &a) in members.iter().enumerate() {
                for &b in &members[i + 1..] {
                    if a >= nb_golfers || b >= nb_golfers {
                        continue;
                    }
                    if let Some(pair) = Pair::new(a, b) {
                        counts[pairs.index(pair)] += 1;
                    }
                }
            }
        }
        counts
    }

    /// Objective recomputed from the groups alone:
    /// `Σ_pairs max(meetings - 1, 0)`
    pub fn redundant_meetings(&self) -> i64 {
        self.pair_meeting_counts()
            .into_iter()
            .map(|count| i64::from(count.saturating_sub(1)))
            .sum()
    }

    /// Valid partition in which no pair of golfers meets twice
    pub fn is_perfect(&self) -> bool {
        self.validate().is_ok() && self.pair_meeting_counts().iter().all(|&c| c <= 1)
    }

    /// Writes the schedule in the output format
    pub fn write_to<W: Write>(&self, mut out: W) -> io::Result<()> {
        write!(out, "{}", self)?;
        out.flush()
    }

    /// Writes the schedule to `path`, creating or truncating it
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ScheduleError> {
        let path = path.as_ref();
        let io_error = |source| ScheduleError::Io {
            path: path.display().to_string(),
            source,
        };
        let file = File::create(path).map_err(io_error)?;
        self.write_to(BufWriter::new(file)).map_err(io_error)
    }

    /// Writes `valid` or `invalid` to `<path>.check`, depending on
    /// [`Schedule::is_perfect`]. Returns the path written.
    pub fn save_check(&self, path: impl AsRef<Path>) -> Result<PathBuf, ScheduleError> {
        let check = check_path(path.as_ref());
        let verdict = if self.is_perfect() { "valid\n" } else { "invalid\n" };
        std::fs::write(&check, verdict).map_err(|source| ScheduleError::Io {
            path: check.display().to_string(),
            source,
        })?;
        Ok(check)
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.objective)?;
        for groups in self.weeks() {
            for members in groups {
                for golfer in members {
                    write!(f, "{} ", golfer)?;
                }
                writeln!(f)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// `<path>.check`, next to the schedule file
pub fn check_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".check");
    PathBuf::from(name)
}
