// Application layer: the Social Golfer model built on top of the domain model,
// and the schedule read back from a solution

pub mod golfer_model;
pub mod instance;
pub mod lattice;
pub mod meeting;
pub mod partition;
pub mod redundancy;
pub mod schedule;

pub use golfer_model::SocialGolferModel;
pub use instance::{Instance, InstanceError};
pub use lattice::{Slot, VariableLattice};
pub use meeting::{MeetingTable, Pair, PairIndex};
pub use partition::{add_partition_constraints, PartitionCounts};
pub use redundancy::RedundancyObjective;
pub use schedule::{check_path, Schedule, ScheduleError, ScheduleViolation};
