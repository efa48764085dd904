//! Logical input tables (spec.md §6). Tabular ingestion format is a
//! non-goal; these types specify only the data a caller's own reader must
//! deliver. `MasterDataSource` is the seam a real ingestion layer plugs
//! into; `InMemoryDataSource` is the minimal implementation this crate
//! ships for its own tests.

use serde::{Deserialize, Serialize};

/// A row of the master venues table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawVenue {
    /// Owning company.
    pub company: String,
    /// Venue name.
    pub name: String,
    /// Raw capacity, before `buffer_capacity` is added.
    pub capacity: i64,
    /// Whether this venue is virtual.
    #[serde(default)]
    pub is_virtual: bool,
}

/// A row of the master trainers table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTrainer {
    /// Trainer identifier.
    pub id: String,
}

/// A row of the master course-trainer eligibility table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawCourseTrainerEligibility {
    /// Trainer identifier.
    pub trainer_id: String,
    /// Course or course-batch identity this trainer may teach.
    pub course_or_batch_identity: String,
}

/// A row of the master courses table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawCourse {
    /// Owning company.
    pub company: String,
    /// Course name.
    pub name: String,
    /// Optional grouping label, filtered by `course_stream` when set.
    #[serde(default)]
    pub stream: Option<String>,
    /// Raw duration in minutes; missing or non-positive falls back to
    /// `default_course_duration`.
    #[serde(default)]
    pub duration_minutes: Option<i64>,
    /// Optional ISO validity window lower bound.
    #[serde(default)]
    pub valid_start_date: Option<String>,
    /// Optional ISO validity window upper bound.
    #[serde(default)]
    pub valid_end_date: Option<String>,
}

/// A row of the master course sequence table (prerequisite edges, possibly
/// flagged as part of the global sequence).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawCourseSequence {
    /// The course this edge constrains.
    pub course: String,
    /// The prerequisite course.
    pub prerequisite: String,
    /// True if this edge also participates in the global sequence
    /// (spec.md §4.3 #11), as opposed to only the per-cohort ordering.
    #[serde(default)]
    pub is_global_sequence: bool,
}

/// A row of the master employees table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEmployee {
    /// Owning company.
    pub company: String,
    /// Employee (trainee) identifier.
    pub id: String,
    /// Free-form shift label ("Shift 1", "Shift 2", "Non Shift", ...).
    #[serde(default)]
    pub shift: Option<String>,
    /// Whether this employee may be scheduled on Saturdays.
    #[serde(default)]
    pub saturday_available: bool,
    /// Optional per-week shift overrides for weeks 1..4, used by stage 1.
    #[serde(default)]
    pub week1_shift: Option<String>,
    #[serde(default)]
    pub week2_shift: Option<String>,
    #[serde(default)]
    pub week3_shift: Option<String>,
    #[serde(default)]
    pub week4_shift: Option<String>,
}

/// A row of the master course-trainee enrollment table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEnrollment {
    /// Owning company.
    pub company: String,
    /// Employee (trainee) identifier.
    pub trainee_id: String,
    /// Course name.
    pub course: String,
    /// Truthy filter: rows where this is `false` are dropped before
    /// modeling (spec.md §6, "`course_exist` truthy filter").
    #[serde(default = "default_true")]
    pub course_exist: bool,
}

fn default_true() -> bool {
    true
}

/// The seven logical tables spec.md §6 lists as this system's inputs.
/// Implementations own ingestion (file format, database, HTTP — all
/// non-goals here); this crate only needs the materialized rows.
pub trait MasterDataSource {
    /// Master venues.
    fn venues(&self) -> Vec<RawVenue>;
    /// Master trainers.
    fn trainers(&self) -> Vec<RawTrainer>;
    /// Master course-trainer eligibility.
    fn trainer_eligibility(&self) -> Vec<RawCourseTrainerEligibility>;
    /// Master courses.
    fn courses(&self) -> Vec<RawCourse>;
    /// Master course sequence (prerequisites / global sequence).
    fn course_sequence(&self) -> Vec<RawCourseSequence>;
    /// Master employees.
    fn employees(&self) -> Vec<RawEmployee>;
    /// Master course-trainee enrollment.
    fn enrollment(&self) -> Vec<RawEnrollment>;
}

/// An in-memory `MasterDataSource`, the minimal implementation this repo
/// ships for its own tests (SPEC_FULL.md §4's "no file-format parser or
/// writer ships in this repo beyond a minimal in-memory implementation").
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InMemoryDataSource {
    /// Master venues.
    pub venues: Vec<RawVenue>,
    /// Master trainers.
    pub trainers: Vec<RawTrainer>,
    /// Master course-trainer eligibility.
    pub trainer_eligibility: Vec<RawCourseTrainerEligibility>,
    /// Master courses.
    pub courses: Vec<RawCourse>,
    /// Master course sequence.
    pub course_sequence: Vec<RawCourseSequence>,
    /// Master employees.
    pub employees: Vec<RawEmployee>,
    /// Master course-trainee enrollment.
    pub enrollment: Vec<RawEnrollment>,
}

impl MasterDataSource for InMemoryDataSource {
    fn venues(&self) -> Vec<RawVenue> {
        self.venues.clone()
    }

    fn trainers(&self) -> Vec<RawTrainer> {
        self.trainers.clone()
    }

    fn trainer_eligibility(&self) -> Vec<RawCourseTrainerEligibility> {
        self.trainer_eligibility.clone()
    }

    fn courses(&self) -> Vec<RawCourse> {
        self.courses.clone()
    }

    fn course_sequence(&self) -> Vec<RawCourseSequence> {
        self.course_sequence.clone()
    }

    fn employees(&self) -> Vec<RawEmployee> {
        self.employees.clone()
    }

    fn enrollment(&self) -> Vec<RawEnrollment> {
        self.enrollment.clone()
    }
}
