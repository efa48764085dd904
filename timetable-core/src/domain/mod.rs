//! Value types for the domain described in spec.md §3.

mod batch_assignment;
pub use self::batch_assignment::*;

mod course;
pub use self::course::*;

mod course_batch;
pub use self::course_batch::*;

mod group;
pub use self::group::*;

mod session;
pub use self::session::*;

mod trainee;
pub use self::trainee::*;

mod trainer;
pub use self::trainer::*;

mod venue;
pub use self::venue::*;
