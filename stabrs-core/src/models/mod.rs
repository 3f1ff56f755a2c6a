pub mod interval;
pub mod region;

// re-export for cleaner imports
pub use self::interval::{Interval, RecordWrite};
pub use self::region::Region;
