pub mod macros;
pub mod schedule;
pub mod status;
pub mod time;

pub use schedule::*;
pub use status::*;
pub use time::*;
