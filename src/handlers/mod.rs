//! Lambda handlers deployed by the walkthroughs.

pub mod do_something;
pub mod forward;
