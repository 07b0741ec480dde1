pub mod proximity;

pub use proximity::{MAX_RESULTS, build_places, format_address};
