pub mod category;
pub mod place;
pub mod style;

pub use category::{Category, category_label};
pub use place::{NO_ADDRESS, PHONE_UNAVAILABLE, ResolvedPlace, SearchOrigin};
pub use style::MapStyle;
