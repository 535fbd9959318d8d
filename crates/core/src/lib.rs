pub mod date;
pub mod record;
pub mod trip;

pub use date::{
    calendar_days_between, format_display_date, full_days_from, parse_date, parse_date_strict,
    DateError,
};
pub use record::{Direction, TravelRecord};
pub use trip::{pair_trips, Trip, NO_DEPARTURE_RECORDED, NO_RETURN_RECORDED};
