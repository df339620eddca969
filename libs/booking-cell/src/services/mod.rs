pub mod booking;
pub mod search;

pub use booking::BookingService;
pub use search::SearchService;
