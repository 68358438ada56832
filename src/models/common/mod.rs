pub mod pagination;
pub mod response;
pub mod week;

pub use pagination::{PaginatedResponse, PaginationInfo, PaginationQuery};
pub use response::ApiResponse;
pub use week::{WeekOffsetQuery, WeekPage};
