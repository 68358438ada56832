pub mod extractor;
pub mod jwt;
pub mod parameter_error_handler;
pub mod password;
pub mod random_code;
pub mod sql;
pub mod validate;
pub mod week;

pub use extractor::{PersonRef, SafeIDI64, SafeStudentRef, SafeTeacherRef};
pub use parameter_error_handler::json_error_handler;
pub use parameter_error_handler::query_error_handler;
pub use sql::{escape_like_pattern, like_contains};
pub use week::current_week_window;
