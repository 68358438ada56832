pub mod academic_reports;

pub mod admin;

pub mod auth;

pub mod classes;

pub mod classrooms;

pub mod groups;

pub mod students;

pub mod subjects;

pub mod system;

pub mod teachers;

#[cfg(test)]
mod tests;

pub use academic_reports::configure_academic_report_routes;
pub use admin::configure_admin_routes;
pub use auth::configure_auth_routes;
pub use classes::configure_classes_routes;
pub use classrooms::configure_classroom_routes;
pub use groups::configure_group_routes;
pub use students::configure_student_routes;
pub use subjects::configure_subject_routes;
pub use system::configure_system_routes;
pub use teachers::configure_teacher_routes;
