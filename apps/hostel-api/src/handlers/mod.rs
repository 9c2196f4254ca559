mod dashboard;
mod directory;
mod health;
mod issues;
mod metrics;
mod rooms;
mod search;

pub use dashboard::{get_dashboard, notice_board};
pub use directory::{
    create_staff, get_student, list_floors, list_hostels, list_staff, list_students,
};
pub use health::health;
pub use issues::{list_issues, submit_issue, update_issue};
pub use metrics::get_metrics;
pub use rooms::{list_rooms, upload_room_image};
pub use search::search;
