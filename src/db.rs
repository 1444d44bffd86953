pub mod user_repo;
pub use user_repo::UserRepository;
pub mod plant_repo;
pub use plant_repo::PlantRepository;
pub mod room_repo;
pub use room_repo::RoomRepository;
pub mod meeting_repo;
pub use meeting_repo::{MeetingRecord, MeetingRepository};
