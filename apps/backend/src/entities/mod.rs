pub mod rooms;

pub use rooms::Entity as Rooms;
pub use rooms::Model as Room;
