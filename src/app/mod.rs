pub mod room_name;
pub mod time;
