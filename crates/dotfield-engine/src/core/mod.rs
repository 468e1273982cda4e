pub mod cursor;
pub mod schedule;
pub mod space;
pub mod time;
