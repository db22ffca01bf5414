pub mod assignment;
pub mod booking;
pub mod clock;
pub mod technician;
