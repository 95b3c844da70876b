pub mod reservation;
pub mod sale;
