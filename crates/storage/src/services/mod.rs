pub mod corrected_time;
pub mod standings;
