pub mod kyiv_date_time;
pub mod time_frame;
pub mod time_of_day;
