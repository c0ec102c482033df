pub mod calendar;
pub mod coordinates;
pub mod grid_point;
pub mod output_mode;
pub mod record;
pub mod series;
pub mod standard_year;
pub mod variable;
