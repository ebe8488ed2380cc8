pub mod careerspace;

pub use careerspace::{CareerspaceClient, parse_wage_range, split_location};
