//! # Advanced Analyzers
//!
//! Features built on top of the core pipeline: location identification from an
//! uploaded photo, historical comparison of a location, "what if" urban scenario
//! simulation, and business-potential comparison across cities.

pub mod multi_city;
pub mod photo;
pub mod time_travel;
pub mod what_if;

pub use multi_city::compare_cities;
pub use photo::PhotoAnalyzer;
pub use time_travel::TimeTravelAnalyzer;
pub use what_if::simulate_scenario;
