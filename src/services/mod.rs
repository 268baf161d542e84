pub mod features;
pub mod filters;
pub mod providers;
pub mod recommendations;
pub mod taste_match;

pub use recommendations::RecommendationService;
pub use taste_match::calculate_taste_match;
