pub mod clubs;
pub mod events;
pub mod handicap;
pub mod results;
pub mod series;
pub mod spinnakers;
pub mod yachts;
