pub mod club;
pub mod event;
pub mod handicap;
pub mod patch;
pub mod result;
pub mod series;
pub mod spinnaker;
pub mod validation;
pub mod yacht;
