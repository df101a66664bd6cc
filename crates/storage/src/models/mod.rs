mod choices;
mod event;
mod race_result;
mod series;
mod spinnaker;
mod yacht;
mod yacht_club;

pub use choices::{CompletionStatus, SpinnakerClass, YachtClass};
pub use event::Event;
pub use race_result::RaceResult;
pub use series::Series;
pub use spinnaker::Spinnaker;
pub use yacht::{Yacht, YachtHandicap};
pub use yacht_club::YachtClub;
