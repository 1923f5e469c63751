pub mod avatar;
pub mod form;
pub mod lookups;
pub mod personal_url;
pub mod record;

pub use form::{SpeakerAttributes, SpeakerForm, SpeakerIdentity, SpeakerParams};
pub use lookups::{MeetingOption, SpeakerLookups};
pub use record::ConferenceSpeaker;
