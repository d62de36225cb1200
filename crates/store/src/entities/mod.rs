//! Document models stored in the content store.

pub mod content_item;

pub use content_item::{
    AudioBody, ContentBody, ContentItem, ContentKind, ImageBody, PollBody, PollOption, Reaction,
    SurveyBody, SurveyOption, TextBody,
};
