//! Feed business logic services.

#![allow(missing_docs)]

pub mod content;
pub mod poll;
pub mod reaction;
pub mod survey;
pub mod view;

pub use content::{
    ContentService, CreateAudioInput, CreateImageInput, CreatePollInput, CreateSurveyInput,
    CreateTextInput,
};
pub use poll::{PollService, PollStatus};
pub use reaction::ReactionService;
pub use survey::{SurveyService, SurveyStatus};
pub use view::ViewService;
