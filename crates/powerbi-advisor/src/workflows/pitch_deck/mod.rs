//! Personalized pitch deck: questionnaire catalog, validation, slide
//! generation, and the downloadable proposal.

pub mod domain;
pub mod questionnaire;
pub mod report;
pub mod router;
pub mod service;
pub mod slides;

#[cfg(test)]
mod tests;

pub use domain::{PitchResponses, ResponseValue};
pub use questionnaire::{
    validate, Question, QuestionGroup, QuestionKind, QuestionOption, ResponseIssue,
    ValidationError,
};
pub use report::{PitchCompanyInfo, PitchDeckReport, PITCH_DECK_FILE_STEM};
pub use router::{pitch_deck_router, PitchDeckState};
pub use service::{PitchDeckPayload, PitchDeckRecord, PitchDeckService, PitchDeckServiceError};
pub use slides::{challenge_title, generate, PitchDeck, Slide, SlideContent};
