pub mod accounts;
pub mod estimation;
pub mod export;
pub mod pitch_deck;
