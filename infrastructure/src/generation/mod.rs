//! Generation adapters: canned table talk and the keyword guesser.

pub mod canned;
pub mod keyword_guess;

pub use canned::CannedTextGenerator;
pub use keyword_guess::KeywordLocationGuesser;
