//! Evaluation of answers to the chance question.

use snakes_ladders_core::{ChanceQuestion, Choice, Rejection};

/// Grades `choice`, rejecting options the question does not offer.
pub(crate) fn grade(question: &ChanceQuestion, choice: Choice) -> Result<bool, Rejection> {
    if !question.offers(choice) {
        return Err(Rejection::UnknownChoice {
            choice: choice.get(),
            options: question.options().len(),
        });
    }
    Ok(question.is_correct(choice))
}
