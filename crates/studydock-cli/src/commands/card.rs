//! Flashcard commands. A review spans several invocations: `review` shows a
//! question, `reveal` its answer, `grade` scores it.

use clap::{Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::json;
use studydock_core::{Event, Flashcard, ReviewState};

use super::{not_found, open_context, print_json, CmdResult, Context};

#[derive(Subcommand)]
pub enum CardAction {
    /// Create a flashcard
    Add {
        question: String,
        answer: String,
        /// Subject name (default: General)
        #[arg(long)]
        subject: Option<String>,
    },
    /// List flashcards with their accuracy
    List {
        #[arg(long)]
        subject: Option<String>,
    },
    /// Delete a flashcard
    Delete {
        /// Card ID
        id: String,
    },
    /// Start reviewing a random card
    Review,
    /// Show the answer of the card under review
    Reveal,
    /// Score the revealed card
    Grade {
        #[arg(value_enum)]
        verdict: Verdict,
    },
    /// Abandon the review without scoring
    Stop,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Verdict {
    Correct,
    Incorrect,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CardRow<'a> {
    #[serde(flatten)]
    card: &'a Flashcard,
    accuracy_pct: Option<u32>,
}

/// What the reviewer may see. The answer stays hidden until revealed.
#[derive(Serialize)]
struct ReviewView<'a> {
    event: Option<Event>,
    #[serde(flatten)]
    state: &'a ReviewState,
    #[serde(skip_serializing_if = "Option::is_none")]
    question: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    answer: Option<&'a str>,
}

fn show_review(ctx: &Context, event: Option<Event>) -> CmdResult {
    let state = ctx.review().state();
    let card = ctx.reviewing_card();
    let revealed = matches!(state, ReviewState::ShowingAnswer { .. });
    print_json(&ReviewView {
        event,
        state,
        question: card.map(|c| c.question.as_str()),
        answer: card.filter(|_| revealed).map(|c| c.answer.as_str()),
    })
}

pub fn run(action: CardAction) -> CmdResult {
    let (mut ctx, _) = open_context()?;

    match action {
        CardAction::Add {
            question,
            answer,
            subject,
        } => {
            let card = ctx
                .add_flashcard(&question, &answer, subject.as_deref())
                .ok_or("question and answer must not be blank")?;
            print_json(&card)?;
        }
        CardAction::List { subject } => {
            let rows: Vec<CardRow<'_>> = ctx
                .flashcards()
                .iter()
                .filter(|c| subject.as_deref().map_or(true, |s| c.subject == s))
                .map(|card| CardRow {
                    card,
                    accuracy_pct: card.accuracy_pct(),
                })
                .collect();
            print_json(&rows)?;
        }
        CardAction::Delete { id } => {
            if !ctx.delete_flashcard(&id) {
                return Err(not_found("flashcard", &id));
            }
            print_json(&json!({ "deleted": id }))?;
        }
        CardAction::Review => {
            let event = ctx.start_review();
            show_review(&ctx, event)?;
        }
        CardAction::Reveal => {
            let event = ctx.reveal_answer();
            show_review(&ctx, event)?;
        }
        CardAction::Grade { verdict } => {
            let event = ctx.grade_card(matches!(verdict, Verdict::Correct));
            show_review(&ctx, event)?;
        }
        CardAction::Stop => {
            let event = ctx.stop_review();
            show_review(&ctx, event)?;
        }
    }
    Ok(())
}
