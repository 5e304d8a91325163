mod game;

use std::sync::Arc;

use dotenv::dotenv;
use game::bank::{level_hint, level_name, LevelBank};
use game::{Choice, GameError, GameState};
use teloxide::{
    dispatching::dialogue::{serializer::Json, ErasedStorage, SqliteStorage, Storage},
    prelude::*,
    types::{ChatId, KeyboardButton, KeyboardMarkup, ParseMode},
};

type QuestDialogue = Dialogue<State, ErasedStorage<State>>;
type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[derive(Clone, Default, serde::Serialize, serde::Deserialize)]
pub enum State {
    #[default]
    Start,
    ReceiveName,
    Playing {
        game: GameState,
    },
}

type SessionStorage = std::sync::Arc<ErasedStorage<State>>;

#[tokio::main]
async fn main() {
    dotenv().expect("Failed to load .env file");

    pretty_env_logger::init();
    log::info!("Starting Rational Function Quest bot...");

    let bot = Bot::from_env();

    println!("Establishing connection to the database...");
    let storage: SessionStorage = SqliteStorage::open("db.sqlite", Json)
        .await
        .unwrap()
        .erase();
    println!("Connection established");

    // The question bank is static and shared between all sessions
    let bank = Arc::new(LevelBank::standard());
    let bank_for_name = bank.clone();
    let bank_for_play = bank.clone();

    Dispatcher::builder(
        bot,
        Update::filter_message()
            .enter_dialogue::<Message, ErasedStorage<State>, State>()
            .branch(dptree::case![State::Start].endpoint(start))
            .branch(dptree::case![State::ReceiveName].endpoint(
                move |bot: Bot, dialogue: QuestDialogue, msg: Message| {
                    receive_name(bank_for_name.clone(), bot, dialogue, msg)
                },
            ))
            .branch(dptree::case![State::Playing { game }].endpoint(
                move |bot: Bot, dialogue: QuestDialogue, game: GameState, msg: Message| {
                    playing(bank_for_play.clone(), bot, dialogue, game, msg)
                },
            )),
    )
    .dependencies(dptree::deps![storage])
    .enable_ctrlc_handler()
    .build()
    .dispatch()
    .await;
}

const GREETING_TEXT: &str =
    "🎮 RATIONAL FUNCTION QUEST 🎮\n\nI'll show you a rational function and four graphs, and you pick the one that matches its asymptotes, holes and intercepts.\n\nEnter your name to start the quest! (up to 12 characters)";
const NEW_GAME: &str = "🔄 New Game";

async fn start(bot: Bot, dialogue: QuestDialogue, msg: Message) -> HandlerResult {
    bot.send_message(msg.chat.id, GREETING_TEXT).await?;

    dialogue.update(State::ReceiveName).await?;
    Ok(())
}

async fn receive_name(
    bank: Arc<LevelBank>,
    bot: Bot,
    dialogue: QuestDialogue,
    msg: Message,
) -> HandlerResult {
    let name = match msg.text() {
        Some(name) => name,
        None => {
            bot.send_message(msg.chat.id, "Please send your name as text")
                .await?;
            return Ok(());
        }
    };

    match GameState::start(name) {
        Ok(mut game) => {
            log::info!("{} started a quest", game.player_name);
            bot.send_message(
                msg.chat.id,
                format!(
                    "🚀 Welcome, {}! Your quest begins at level 1.",
                    game.player_name
                ),
            )
            .await?;

            game.ensure_question(&bank, &mut rand::thread_rng());
            send_question(&bot, msg.chat.id, &game).await?;
            dialogue.update(State::Playing { game }).await?;
        }
        Err(GameError::EmptyName) => {
            bot.send_message(msg.chat.id, "Please enter a name to start the quest!")
                .await?;
        }
        Err(GameError::NameTooLong { .. }) => {
            bot.send_message(
                msg.chat.id,
                "That name is too long, up to 12 characters please!",
            )
            .await?;
        }
        Err(err) => {
            bot.send_message(msg.chat.id, err.to_string()).await?;
        }
    }
    Ok(())
}

async fn playing(
    bank: Arc<LevelBank>,
    bot: Bot,
    dialogue: QuestDialogue,
    mut game: GameState,
    msg: Message,
) -> HandlerResult {
    let text = match msg.text() {
        Some(text) => text,
        None => {
            bot.send_message(msg.chat.id, "Please answer with A, B, C or D")
                .await?;
            return Ok(());
        }
    };

    if text == NEW_GAME {
        log::info!("{} reset their quest", game.player_name);
        dialogue.update(State::ReceiveName).await?;
        bot.send_message(
            msg.chat.id,
            "Starting over! Enter your name to begin a new quest.",
        )
        .await?;
        return Ok(());
    }

    let choice = match Choice::parse(text) {
        Some(choice) => choice,
        None => {
            bot.send_message(msg.chat.id, "Please answer with A, B, C or D")
                .await?;
            return Ok(());
        }
    };

    let outcome = match game.submit_answer(choice) {
        Ok(outcome) => outcome,
        Err(GameError::NoActiveQuestion) => {
            // The stored dialogue can predate the current question (e.g. the
            // bot restarted mid-session). Re-ask instead of scoring.
            game.ensure_question(&bank, &mut rand::thread_rng());
            send_question(&bot, msg.chat.id, &game).await?;
            dialogue.update(State::Playing { game }).await?;
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    if outcome.correct {
        bot.send_message(
            msg.chat.id,
            format!("🎉 Correct! Great job! (+{} points)", outcome.score_delta),
        )
        .await?;
    } else {
        bot.send_message(
            msg.chat.id,
            format!(
                "❌ Incorrect! The correct answer was {}",
                outcome.correct_choice
            ),
        )
        .await?;
    }

    if outcome.leveled_up {
        bot.send_message(
            msg.chat.id,
            format!(
                "🎊 Level Up! Welcome to the {} level!",
                level_name(outcome.new_level)
            ),
        )
        .await?;
    }

    game.ensure_question(&bank, &mut rand::thread_rng());
    send_question(&bot, msg.chat.id, &game).await?;
    dialogue.update(State::Playing { game }).await?;
    Ok(())
}

/// Shows the session header, the function, the four graph options and the
/// answer keyboard. Callers make sure a question is active first.
async fn send_question(bot: &Bot, chat_id: ChatId, game: &GameState) -> HandlerResult {
    let question = match &game.current_question {
        Some(question) => question,
        None => return Ok(()),
    };

    let header = format!(
        "🏆 Score: {} | {} - Level {} | 🎯 Accuracy: {:.1}%\n👤 {} | ✅ {} of {} correct",
        game.score,
        level_name(game.current_level),
        game.current_level,
        game.accuracy(),
        game.player_name,
        game.correct_answers,
        game.total_questions,
    );
    bot.send_message(chat_id, header).await?;

    bot.send_message(
        chat_id,
        format!(
            "<code>{}</code>\n\n📊 Choose the correct graph!\nLook for vertical asymptotes, horizontal asymptotes, holes and intercepts.\n\n💡 {}",
            question.function,
            level_hint(game.current_level)
        ),
    )
    .parse_mode(ParseMode::Html)
    .await?;

    for option in Choice::ALL {
        let graph = game::graph::render_option(question, option);
        bot.send_message(chat_id, format!("<pre>{}</pre>", graph))
            .parse_mode(ParseMode::Html)
            .await?;
    }

    let keyboard = KeyboardMarkup::new(vec![
        Choice::ALL
            .iter()
            .map(|choice| KeyboardButton::new(choice.to_string()))
            .collect::<Vec<_>>(),
        vec![KeyboardButton::new(NEW_GAME)],
    ]);
    bot.send_message(chat_id, "Select your answer:")
        .reply_markup(keyboard)
        .await?;
    Ok(())
}
