//! Astro Guru terminal client
//!
//! Browse personas, read a profile and chat with the astro backend.

use astro_guru::api::{HttpAstroApi, LoggingApi};
use astro_guru::app::{parse_command, render, App, Command, View};
use astro_guru::config::AppConfig;
use astro_guru::persona::{builtin_personas, PersonaCatalog};
use astro_guru::runtime::{SessionHandle, SessionUpdate};
use astro_guru::state_machine::{BirthDetails, SessionContext};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// An open chat screen
struct ChatScreen {
    handle: SessionHandle,
    printer: JoinHandle<()>,
}

impl ChatScreen {
    fn close(self) {
        self.handle.close();
        self.printer.abort();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so they stay out of the transcript
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "astro_guru=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let config = AppConfig::from_env();
    tracing::info!(
        base_url = %config.base_url,
        require_birth_details = config.require_birth_details,
        "Starting astro guru client"
    );

    let api = Arc::new(LoggingApi::new(HttpAstroApi::new(&config)?));
    let catalog = PersonaCatalog::new(api.clone(), builtin_personas());

    println!("Loading cosmic guides...");
    let mut app = App::new(catalog.load().await);
    println!("{}", render::selection(&app));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut chat: Option<ChatScreen> = None;

    while let Some(line) = lines.next_line().await? {
        let Some(command) = parse_command(app.view(), &line) else {
            continue;
        };

        match command {
            Command::Quit => break,

            Command::Help => match app.view() {
                View::Chat(_) => println!("{}", render::chat_help(config.require_birth_details)),
                View::Detail(_) => {
                    println!("'chat' to start a consultation, 'back' to return, 'quit' to exit.");
                }
                View::Selection => println!("Enter a number to view a guide, or 'quit'."),
            },

            Command::Select(number) => match app.select(number) {
                Ok(persona) => {
                    let persona = catalog.load_reviews(persona).await;
                    println!("{}", render::detail(&persona));
                    app.update_selected(persona);
                }
                Err(e) => println!("{e}"),
            },

            Command::StartChat => match app.start_chat() {
                Ok(persona) => {
                    let context =
                        SessionContext::new(Some(persona.id.clone()), persona.name.clone())
                            .with_birth_details(config.require_birth_details);
                    println!(
                        "Chatting with {}. {}",
                        persona.name,
                        render::chat_help(config.require_birth_details)
                    );

                    let name = persona.name.clone();
                    let (handle, updates) = SessionHandle::spawn(api.clone(), context);
                    let printer = tokio::spawn(print_updates(name, updates));
                    chat = Some(ChatScreen { handle, printer });
                }
                Err(e) => println!("{e}"),
            },

            Command::Back => {
                if let Some(screen) = chat.take() {
                    screen.close();
                }
                match app.back() {
                    View::Detail(_) => {
                        if let Some(persona) = app.selected() {
                            println!("{}", render::detail(persona));
                        }
                    }
                    View::Selection | View::Chat(_) => println!("{}", render::selection(&app)),
                }
            }

            Command::Details => {
                let Some(screen) = &chat else { continue };
                if !config.require_birth_details {
                    println!("Birth details are not needed in this chat.");
                    continue;
                }
                let Some(details) = read_birth_details(&mut lines).await? else {
                    break;
                };
                if screen.handle.submit_details(details).await.is_err() {
                    println!("This chat has ended. Type /back to return.");
                }
            }

            Command::Say(text) => {
                let Some(screen) = &chat else { continue };
                if screen.handle.send_message(text).await.is_err() {
                    println!("This chat has ended. Type /back to return.");
                }
            }
        }
    }

    if let Some(screen) = chat.take() {
        screen.close();
    }
    Ok(())
}

/// Prompt for the four birth-detail fields. `None` on end of input.
async fn read_birth_details(
    lines: &mut Lines<BufReader<Stdin>>,
) -> std::io::Result<Option<BirthDetails>> {
    const PROMPTS: [&str; 4] = [
        "Name",
        "Date of birth (YYYY-MM-DD)",
        "Time of birth (HH:MM)",
        "Place of birth",
    ];

    let mut answers = Vec::with_capacity(PROMPTS.len());
    for prompt in PROMPTS {
        println!("{prompt}:");
        match lines.next_line().await? {
            Some(answer) => answers.push(answer),
            None => return Ok(None),
        }
    }
    let mut answers = answers.into_iter();
    let mut next = || answers.next().unwrap_or_default();
    Ok(Some(BirthDetails {
        name: next(),
        date: next(),
        time: next(),
        location: next(),
    }))
}

/// Print session updates until the session goes away
async fn print_updates(persona_name: String, mut updates: broadcast::Receiver<SessionUpdate>) {
    let mut was_busy = false;
    loop {
        match updates.recv().await {
            Ok(SessionUpdate::Message(message)) => {
                println!("{}", render::message(&persona_name, &message));
            }
            Ok(SessionUpdate::Rejected { reason }) => println!("! {reason}"),
            Ok(SessionUpdate::State(state)) => {
                let busy = state.is_busy();
                if busy && !was_busy {
                    println!("{persona_name} is consulting the stars...");
                }
                was_busy = busy;
            }
            Ok(SessionUpdate::ClearInput) => {}
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Chat printer fell behind");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
