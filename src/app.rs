use std::io::{self, BufRead, Write};

use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::error::AppError;
use crate::knowledge::KnowledgeBase;
use crate::model::{GenerationParams, Generator, HttpGenerator, OfflineGenerator};
use crate::output::{
    HistoryTableOptions, SessionListOptions, output_history_json, output_reply_json,
    output_session_list_json, print_history_table, print_session_list,
};
use crate::responder::{Responder, Rule};
use crate::session::{ChatState, SessionController, SessionStore, validate_session_id};
use crate::utils::{Timezone, debug_enabled, set_debug};

/// Everything a responder borrows, built once per process
struct ChatRuntime {
    knowledge: KnowledgeBase,
    generator: Box<dyn Generator>,
    params: GenerationParams,
}

impl ChatRuntime {
    fn new(cli: &Cli, config: &Config) -> Self {
        let knowledge = KnowledgeBase::builtin().with_entries(&config.knowledge);
        let generator = build_generator(cli, config);
        if debug_enabled() {
            eprintln!(
                "Knowledge base: {} entries, generator: {}",
                knowledge.len(),
                generator.name()
            );
        }
        Self {
            knowledge,
            generator,
            params: config.model.generation_params(),
        }
    }

    fn responder(&self) -> Responder<'_> {
        Responder::new(&self.knowledge, self.generator.as_ref(), self.params)
    }
}

fn build_generator(cli: &Cli, config: &Config) -> Box<dyn Generator> {
    if cli.offline {
        return Box::new(OfflineGenerator);
    }
    let endpoint = cli.endpoint.as_deref().unwrap_or(&config.model.endpoint);
    Box::new(HttpGenerator::new(
        endpoint,
        config.model.api_token.as_deref(),
        config.model.timeout(),
        config.model.retries,
    ))
}

pub(crate) fn run(cli: &Cli, config: &Config) -> Result<(), AppError> {
    set_debug(cli.debug);

    let timezone = Timezone::parse(cli.timezone.as_deref())?;
    if let Some(id) = cli.command.as_ref().and_then(Commands::session_arg) {
        validate_session_id(id)?;
    }

    let store = SessionStore::new(
        cli.session_dir
            .clone()
            .unwrap_or_else(SessionStore::default_dir),
    );

    let chat_session = match &cli.command {
        Some(Commands::History { session }) => {
            return handle_history(&store, session, cli, timezone);
        }
        Some(Commands::Sessions) => {
            handle_sessions(&store, cli, timezone);
            return Ok(());
        }
        Some(Commands::Ask { message, session }) => {
            let runtime = ChatRuntime::new(cli, config);
            let responder = runtime.responder();
            let controller = SessionController::new(&responder, &store);
            handle_ask(&controller, message, session.as_deref(), cli.json);
            return Ok(());
        }
        Some(Commands::Chat { session }) => session.as_deref(),
        None => None,
    };

    let runtime = ChatRuntime::new(cli, config);
    let responder = runtime.responder();
    let controller = SessionController::new(&responder, &store);
    run_chat(&controller, chat_session, cli.use_color())
}

fn handle_ask(
    controller: &SessionController<'_>,
    message: &str,
    session: Option<&str>,
    json: bool,
) {
    let state = session.map(ChatState::for_session);
    let (reply, state) = controller.handle(message, state);

    if json {
        println!("{}", output_reply_json(&reply, &state));
    } else {
        println!("{}", reply.text);
        if let Some(id) = &state.session_id {
            eprintln!("Session: {id}");
        }
    }
}

fn run_chat(
    controller: &SessionController<'_>,
    session: Option<&str>,
    use_color: bool,
) -> Result<(), AppError> {
    let mut state = session.map(ChatState::for_session);
    let bot_label = if use_color {
        "\x1b[32mBot:\x1b[0m"
    } else {
        "Bot:"
    };

    println!("Chat with rulebot! Type 'bye' to quit.");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut input = Vec::new();
    loop {
        print!("You: ");
        stdout.flush()?;

        input.clear();
        if stdin.lock().read_until(b'\n', &mut input)? == 0 {
            println!();
            break;
        }

        // undecodable bytes become U+FFFD instead of ending the chat
        let line = String::from_utf8_lossy(&input);
        let message = line.trim();
        if message.is_empty() {
            continue;
        }

        let (reply, next) = controller.handle(message, state.take());
        println!("{bot_label} {}", reply.text);
        state = Some(next);

        if reply.rule == Rule::Farewell {
            break;
        }
    }

    if let Some(id) = state.and_then(|s| s.session_id) {
        eprintln!("Session: {id}");
    }
    Ok(())
}

fn handle_history(
    store: &SessionStore,
    session_id: &str,
    cli: &Cli,
    timezone: Timezone,
) -> Result<(), AppError> {
    if !store.exists(session_id) {
        return Err(AppError::SessionNotFound {
            id: session_id.to_string(),
        });
    }

    let session = store.load(session_id);
    if cli.json {
        println!("{}", output_history_json(session_id, &session));
    } else if session.is_empty() {
        println!("Session {session_id} has no turns.");
    } else {
        print_history_table(
            session_id,
            &session,
            HistoryTableOptions {
                use_color: cli.use_color(),
                timezone,
            },
        );
    }
    Ok(())
}

fn handle_sessions(store: &SessionStore, cli: &Cli, timezone: Timezone) {
    let summaries = store.list();

    if cli.json {
        println!("{}", output_session_list_json(&summaries, cli.order));
        return;
    }
    if summaries.is_empty() {
        println!("No sessions found in {}.", store.dir().display());
        return;
    }
    print_session_list(
        &summaries,
        SessionListOptions {
            order: cli.order,
            use_color: cli.use_color(),
            timezone,
        },
    );
}
