use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{debug, info};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::editor::{Navigation, QueueEditor};

use super::app::{EditorApp, Msg};
use super::command::Command;
use super::view;

const INPUT_POLL: Duration = Duration::from_millis(100);

/// Run the interactive editor until the user quits or the queue is deleted.
/// Returns where the editor wants to navigate afterwards, if anywhere.
pub async fn run_editor(editor: QueueEditor, base_url: String) -> Result<Option<Navigation>> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let app = EditorApp::new(editor.clone(), base_url);
    editor.mount();
    let result = run_app(&mut terminal, app).await;
    editor.teardown();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result?;
    Ok(editor.navigation())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: EditorApp,
) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Msg>();

    loop {
        terminal.draw(|f| view::render(f, &mut app))?;

        while let Ok(msg) = rx.try_recv() {
            let command = app.update(msg);
            execute_command(command, &tx);
        }

        if app.should_quit() {
            info!("leaving editor for queue {}", app.editor().queue_id());
            return Ok(());
        }

        let poll = tokio::task::block_in_place(|| event::poll(INPUT_POLL))?;
        if poll {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    let command = app.update(Msg::Key(key));
                    execute_command(command, &tx);
                }
            }
        } else {
            tokio::task::yield_now().await;
        }
    }
}

fn execute_command(command: Command<Msg>, tx: &mpsc::UnboundedSender<Msg>) {
    match command {
        Command::None => {}
        Command::Perform(future) => {
            let tx = tx.clone();
            tokio::spawn(async move {
                let msg = future.await;
                if tx.send(msg).is_err() {
                    debug!("editor closed before action finished");
                }
            });
        }
    }
}
