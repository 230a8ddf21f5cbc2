use std::{cell::RefCell, io, rc::Rc};

use ratzilla::event::KeyCode;
use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use singularity_idle::config::EngineConfig;
use singularity_idle::logging;
use singularity_idle::sim::actions::Command;
use singularity_idle::sim::catalog::Catalog;
use singularity_idle::sim::headlines::Headlines;
use singularity_idle::sim::render;
use singularity_idle::sim::storage::{LocalStorage, MemoryStore, SaveStore};
use singularity_idle::sim::Engine;

fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// localStorage, or an in-memory store if the browser refuses it
/// (private mode, disabled storage).
fn open_store() -> Box<dyn SaveStore> {
    match LocalStorage::open() {
        Ok(store) => Box::new(store),
        Err(e) => {
            logging::warn(&format!("{e}; progress will not survive a reload"));
            Box::new(MemoryStore::new())
        }
    }
}

/// Save when the tab is hidden or about to be closed.
fn install_lifecycle_hooks(engine: &Rc<RefCell<Engine>>) {
    let Some(window) = web_sys::window() else {
        return;
    };

    let on_unload = Closure::<dyn FnMut(web_sys::Event)>::new({
        let engine = engine.clone();
        move |_: web_sys::Event| {
            if let Ok(mut engine) = engine.try_borrow_mut() {
                engine.persist(now_ms());
            }
        }
    });
    if window
        .add_event_listener_with_callback("beforeunload", on_unload.as_ref().unchecked_ref())
        .is_err()
    {
        logging::warn("could not hook beforeunload");
    }
    on_unload.forget();

    let Some(document) = window.document() else {
        return;
    };
    let on_visibility = Closure::<dyn FnMut(web_sys::Event)>::new({
        let engine = engine.clone();
        let document = document.clone();
        move |_: web_sys::Event| {
            if document.visibility_state() != web_sys::VisibilityState::Hidden {
                return;
            }
            if let Ok(mut engine) = engine.try_borrow_mut() {
                engine.persist(now_ms());
            }
        }
    });
    if document
        .add_event_listener_with_callback("visibilitychange", on_visibility.as_ref().unchecked_ref())
        .is_err()
    {
        logging::warn("could not hook visibilitychange");
    }
    on_visibility.forget();
}

fn main() -> io::Result<()> {
    console_error_panic_hook::set_once();

    let engine = Rc::new(RefCell::new(Engine::boot(
        Catalog::builtin(),
        Headlines::builtin(),
        open_store(),
        EngineConfig::default(),
        now_ms(),
    )));
    install_lifecycle_hooks(&engine);

    let backend = DomBackend::new()?;
    let mut terminal = Terminal::new(backend)?;

    terminal.on_key_event({
        let engine = engine.clone();
        move |key_event| {
            let command = match key_event.code {
                KeyCode::Char(c) => Command::from_key(c),
                KeyCode::Enter => Some(Command::ConfirmPrestige),
                KeyCode::Esc => Some(Command::DeclinePrestige),
                _ => None,
            };
            if let Some(command) = command {
                engine.borrow_mut().handle(command, now_ms());
            }
        }
    });

    terminal.draw_web(move |f| {
        let area = f.area();
        let mut engine = engine.borrow_mut();
        engine.frame(now_ms());
        render::render(&engine, f, area);
    });

    Ok(())
}
