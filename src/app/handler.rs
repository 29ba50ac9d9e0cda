//! Input handling — maps key/mouse events to state mutations.
//!
//! The handler never touches the network.  Navigation that needs a fetch
//! (fallback pagination, reload) is left in `pending_navigation` for the
//! event loop to act on.

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::config::Action;

use super::state::AppState;

/// Card rows scrolled per mouse-wheel notch.
const WHEEL_ROWS: isize = 1;

/// Process a key event.
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    if key.kind == KeyEventKind::Release {
        return;
    }

    // Ctrl+c always quits.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    let Some(action) = state.config.match_key(key) else {
        return;
    };

    let count = state.view.grid.len();
    let gs = &mut state.grid_state;
    match action {
        Action::Quit => {
            state.should_quit = true;
            return;
        }
        Action::MoveUp => gs.select_up(1),
        Action::MoveDown => gs.select_down(1, count),
        Action::MoveLeft => gs.select_prev(),
        Action::MoveRight => gs.select_next(count),
        Action::PageUp => {
            let rows = gs.page_rows();
            gs.select_up(rows);
        }
        Action::PageDown => {
            let rows = gs.page_rows();
            gs.select_down(rows, count);
        }
        Action::Top => gs.selected = 0,
        Action::Bottom => gs.select_last(count),
        Action::OpenMovie => {
            open_selected(state);
            return;
        }
        Action::NextPage => {
            fallback_navigate(state, Direction::Next);
            return;
        }
        Action::PrevPage => {
            fallback_navigate(state, Direction::Prev);
            return;
        }
        Action::Reload => {
            reload(state);
            return;
        }
    }
    gs.clamp_scroll();
}

/// Process a mouse event: wheel scrolls, left click selects, double
/// selection of the same card opens it.
pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent) {
    let count = state.view.grid.len();
    match mouse.kind {
        MouseEventKind::ScrollDown => state.grid_state.scroll_by(WHEEL_ROWS, count),
        MouseEventKind::ScrollUp => state.grid_state.scroll_by(-WHEEL_ROWS, count),
        MouseEventKind::Down(MouseButton::Left) => {
            let hit = state.grid_state.card_at(
                mouse.column,
                mouse.row,
                state.config.card_width,
                count,
            );
            if let Some(idx) = hit {
                if idx == state.grid_state.selected {
                    open_selected(state);
                } else {
                    state.grid_state.selected = idx;
                }
            }
        }
        _ => {}
    }
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Next,
    Prev,
}

fn open_selected(state: &mut AppState) {
    let Some(card) = state.selected_card() else {
        return;
    };
    let link = state.card_link(card);
    if let Some(link) = link {
        state.opened_link = Some(link);
        state.should_quit = true;
    }
}

/// Static pagination is only offered once automatic loading has failed.
fn fallback_navigate(state: &mut AppState, direction: Direction) {
    if !state.view.grid.indicators().fallback_pagination {
        return;
    }
    let Some(loader) = state.view.loader.as_ref() else {
        return;
    };
    let paging = loader.state();
    let target = match direction {
        Direction::Next if paging.current_page() < paging.total_pages() => {
            paging.current_page() + 1
        }
        Direction::Prev if state.view.first_page > 1 => state.view.first_page - 1,
        _ => return,
    };
    tracing::info!(page = target, "fallback pagination");
    state.pending_navigation = Some(target);
}

/// Re-open the view on its first page when it could not be opened at all.
fn reload(state: &mut AppState) {
    if state.view.open_error.is_some() {
        state.pending_navigation = Some(state.view.first_page);
    }
}
