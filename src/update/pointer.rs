//! Pointer message handlers

use crate::commands::Cmd;
use crate::gesture::GestureContext;
use crate::messages::PointerMsg;
use crate::model::GridModel;

use super::Env;

pub fn update_pointer(model: &mut GridModel, env: &mut Env<'_>, msg: PointerMsg) -> Option<Cmd> {
    let GridModel { view, gestures, .. } = model;
    let mut ctx = GestureContext::new(view, &mut *env.store, &mut *env.transport);

    match msg {
        PointerMsg::Down(event) => gestures.pointer_down(&mut ctx, event),
        PointerMsg::Move(event) => gestures.pointer_move(&mut ctx, event),
        PointerMsg::Up(event) => gestures.pointer_up(&mut ctx, event),
        // The secondary press already opened the menu
        PointerMsg::ContextMenu(_) => None,
    }
}
