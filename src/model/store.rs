//! Observable container for the grid model

use crate::commands::{Cmd, Damage};
use crate::messages::Msg;
use crate::update::{update, Env};

use super::observer::{ChangeNotifier, SubscriptionId};
use super::GridModel;

/// Owns the [`GridModel`] and notifies subscribers after every dispatch
/// that produced damage
///
/// Notification happens synchronously, after `update` has committed its
/// changes, so a subscriber reading [`GridStore::state`] afterwards always
/// sees the committed state.
#[derive(Debug)]
pub struct GridStore {
    model: GridModel,
    notifier: ChangeNotifier,
}

impl GridStore {
    pub fn new(model: GridModel) -> Self {
        Self {
            model,
            notifier: ChangeNotifier::new(),
        }
    }

    /// Run one message through `update`, then notify
    pub fn dispatch(&mut self, env: &mut Env<'_>, msg: Msg) -> Option<Cmd> {
        let cmd = update(&mut self.model, env, msg);
        let damage = cmd.as_ref().map(Cmd::damage).unwrap_or_default();
        if damage.is_some() {
            self.notifier.notify(&damage);
        }
        cmd
    }

    /// Notify subscribers of damage that did not come from a message
    pub fn invalidate(&mut self, damage: Damage) {
        if damage.is_some() {
            self.notifier.notify(&damage);
        }
    }

    #[inline]
    pub fn state(&self) -> &GridModel {
        &self.model
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&Damage) + 'static) -> SubscriptionId {
        self.notifier.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.notifier.len()
    }

    pub fn into_model(self) -> GridModel {
        self.model
    }
}
