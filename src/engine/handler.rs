//! engine::handler
//!
//! The callback side of dispatch.
//!
//! A verb's callback receives a [`VerbCall`]: the fully merged options plus
//! the console and settings store it may use. It returns the process exit
//! status, or a [`CallbackError`] which the dispatcher propagates unchanged.
//!
//! Any `Fn(&mut VerbCall) -> Result<i32, CallbackError>` is a handler.
//!
//! # Example
//!
//! ```
//! use lets::engine::{CallbackError, VerbCall, VerbHandler};
//!
//! fn greet(call: &mut VerbCall<'_>) -> Result<i32, CallbackError> {
//!     let name = call.options.text("name").unwrap_or("world").to_string();
//!     call.console.print(format!("hello {}", name));
//!     Ok(0)
//! }
//!
//! let handler: Box<dyn VerbHandler> = Box::new(greet);
//! # let _ = handler;
//! ```

use crate::core::schema::OptionBag;
use crate::core::types::VerbId;
use crate::settings::{SettingDef, SettingValue, SettingsStore};
use crate::ui::output::Console;

use super::dispatch::Dispatcher;
use super::error::CallbackError;

/// A verb callback.
pub trait VerbHandler: Send + Sync {
    /// Run the verb with its merged options.
    fn invoke(&self, call: &mut VerbCall<'_>) -> Result<i32, CallbackError>;
}

impl<F> VerbHandler for F
where
    F: Fn(&mut VerbCall<'_>) -> Result<i32, CallbackError> + Send + Sync,
{
    fn invoke(&self, call: &mut VerbCall<'_>) -> Result<i32, CallbackError> {
        self(call)
    }
}

/// Everything a callback gets to work with for one dispatch.
pub struct VerbCall<'a> {
    pub verb: &'a VerbId,
    pub options: OptionBag,
    pub console: &'a mut Console,
    pub store: &'a dyn SettingsStore,
    pub dispatcher: &'a Dispatcher,
}

impl VerbCall<'_> {
    /// Resolve a `[context.]name` setting, protected settings included.
    pub fn setting_def(&self, token: &str) -> Result<&SettingDef, CallbackError> {
        Ok(self.dispatcher.settings().lookup(token)?)
    }

    /// Current value of a setting: stored, else its default.
    pub fn setting(&self, token: &str) -> Result<SettingValue, CallbackError> {
        let def = self.setting_def(token)?;
        Ok(self.dispatcher.settings().value_of(def, self.store)?)
    }

    /// Persist a setting value. Unchanged values are not rewritten.
    pub fn set_setting(&self, token: &str, value: SettingValue) -> Result<(), CallbackError> {
        let def = self.setting_def(token)?;
        let key = def.key();
        if self.store.get(&key)?.as_ref() == Some(&value) {
            tracing::debug!(%key, "setting unchanged");
            return Ok(());
        }
        self.store.set(&key, value)?;
        Ok(())
    }
}
