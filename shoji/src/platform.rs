use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;

use crate::core::WindowHandle;

/// Identifier of a registered window message.
pub type MessageId = u32;

/// Registered window messages start here on Windows.
const FIRST_REGISTERED_MESSAGE: MessageId = 0xC000;

/// Only the native service raises these outside of tests.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(not(windows), allow(dead_code))]
pub enum HookError {
    #[error("hook library {0} is not available")]
    LibraryUnavailable(String),
    #[error("failed to subclass window {0}")]
    SubclassFailed(WindowHandle),
    #[error("failed to unsubclass window {0}")]
    UnsubclassFailed(WindowHandle),
    #[error("failed to register window message {0:?}")]
    RegisterMessageFailed(String),
    #[error("failed to send message {message:#x} to window {window}")]
    SendFailed {
        window: WindowHandle,
        message: MessageId,
    },
}

/// Native window hooking primitives.
/// This abstraction allows mocking in tests.
pub trait HookService {
    /// Redirect the window's message processing through the hook library.
    /// `manager` is the window manager's own window, which the hook reports to.
    fn subclass(
        &self,
        manager: WindowHandle,
        window: WindowHandle,
        use_64bit_path: bool,
    ) -> Result<(), HookError>;
    fn unsubclass(&self, window: WindowHandle) -> Result<(), HookError>;
    /// Same name always yields the same id within a process.
    fn register_message(&self, name: &str) -> Result<MessageId, HookError>;
    /// Fire-and-forget: does not wait for the window to process the message.
    fn send_notify_message(&self, window: WindowHandle, message: MessageId)
        -> Result<(), HookError>;
}

/// A platform call as recorded by [`DryRunHookService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookCall {
    Subclass {
        window: WindowHandle,
        use_64bit_path: bool,
    },
    Unsubclass {
        window: WindowHandle,
    },
    SendNotify {
        window: WindowHandle,
        message: String,
    },
}

impl fmt::Display for HookCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookCall::Subclass {
                window,
                use_64bit_path,
            } => write!(
                f,
                "subclass {} ({}-bit hook)",
                window,
                if *use_64bit_path { 64 } else { 32 }
            ),
            HookCall::Unsubclass { window } => write!(f, "unsubclass {}", window),
            HookCall::SendNotify { window, message } => write!(f, "notify {} {}", window, message),
        }
    }
}

/// Hook service that only records and logs what would be done.
/// Never fails.
#[derive(Default)]
pub struct DryRunHookService {
    calls: RefCell<Vec<HookCall>>,
    messages: RefCell<HashMap<String, MessageId>>,
}

impl DryRunHookService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return the calls recorded so far.
    pub fn take_calls(&self) -> Vec<HookCall> {
        std::mem::take(&mut *self.calls.borrow_mut())
    }

    fn message_name(&self, message: MessageId) -> String {
        self.messages
            .borrow()
            .iter()
            .find(|(_, id)| **id == message)
            .map(|(name, _)| name.clone())
            .unwrap_or_else(|| format!("{:#x}", message))
    }

    fn record(&self, call: HookCall) {
        tracing::debug!("[dry-run] {}", call);
        self.calls.borrow_mut().push(call);
    }
}

impl HookService for DryRunHookService {
    fn subclass(
        &self,
        _manager: WindowHandle,
        window: WindowHandle,
        use_64bit_path: bool,
    ) -> Result<(), HookError> {
        self.record(HookCall::Subclass {
            window,
            use_64bit_path,
        });
        Ok(())
    }

    fn unsubclass(&self, window: WindowHandle) -> Result<(), HookError> {
        self.record(HookCall::Unsubclass { window });
        Ok(())
    }

    fn register_message(&self, name: &str) -> Result<MessageId, HookError> {
        let mut messages = self.messages.borrow_mut();
        let next = FIRST_REGISTERED_MESSAGE + messages.len() as MessageId;
        let id = *messages.entry(name.to_string()).or_insert(next);
        Ok(id)
    }

    fn send_notify_message(
        &self,
        window: WindowHandle,
        message: MessageId,
    ) -> Result<(), HookError> {
        let message = self.message_name(message);
        self.record(HookCall::SendNotify { window, message });
        Ok(())
    }
}
