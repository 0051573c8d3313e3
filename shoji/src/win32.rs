//! Hook service backed by the WindowSubclassing hook libraries.

use std::cell::OnceCell;
use std::ffi::c_void;

use windows::core::{s, BOOL, HSTRING, PCSTR};
use windows::Win32::Foundation::{HWND, LPARAM, WPARAM};
use windows::Win32::System::LibraryLoader::{GetProcAddress, LoadLibraryW};
use windows::Win32::System::Threading::{GetCurrentProcess, IsWow64Process};
use windows::Win32::UI::WindowsAndMessaging::{RegisterWindowMessageW, SendNotifyMessageW};

use crate::core::WindowHandle;
use crate::platform::{HookError, HookService, MessageId};

const LIBRARY_64: &str = "WindowSubclassing64.dll";
const LIBRARY_32: &str = "WindowSubclassing32.dll";

type SubclassWindowFn = unsafe extern "C" fn(HWND, HWND) -> BOOL;
type UnsubclassWindowFn = unsafe extern "C" fn(HWND) -> BOOL;

/// True when this 32-bit process runs on a 64-bit OS.
pub fn is_wow64_process() -> bool {
    let mut wow64 = BOOL::default();
    match unsafe { IsWow64Process(GetCurrentProcess(), &mut wow64) } {
        Ok(()) => wow64.as_bool(),
        Err(e) => {
            tracing::warn!("IsWow64Process failed: {}", e);
            false
        }
    }
}

fn hwnd(handle: WindowHandle) -> HWND {
    HWND(handle.0 as *mut c_void)
}

struct HookLibrary {
    subclass: SubclassWindowFn,
    unsubclass: UnsubclassWindowFn,
}

impl HookLibrary {
    fn load(name: &str) -> Result<Self, HookError> {
        let unavailable = || HookError::LibraryUnavailable(name.to_string());
        unsafe {
            let module = LoadLibraryW(&HSTRING::from(name)).map_err(|e| {
                tracing::warn!("Failed to load {}: {}", name, e);
                unavailable()
            })?;
            let export = |symbol: PCSTR| GetProcAddress(module, symbol).ok_or_else(unavailable);
            let subclass = export(s!("SubclassWindow"))?;
            let unsubclass = export(s!("UnsubclassWindow"))?;
            tracing::info!("Loaded hook library {}", name);
            Ok(Self {
                subclass: std::mem::transmute::<_, SubclassWindowFn>(subclass),
                unsubclass: std::mem::transmute::<_, UnsubclassWindowFn>(unsubclass),
            })
        }
    }
}

/// Libraries are loaded on first use and kept for the life of the process.
pub struct NativeHookService {
    manager_is_64: bool,
    library64: OnceCell<Result<HookLibrary, HookError>>,
    library32: OnceCell<Result<HookLibrary, HookError>>,
}

impl NativeHookService {
    pub fn new(manager_is_64: bool) -> Self {
        Self {
            manager_is_64,
            library64: OnceCell::new(),
            library32: OnceCell::new(),
        }
    }

    fn library(&self, use_64bit_path: bool) -> Result<&HookLibrary, HookError> {
        let (cell, name) = if use_64bit_path {
            (&self.library64, LIBRARY_64)
        } else {
            (&self.library32, LIBRARY_32)
        };
        cell.get_or_init(|| HookLibrary::load(name))
            .as_ref()
            .map_err(Clone::clone)
    }
}

impl HookService for NativeHookService {
    fn subclass(
        &self,
        manager: WindowHandle,
        window: WindowHandle,
        use_64bit_path: bool,
    ) -> Result<(), HookError> {
        let library = self.library(use_64bit_path)?;
        let ok = unsafe { (library.subclass)(hwnd(manager), hwnd(window)) };
        if !ok.as_bool() {
            return Err(HookError::SubclassFailed(window));
        }
        Ok(())
    }

    // The hook injected into the window's thread restores the original window
    // procedure, so the manager's own library does the unhooking.
    fn unsubclass(&self, window: WindowHandle) -> Result<(), HookError> {
        let library = self.library(self.manager_is_64)?;
        let ok = unsafe { (library.unsubclass)(hwnd(window)) };
        if !ok.as_bool() {
            return Err(HookError::UnsubclassFailed(window));
        }
        Ok(())
    }

    fn register_message(&self, name: &str) -> Result<MessageId, HookError> {
        let id = unsafe { RegisterWindowMessageW(&HSTRING::from(name)) };
        if id == 0 {
            return Err(HookError::RegisterMessageFailed(name.to_string()));
        }
        Ok(id)
    }

    fn send_notify_message(
        &self,
        window: WindowHandle,
        message: MessageId,
    ) -> Result<(), HookError> {
        unsafe { SendNotifyMessageW(hwnd(window), message, WPARAM(0), LPARAM(0)) }
            .map_err(|_| HookError::SendFailed { window, message })
    }
}
