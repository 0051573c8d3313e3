/// Which hook library, if any, can intercept a window's messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookEligibility {
    Use64BitHook,
    Use32BitHook,
    Ineligible,
}

impl HookEligibility {
    /// Hook path to request from the platform, `None` when the window can't be hooked.
    pub fn use_64bit_path(self) -> Option<bool> {
        match self {
            HookEligibility::Use64BitHook => Some(true),
            HookEligibility::Use32BitHook => Some(false),
            HookEligibility::Ineligible => None,
        }
    }
}

/// A hook library can only be injected into a process of its own architecture.
/// A 64-bit manager drives the 64-bit library; on a 32-bit OS everything is 32-bit.
pub fn hook_eligibility(manager_is_64: bool, os_is_64: bool, window_is_64: bool) -> HookEligibility {
    if manager_is_64 && window_is_64 {
        HookEligibility::Use64BitHook
    } else if !os_is_64 {
        HookEligibility::Use32BitHook
    } else {
        HookEligibility::Ineligible
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemBitness {
    pub manager_is_64: bool,
    pub os_is_64: bool,
}

impl SystemBitness {
    pub fn new(manager_is_64: bool, os_is_64: bool) -> Self {
        Self {
            manager_is_64,
            os_is_64,
        }
    }

    pub fn detect() -> Self {
        let manager_is_64 = cfg!(target_pointer_width = "64");
        let os_is_64 = manager_is_64 || running_under_wow64();
        let bitness = Self::new(manager_is_64, os_is_64);
        tracing::debug!("Detected bitness: {:?}", bitness);
        bitness
    }

    pub fn eligibility(&self, window_is_64: bool) -> HookEligibility {
        hook_eligibility(self.manager_is_64, self.os_is_64, window_is_64)
    }
}

#[cfg(windows)]
fn running_under_wow64() -> bool {
    crate::win32::is_wow64_process()
}

#[cfg(not(windows))]
fn running_under_wow64() -> bool {
    false
}
