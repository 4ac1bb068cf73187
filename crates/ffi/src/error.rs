use grove_sim_core::ConfigError;
use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

/// An error that can be reported through `grove_sim_get_last_error`.
pub(crate) trait GroveSimError {
    fn code(&self) -> GroveSimErrorCode;

    /// Message stored in the thread-local slot
    fn msg(&self) -> &str;
}

/// Code plus message for every failure the C API reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DefaultGroveSimError {
    code: GroveSimErrorCode,
    msg: String,
}

impl DefaultGroveSimError {
    /// A required pointer argument named `param` was null
    pub fn null_pointer(param: &str) -> Self {
        Self {
            code: GroveSimErrorCode::NullPointer,
            msg: format!("'{param}' must not be null"),
        }
    }

    /// A panic while holding `lock` left the session unusable
    pub fn lock_poisoned(lock: &str) -> Self {
        Self {
            code: GroveSimErrorCode::LockPoisoned,
            msg: format!("session {lock} poisoned by an earlier panic"),
        }
    }

    /// The core rejected the configuration
    pub fn invalid_config(error: &ConfigError) -> Self {
        Self {
            code: GroveSimErrorCode::InvalidConfig,
            msg: format!("Invalid configuration: {error}"),
        }
    }

    /// The caller's buffer is shorter than the result
    pub fn buffer_too_small(needed: usize, capacity: usize) -> Self {
        Self {
            code: GroveSimErrorCode::BufferTooSmall,
            msg: format!("Buffer holds {capacity} entries but {needed} are needed"),
        }
    }

    pub fn invalid_parameter(message: String) -> Self {
        Self {
            code: GroveSimErrorCode::InvalidParameter,
            msg: message,
        }
    }
}

impl GroveSimError for DefaultGroveSimError {
    fn code(&self) -> GroveSimErrorCode {
        self.code
    }

    fn msg(&self) -> &str {
        &self.msg
    }
}

/// Result code of every fallible `grove_sim_*` function; zero means success.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroveSimErrorCode {
    Ok = 0,

    /// A required pointer was null.
    NullPointer = 1,

    /// The session lock was poisoned by a panic on another thread.
    LockPoisoned = 2,

    /// The configuration failed validation; see `grove_sim_get_last_error`.
    InvalidConfig = 3,

    /// An argument was out of range, non-finite or an unknown code.
    InvalidParameter = 4,

    /// The caller-provided buffer is too small; the required length is still reported.
    BufferTooSmall = 5,
}

impl From<DefaultGroveSimError> for GroveSimErrorCode {
    fn from(error: DefaultGroveSimError) -> Self {
        error.code
    }
}

thread_local! {
    /// Last failure on this thread; owns the string `grove_sim_get_last_error` points into.
    static LAST_ERROR: RefCell<(Option<CString>, GroveSimErrorCode)> = const { RefCell::new((None, GroveSimErrorCode::Ok)) };
}

/// Read this thread's last error.
pub(crate) fn with_last_error<F, R>(f: F) -> R
where
    F: FnOnce(&(Option<CString>, GroveSimErrorCode)) -> R,
{
    LAST_ERROR.with_borrow(f)
}

/// Replace or clear this thread's last error.
pub(crate) fn with_last_error_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut (Option<CString>, GroveSimErrorCode)) -> R,
{
    LAST_ERROR.with_borrow_mut(f)
}

/// Message for the last failed call on this thread, or null after a success.
///
/// The string is owned by the library and stays valid until the next `grove_sim_*`
/// call on the same thread. Do not free it.
///
/// ```cpp
/// GroveSimInstance* sim = nullptr;
/// GroveSimConfig config = grove_sim_default_config();
/// config.width = 0;
/// if (grove_sim_new(&config, &sim) != GroveSimErrorCode::Ok) {
///     printf("Grove sim creation failed: %s\n", grove_sim_get_last_error());
/// }
/// ```
#[no_mangle]
pub extern "C" fn grove_sim_get_last_error() -> *const c_char {
    with_last_error(|(cstring, _code)| cstring.as_ref().map_or(ptr::null(), |cs| cs.as_ptr()))
}

/// Code for the last call on this thread; `Ok` after a success.
#[no_mangle]
pub extern "C" fn grove_sim_get_last_error_code() -> GroveSimErrorCode {
    with_last_error(|(_cstring, code)| *code)
}
