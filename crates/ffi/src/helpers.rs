use crate::error::{with_last_error_mut, DefaultGroveSimError, GroveSimError, GroveSimErrorCode};
use crate::instance::GroveSimInstance;
use grove_sim_core::Session;
use std::ffi::CString;

/// Set the thread-local error message and code.
/// Accepts any type implementing `GroveSimError` trait.
pub(crate) fn set_last_error(error: &impl GroveSimError) {
    with_last_error_mut(|(cstring, code)| {
        *cstring = CString::new(error.msg()).ok();
        *code = error.code();
    });
}

/// Record an error in thread-local storage and return its code.
#[inline]
pub(crate) fn track_error(error: &impl GroveSimError) -> GroveSimErrorCode {
    set_last_error(error);
    error.code()
}

/// Record the error of a failed result, or clear the last error on success.
pub(crate) fn track_result<T>(
    result: Result<T, DefaultGroveSimError>,
) -> Result<T, GroveSimErrorCode> {
    match result {
        Ok(value) => {
            clear_last_error();
            Ok(value)
        }
        Err(error) => Err(track_error(&error)),
    }
}

/// Clear the thread-local error message and code.
pub(crate) fn clear_last_error() {
    with_last_error_mut(|(cstring, code)| {
        *cstring = None;
        *code = GroveSimErrorCode::Ok;
    });
}

/// Run an FFI body and collapse its result into an error code, tracking failures.
pub(crate) fn handle_ffi_result_error<F>(body: F) -> GroveSimErrorCode
where
    F: FnOnce() -> Result<(), DefaultGroveSimError>,
{
    match track_result(body()) {
        Ok(()) => GroveSimErrorCode::Ok,
        Err(code) => code,
    }
}

/// Borrow the instance behind a raw pointer.
///
/// # Safety
///
/// `ptr` must be null or a pointer returned by `grove_sim_new` that has not been
/// destroyed.
pub(crate) unsafe fn instance_from_ptr<'a>(
    ptr: *const GroveSimInstance,
) -> Result<&'a GroveSimInstance, DefaultGroveSimError> {
    unsafe { ptr.as_ref() }.ok_or_else(|| DefaultGroveSimError::null_pointer("ptr"))
}

/// Run `func` with a shared read lock on the session.
pub(crate) fn with_session<F, T>(
    instance: &GroveSimInstance,
    func: F,
) -> Result<T, DefaultGroveSimError>
where
    F: FnOnce(&Session) -> T,
{
    let session = instance
        .session
        .read()
        .map_err(|_| DefaultGroveSimError::lock_poisoned("RwLock"))?;
    Ok(func(&session))
}

/// Run `func` with an exclusive write lock on the session.
pub(crate) fn with_session_mut<F, T>(
    instance: &GroveSimInstance,
    func: F,
) -> Result<T, DefaultGroveSimError>
where
    F: FnOnce(&mut Session) -> T,
{
    let mut session = instance
        .session
        .write()
        .map_err(|_| DefaultGroveSimError::lock_poisoned("RwLock"))?;
    Ok(func(&mut session))
}
