use grove_sim_core::{PlayerAction, PlayerActionType, Vec3};

use crate::error::{DefaultGroveSimError, GroveSimErrorCode};
use crate::helpers::{handle_ffi_result_error, instance_from_ptr, with_session_mut};
use crate::instance::GroveSimInstance;

/// Advance the session by `dt` seconds of frame time.
///
/// Runs queued actions, the season clock, the weather scheduler, the ring spread and
/// as many ticks as the accumulated time allows. Thread-safe: takes the write lock.
///
/// - `out_ticks` (optional) receives the number of ticks that ran. If null, ignored.
/// - Non-finite or non-positive `dt` is not an error; no time passes.
///
/// Returns
/// - `GroveSimErrorCode::Ok` (0) on success
/// - `GroveSimErrorCode::NullPointer` if `ptr` is null
/// - `GroveSimErrorCode::LockPoisoned` if the internal lock is poisoned
///
/// # Safety
///
/// - `ptr` must be a valid pointer returned by `grove_sim_new` or null.
/// - `out_ticks` if non-null, must be a valid pointer to a `u32`.
#[no_mangle]
pub unsafe extern "C" fn grove_sim_update(
    ptr: *const GroveSimInstance,
    dt: f32,
    out_ticks: *mut u32,
) -> GroveSimErrorCode {
    handle_ffi_result_error(|| {
        let instance = unsafe { instance_from_ptr(ptr) }?;
        let ticks = with_session_mut(instance, |session| session.update(dt).len())?;
        if !out_ticks.is_null() {
            unsafe {
                *out_ticks = ticks as u32;
            }
        }
        Ok(())
    })
}

/// Run exactly one tick with the current weather and season, ignoring frame time.
///
/// # Safety
///
/// `ptr` must be a valid pointer returned by `grove_sim_new` or null.
#[no_mangle]
pub unsafe extern "C" fn grove_sim_step(ptr: *const GroveSimInstance) -> GroveSimErrorCode {
    handle_ffi_result_error(|| {
        let instance = unsafe { instance_from_ptr(ptr) }?;
        with_session_mut(instance, |session| {
            session.step();
        })
    })
}

/// Player verbs applied at a world point
#[derive(Clone, Copy)]
enum Verb {
    PlaceSeed,
    AddWater(f32),
    Ignite,
    Stomp(f32),
}

/// Apply `verb` under the world point and report whether it landed on the grid.
unsafe fn apply_verb(
    ptr: *const GroveSimInstance,
    position: Vec3,
    verb: Verb,
    out_applied: *mut bool,
) -> GroveSimErrorCode {
    handle_ffi_result_error(|| {
        if let Verb::AddWater(amount) | Verb::Stomp(amount) = verb {
            if !amount.is_finite() {
                return Err(DefaultGroveSimError::invalid_parameter(format!(
                    "amount must be finite, got {amount}"
                )));
            }
        }

        let instance = unsafe { instance_from_ptr(ptr) }?;
        let applied = with_session_mut(instance, |session| match verb {
            Verb::PlaceSeed => session.place_seed_at(position),
            Verb::AddWater(amount) => session.add_water_at(position, amount),
            Verb::Ignite => session.ignite_at(position),
            Verb::Stomp(damage) => session.stomp_at(position, damage),
        })?;

        if !out_applied.is_null() {
            unsafe {
                *out_applied = applied;
            }
        }
        Ok(())
    })
}

/// Plant a seedling under the world point `(x, y, z)`.
///
/// Only bare or burnt ground accepts a seed. `out_applied` (optional) receives
/// whether the seed took. A point outside the grid is not an error.
///
/// # Safety
///
/// - `ptr` must be a valid pointer returned by `grove_sim_new` or null.
/// - `out_applied` if non-null, must be a valid pointer to a `bool`.
#[no_mangle]
pub unsafe extern "C" fn grove_sim_place_seed(
    ptr: *const GroveSimInstance,
    x: f32,
    y: f32,
    z: f32,
    out_applied: *mut bool,
) -> GroveSimErrorCode {
    unsafe { apply_verb(ptr, Vec3::new(x, y, z), Verb::PlaceSeed, out_applied) }
}

/// Add `amount` water under the world point, clamped to `[0, 1]`.
///
/// Returns `GroveSimErrorCode::InvalidParameter` for a non-finite amount.
///
/// # Safety
///
/// - `ptr` must be a valid pointer returned by `grove_sim_new` or null.
/// - `out_applied` if non-null, must be a valid pointer to a `bool`.
#[no_mangle]
pub unsafe extern "C" fn grove_sim_add_water(
    ptr: *const GroveSimInstance,
    x: f32,
    y: f32,
    z: f32,
    amount: f32,
    out_applied: *mut bool,
) -> GroveSimErrorCode {
    unsafe { apply_verb(ptr, Vec3::new(x, y, z), Verb::AddWater(amount), out_applied) }
}

/// Start a ring spread centred under the world point, replacing any active one.
///
/// # Safety
///
/// - `ptr` must be a valid pointer returned by `grove_sim_new` or null.
/// - `out_applied` if non-null, must be a valid pointer to a `bool`.
#[no_mangle]
pub unsafe extern "C" fn grove_sim_ignite(
    ptr: *const GroveSimInstance,
    x: f32,
    y: f32,
    z: f32,
    out_applied: *mut bool,
) -> GroveSimErrorCode {
    unsafe { apply_verb(ptr, Vec3::new(x, y, z), Verb::Ignite, out_applied) }
}

/// Subtract `damage` durability under the world point without changing the stage.
///
/// Returns `GroveSimErrorCode::InvalidParameter` for a non-finite damage.
///
/// # Safety
///
/// - `ptr` must be a valid pointer returned by `grove_sim_new` or null.
/// - `out_applied` if non-null, must be a valid pointer to a `bool`.
#[no_mangle]
pub unsafe extern "C" fn grove_sim_stomp(
    ptr: *const GroveSimInstance,
    x: f32,
    y: f32,
    z: f32,
    damage: f32,
    out_applied: *mut bool,
) -> GroveSimErrorCode {
    unsafe { apply_verb(ptr, Vec3::new(x, y, z), Verb::Stomp(damage), out_applied) }
}

/// Queue a player action to be applied at the start of the next `grove_sim_update`.
///
/// `action` is a `PlayerActionType` code: 0 place seed, 1 add water, 2 ignite,
/// 3 stomp. `amount` is read only by add water and stomp. Queued actions run in
/// submission order and are kept in the session's action history.
///
/// Returns
/// - `GroveSimErrorCode::Ok` (0) once the action is queued
/// - `GroveSimErrorCode::InvalidParameter` for an unknown code or a non-finite amount
/// - `GroveSimErrorCode::NullPointer` if `ptr` is null
///
/// # Safety
///
/// `ptr` must be a valid pointer returned by `grove_sim_new` or null.
#[no_mangle]
pub unsafe extern "C" fn grove_sim_queue_action(
    ptr: *const GroveSimInstance,
    action: u8,
    x: f32,
    y: f32,
    z: f32,
    amount: f32,
) -> GroveSimErrorCode {
    handle_ffi_result_error(|| {
        let Some(action_type) = PlayerActionType::from_u8(action) else {
            return Err(DefaultGroveSimError::invalid_parameter(format!(
                "unknown action code {action}"
            )));
        };
        if action_type.uses_amount() && !amount.is_finite() {
            return Err(DefaultGroveSimError::invalid_parameter(format!(
                "amount must be finite, got {amount}"
            )));
        }

        let instance = unsafe { instance_from_ptr(ptr) }?;
        with_session_mut(instance, |session| {
            let queued = PlayerAction::new(action_type, session.time(), Vec3::new(x, y, z), amount);
            session.submit_action(queued);
        })
    })
}
