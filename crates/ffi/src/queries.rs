use grove_sim_core::{Cell, GrowthStage, Vec3, WeatherEvent};
use std::ptr;

use crate::error::{DefaultGroveSimError, GroveSimErrorCode};
use crate::helpers::{
    handle_ffi_result_error, instance_from_ptr, track_error, with_session, with_session_mut,
};
use crate::instance::GroveSimInstance;

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
/// FFI-friendly snapshot of one cell.
/// Keep this layout stable for C/C++/C# consumers.
pub struct GroveSimCell {
    /// Growth stage: 0=Empty, 1=SmallPlant, 2=SmallTree, 3=MediumTree, 4=LargeTree, 5=Burnt
    pub stage: u8,
    /// Whether the cell is burning
    pub is_on_fire: bool,
    pub water: f32,
    pub sunlight: f32,
    pub heat: f32,
    pub durability: f32,
    pub success: f32,
    /// Remaining fire fuel
    pub fire_fuel: f32,
}

impl From<&Cell> for GroveSimCell {
    fn from(cell: &Cell) -> Self {
        Self {
            stage: cell.stage.as_u8(),
            is_on_fire: cell.is_on_fire,
            water: cell.water,
            sunlight: cell.sunlight,
            heat: cell.heat,
            durability: cell.durability,
            success: cell.success,
            fire_fuel: cell.fire_fuel,
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
/// Current weather and season.
pub struct GroveSimWeather {
    /// 0=Clear, 1=Rain, 2=Thunderstorm, 3=Wind, 4=Snow
    pub phase: u8,
    /// 0=Spring, 1=Summer, 2=Autumn, 3=Winter
    pub season: u8,
    /// Seconds left in the active phase
    pub phase_remaining: f32,
    /// Wind vector in world units per second
    pub wind_x: f32,
    pub wind_y: f32,
    pub wind_z: f32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
/// Whole-grid statistics.
pub struct GroveSimStats {
    /// Cell count per stage, indexed like `GroveSimCell::stage`
    pub stage_counts: [u32; 6],
    /// Cells currently burning
    pub burning: u32,
    pub mean_water: f32,
    pub mean_sunlight: f32,
    pub mean_heat: f32,
    /// Ticks run since creation
    pub ticks: u64,
    /// Simulation time in seconds
    pub time: f32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// One weather notification.
///
/// `kind` 0 = phase ended, 1 = phase started (both use `phase`); 2 = season changed
/// (uses `from_season` and `to_season`). Unused fields are zero.
pub struct GroveSimEvent {
    pub kind: u8,
    pub phase: u8,
    pub from_season: u8,
    pub to_season: u8,
}

impl From<&WeatherEvent> for GroveSimEvent {
    fn from(event: &WeatherEvent) -> Self {
        let kind = event.kind_u8();
        match *event {
            WeatherEvent::PhaseEnded(phase) | WeatherEvent::PhaseStarted(phase) => Self {
                kind,
                phase: phase.as_u8(),
                ..Self::default()
            },
            WeatherEvent::SeasonChanged { from, to } => Self {
                kind,
                from_season: from.as_u8(),
                to_season: to.as_u8(),
                ..Self::default()
            },
        }
    }
}

#[no_mangle]
/// Grid dimensions in cells.
///
/// # Safety
///
/// - `ptr` must be a valid pointer returned by `grove_sim_new` or null.
/// - `out_width` and `out_height` must be valid, non-null pointers to `u32`.
pub unsafe extern "C" fn grove_sim_get_grid_size(
    ptr: *const GroveSimInstance,
    out_width: *mut u32,
    out_height: *mut u32,
) -> GroveSimErrorCode {
    if out_width.is_null() || out_height.is_null() {
        return track_error(&DefaultGroveSimError::null_pointer("out_width/out_height"));
    }

    handle_ffi_result_error(|| {
        let instance = unsafe { instance_from_ptr(ptr) }?;
        let (width, height) = with_session(instance, |session| {
            (session.grid().width(), session.grid().height())
        })?;
        unsafe {
            *out_width = width as u32;
            *out_height = height as u32;
        }
        Ok(())
    })
}

#[no_mangle]
/// Fill `out_cell` with the cell under the world point `(x, y, z)`.
///
/// - `out_found` (optional) receives whether the point hit the grid. If null, ignored.
///   A miss is not an error and leaves `out_cell` untouched.
///
/// # Safety
///
/// - `ptr` must be a valid pointer returned by `grove_sim_new` or null.
/// - `out_cell` must be a valid, non-null pointer to a `GroveSimCell`.
/// - `out_found` if non-null, must be a valid pointer to a `bool`.
pub unsafe extern "C" fn grove_sim_get_cell_at(
    ptr: *const GroveSimInstance,
    x: f32,
    y: f32,
    z: f32,
    out_cell: *mut GroveSimCell,
    out_found: *mut bool,
) -> GroveSimErrorCode {
    if out_cell.is_null() {
        return track_error(&DefaultGroveSimError::null_pointer("out_cell"));
    }

    handle_ffi_result_error(|| {
        let instance = unsafe { instance_from_ptr(ptr) }?;
        let cell = with_session(instance, |session| {
            session
                .cell_at(Vec3::new(x, y, z))
                .map(GroveSimCell::from)
        })?;

        unsafe {
            if let Some(cell) = cell {
                *out_cell = cell;
            }
            if !out_found.is_null() {
                *out_found = cell.is_some();
            }
        }
        Ok(())
    })
}

#[no_mangle]
/// Copy every cell, row-major (`y * width + x`), into a caller-owned buffer.
///
/// `out_len` always receives the number of cells in the grid, so a caller can query
/// the size by passing a zero `capacity`.
///
/// Returns
/// - `GroveSimErrorCode::Ok` (0) when all cells were copied
/// - `GroveSimErrorCode::BufferTooSmall` if `capacity` is below the cell count; nothing is copied
/// - `GroveSimErrorCode::NullPointer` if `ptr` or `out_len` is null, or `out_cells`
///   is null with a non-zero `capacity`
///
/// # Safety
///
/// - `ptr` must be a valid pointer returned by `grove_sim_new` or null.
/// - `out_cells` must point to at least `capacity` writable `GroveSimCell` values.
/// - `out_len` must be a valid, non-null pointer to a `usize`.
///
/// # Example Usage (C++)
/// ```cpp
/// uintptr_t len = 0;
/// grove_sim_copy_cells(sim, nullptr, 0, &len);
/// std::vector<GroveSimCell> cells(len);
/// grove_sim_copy_cells(sim, cells.data(), cells.size(), &len);
/// ```
pub unsafe extern "C" fn grove_sim_copy_cells(
    ptr: *const GroveSimInstance,
    out_cells: *mut GroveSimCell,
    capacity: usize,
    out_len: *mut usize,
) -> GroveSimErrorCode {
    if out_len.is_null() {
        return track_error(&DefaultGroveSimError::null_pointer("out_len"));
    }
    if out_cells.is_null() && capacity > 0 {
        return track_error(&DefaultGroveSimError::null_pointer("out_cells"));
    }

    handle_ffi_result_error(|| {
        let instance = unsafe { instance_from_ptr(ptr) }?;
        with_session(instance, |session| {
            let cells = session.grid().cells();
            unsafe {
                *out_len = cells.len();
            }
            if capacity < cells.len() {
                return Err(DefaultGroveSimError::buffer_too_small(cells.len(), capacity));
            }

            // SAFETY: the caller guarantees `capacity` writable slots
            let out = unsafe { std::slice::from_raw_parts_mut(out_cells, cells.len()) };
            for (slot, cell) in out.iter_mut().zip(cells) {
                *slot = GroveSimCell::from(cell);
            }
            Ok(())
        })?
    })
}

#[no_mangle]
/// Current weather phase, season and wind.
///
/// # Safety
///
/// - `ptr` must be a valid pointer returned by `grove_sim_new` or null.
/// - `out_weather` must be a valid, non-null pointer to a `GroveSimWeather`.
pub unsafe extern "C" fn grove_sim_get_weather(
    ptr: *const GroveSimInstance,
    out_weather: *mut GroveSimWeather,
) -> GroveSimErrorCode {
    if out_weather.is_null() {
        return track_error(&DefaultGroveSimError::null_pointer("out_weather"));
    }

    handle_ffi_result_error(|| {
        let instance = unsafe { instance_from_ptr(ptr) }?;
        let weather = with_session(instance, |session| {
            let wind = session.wind();
            GroveSimWeather {
                phase: session.phase().as_u8(),
                season: session.season().as_u8(),
                phase_remaining: session.weather().remaining(),
                wind_x: wind.x,
                wind_y: wind.y,
                wind_z: wind.z,
            }
        })?;
        unsafe {
            *out_weather = weather;
        }
        Ok(())
    })
}

#[no_mangle]
/// Whole-grid statistics plus tick count and simulation time.
///
/// # Safety
///
/// - `ptr` must be a valid pointer returned by `grove_sim_new` or null.
/// - `out_stats` must be a valid, non-null pointer to a `GroveSimStats`.
pub unsafe extern "C" fn grove_sim_get_stats(
    ptr: *const GroveSimInstance,
    out_stats: *mut GroveSimStats,
) -> GroveSimErrorCode {
    if out_stats.is_null() {
        return track_error(&DefaultGroveSimError::null_pointer("out_stats"));
    }

    handle_ffi_result_error(|| {
        let instance = unsafe { instance_from_ptr(ptr) }?;
        let stats = with_session(instance, |session| {
            let stats = session.stats();
            let mut stage_counts = [0u32; 6];
            for stage in GrowthStage::ALL {
                stage_counts[usize::from(stage.as_u8())] = stats.count(stage) as u32;
            }
            GroveSimStats {
                stage_counts,
                burning: stats.burning as u32,
                mean_water: stats.mean_water,
                mean_sunlight: stats.mean_sunlight,
                mean_heat: stats.mean_heat,
                ticks: session.engine().ticks(),
                time: session.time(),
            }
        })?;
        unsafe {
            *out_stats = stats;
        }
        Ok(())
    })
}

#[no_mangle]
/// Drain queued weather events into an internal buffer and return a borrowed pointer to it.
///
/// The returned array is valid until the next call to this function on the same
/// instance. **DO NOT FREE THIS POINTER**.
///
/// Thread-safe: takes the event-buffer `Mutex` and the session write lock.
///
/// Returns
/// - `GroveSimErrorCode::Ok` (0) on success with the array in `out_array` and count in `out_len`
/// - `GroveSimErrorCode::NullPointer` if `ptr`, `out_len`, or `out_array` is null
/// - `GroveSimErrorCode::LockPoisoned` if an internal lock is poisoned
///
/// # Safety
///
/// - `ptr` must be a valid pointer returned by `grove_sim_new` or null.
/// - `out_len` must be a valid, non-null pointer to a `usize`.
/// - `out_array` must be a valid, non-null pointer to a `*const GroveSimEvent`.
///
/// # Example Usage (C++)
/// ```cpp
/// uintptr_t len = 0;
/// const GroveSimEvent* events = nullptr;
/// grove_sim_drain_events(sim, &len, &events);
/// for (uintptr_t i = 0; i < len; i++) {
///     if (events[i].kind == 1) { PlayWeatherCue(events[i].phase); }
/// }
/// ```
pub unsafe extern "C" fn grove_sim_drain_events(
    ptr: *const GroveSimInstance,
    out_len: *mut usize,
    out_array: *mut *const GroveSimEvent,
) -> GroveSimErrorCode {
    if out_len.is_null() {
        return track_error(&DefaultGroveSimError::null_pointer("out_len"));
    }

    if out_array.is_null() {
        unsafe {
            *out_len = 0;
        }
        return track_error(&DefaultGroveSimError::null_pointer("out_array"));
    }

    let result = handle_ffi_result_error(|| {
        let instance = unsafe { instance_from_ptr(ptr) }?;
        let mut buffer = instance
            .drained_events
            .lock()
            .map_err(|_| DefaultGroveSimError::lock_poisoned("Mutex"))?;
        buffer.clear();

        let events = with_session_mut(instance, |session| session.drain_events())?;
        buffer.extend(events.iter().map(GroveSimEvent::from));

        unsafe {
            *out_len = buffer.len();
            *out_array = buffer.as_ptr();
        }
        Ok(())
    });

    // Set to null on error (per documentation contract)
    if result != GroveSimErrorCode::Ok {
        unsafe {
            *out_array = ptr::null();
            *out_len = 0;
        }
    }

    result
}
