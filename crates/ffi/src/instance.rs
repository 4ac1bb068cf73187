use grove_sim_core::{Session, SimulationConfig};
use std::ptr;
use std::sync::{Mutex, RwLock};

use crate::error::{DefaultGroveSimError, GroveSimErrorCode};
use crate::helpers::{track_error, track_result};
use crate::queries::GroveSimEvent;

/// Flat, C-compatible subset of the session configuration.
///
/// Start from `grove_sim_default_config()` and override the fields you need; every
/// other setting keeps its default.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroveSimConfig {
    /// Master seed; identical seeds and inputs give identical runs
    pub seed: u64,
    /// Grid columns
    pub width: u32,
    /// Grid rows
    pub height: u32,
    /// Edge length of one cell in world units
    pub cell_size: f32,
    /// World position of the grid's minimum corner
    pub origin_x: f32,
    pub origin_y: f32,
    pub origin_z: f32,
    /// Seconds between ticks
    pub tick_interval: f32,
    /// Upper bound on ticks run by one update
    pub max_ticks_per_frame: u32,
    /// Seconds per season
    pub season_length: f32,
    /// Consecutive Rain phases before a thunderstorm is queued
    pub thunder_threshold: u32,
    /// Largest ring lit by an ignite
    pub ring_max_distance: u32,
    /// Seconds between rings
    pub ring_step_delay: f32,
    /// Seconds between the last ring and the scar
    pub ring_grace_delay: f32,
    /// Neighbour diffusion rate for water and heat
    pub diffusion_rate: f32,
    /// Per-neighbour contagion chance
    pub spread_chance: f32,
}

impl From<&SimulationConfig> for GroveSimConfig {
    fn from(config: &SimulationConfig) -> Self {
        Self {
            seed: config.seed,
            width: u32::try_from(config.grid.width).unwrap_or(u32::MAX),
            height: u32::try_from(config.grid.height).unwrap_or(u32::MAX),
            cell_size: config.grid.cell_size,
            origin_x: config.grid.origin[0],
            origin_y: config.grid.origin[1],
            origin_z: config.grid.origin[2],
            tick_interval: config.engine.tick_interval,
            max_ticks_per_frame: config.engine.max_ticks_per_frame,
            season_length: config.seasons.length_seconds,
            thunder_threshold: config.weather.thunder_threshold,
            ring_max_distance: u32::try_from(config.ignition.max_distance).unwrap_or(u32::MAX),
            ring_step_delay: config.ignition.step_delay,
            ring_grace_delay: config.ignition.grace_delay,
            diffusion_rate: config.rules.diffusion.rate,
            spread_chance: config.rules.fire.spread_chance,
        }
    }
}

impl GroveSimConfig {
    /// Overlay the flat fields onto the default configuration
    pub(crate) fn to_simulation_config(self) -> SimulationConfig {
        let mut config = SimulationConfig::with_seed(self.seed);
        config.grid.width = self.width as usize;
        config.grid.height = self.height as usize;
        config.grid.cell_size = self.cell_size;
        config.grid.origin = [self.origin_x, self.origin_y, self.origin_z];
        config.engine.tick_interval = self.tick_interval;
        config.engine.max_ticks_per_frame = self.max_ticks_per_frame;
        config.seasons.length_seconds = self.season_length;
        config.weather.thunder_threshold = self.thunder_threshold;
        config.ignition.max_distance = self.ring_max_distance as usize;
        config.ignition.step_delay = self.ring_step_delay;
        config.ignition.grace_delay = self.ring_grace_delay;
        config.rules.diffusion.rate = self.diffusion_rate;
        config.rules.fire.spread_chance = self.spread_chance;
        config
    }
}

/// Default flat configuration: a 32x32 grid with one-unit cells at the origin.
#[no_mangle]
pub extern "C" fn grove_sim_default_config() -> GroveSimConfig {
    GroveSimConfig::from(&SimulationConfig::default())
}

/// One grove simulation session behind an opaque pointer.
///
/// # Thread Safety
/// The session is protected by an `RwLock`: queries take a shared read lock and
/// `grove_sim_update` takes the exclusive write lock, so render or audio threads can
/// read snapshots while the game thread updates.
///
/// ## Unreal Engine Example
/// ```cpp
/// GroveSimInstance* Grove = nullptr;
///
/// void AGroveActor::BeginPlay() {
///     GroveSimConfig Config = grove_sim_default_config();
///     Config.width = 64;
///     Config.height = 64;
///     if (grove_sim_new(&Config, &Grove) != GroveSimErrorCode::Ok) {
///         UE_LOG(LogTemp, Error, TEXT("%hs"), grove_sim_get_last_error());
///     }
/// }
///
/// void AGroveActor::Tick(float DeltaTime) {
///     uint32_t Ticks = 0;
///     grove_sim_update(Grove, DeltaTime, &Ticks);
/// }
///
/// void AGroveActor::EndPlay(const EEndPlayReason::Type Reason) {
///     grove_sim_destroy(Grove);
///     Grove = nullptr;
/// }
/// ```
pub struct GroveSimInstance {
    pub(crate) session: RwLock<Session>,
    /// Events handed out by the last `grove_sim_drain_events`, reused across calls.
    pub(crate) drained_events: Mutex<Vec<GroveSimEvent>>,
}

impl GroveSimInstance {
    /// Build a session from the flat configuration.
    ///
    /// # Errors
    ///
    /// Returns `GroveSimErrorCode::InvalidConfig` when the core rejects the configuration.
    pub(crate) fn new(config: &GroveSimConfig) -> Result<Box<Self>, DefaultGroveSimError> {
        let session = Session::new(config.to_simulation_config())
            .map_err(|error| DefaultGroveSimError::invalid_config(&error))?;

        Ok(Box::new(Self {
            session: RwLock::new(session),
            drained_events: Mutex::new(Vec::with_capacity(16)),
        }))
    }
}

/// Create a new session and return it via out-parameter.
///
/// - Returns `GroveSimErrorCode::Ok` (0) on success with a valid instance in `out_instance`
/// - Returns non-zero error code on failure with `out_instance` set to null
///
/// Returns
/// - `GroveSimErrorCode::Ok` (0) - success, `out_instance` contains valid pointer
/// - `GroveSimErrorCode::NullPointer` - `config` or `out_instance` is null
/// - `GroveSimErrorCode::InvalidConfig` - the configuration failed validation
///
/// Call `grove_sim_get_last_error()` for a human-readable description.
///
/// # Safety
///
/// - `config` must be null or point to a readable `GroveSimConfig`.
/// - `out_instance` must be a valid, non-null pointer to writable memory.
/// - The caller takes ownership of the returned instance and MUST call `grove_sim_destroy`
///   exactly once to avoid memory leaks.
#[no_mangle]
pub unsafe extern "C" fn grove_sim_new(
    config: *const GroveSimConfig,
    out_instance: *mut *mut GroveSimInstance,
) -> GroveSimErrorCode {
    if out_instance.is_null() {
        return track_error(&DefaultGroveSimError::null_pointer("out_instance"));
    }

    let Some(config) = (unsafe { config.as_ref() }) else {
        unsafe {
            *out_instance = ptr::null_mut();
        }
        return track_error(&DefaultGroveSimError::null_pointer("config"));
    };

    match track_result(GroveSimInstance::new(config)) {
        Ok(instance) => {
            unsafe {
                *out_instance = Box::into_raw(instance);
            }
            GroveSimErrorCode::Ok
        }
        Err(code) => {
            unsafe {
                // Set to null on error (per documentation contract)
                *out_instance = ptr::null_mut();
            }
            code
        }
    }
}

/// Destroy a session previously created by `grove_sim_new`.
///
/// If `ptr` is null, this function is a no-op.
///
/// # Safety
/// - The pointer MUST have been created by `grove_sim_new`.
/// - The pointer MUST NOT have been freed already.
/// - After calling this function, the caller must not use the pointer again.
#[no_mangle]
pub unsafe extern "C" fn grove_sim_destroy(ptr: *mut GroveSimInstance) {
    if ptr.is_null() {
        return;
    }

    // SAFETY: the pointer came from `Box::into_raw` in `grove_sim_new` and is freed once.
    unsafe {
        drop(Box::from_raw(ptr));
    }
}
