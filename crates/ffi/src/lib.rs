//! C ABI over `grove-sim-core`
//!
//! Every function reports failures through [`GroveSimErrorCode`] and records a
//! per-thread message readable with `grove_sim_get_last_error`. Sessions live behind
//! an opaque [`GroveSimInstance`] pointer created by `grove_sim_new` and freed by
//! `grove_sim_destroy`. The C header is generated into `GroveSimFFI.h` at build time.

mod error;
mod helpers;
mod instance;
mod queries;
mod simulation;

pub use error::{grove_sim_get_last_error, grove_sim_get_last_error_code, GroveSimErrorCode};
pub use instance::{
    grove_sim_default_config, grove_sim_destroy, grove_sim_new, GroveSimConfig, GroveSimInstance,
};
pub use queries::{
    grove_sim_copy_cells, grove_sim_drain_events, grove_sim_get_cell_at, grove_sim_get_grid_size,
    grove_sim_get_stats, grove_sim_get_weather, GroveSimCell, GroveSimEvent, GroveSimStats,
    GroveSimWeather,
};
pub use simulation::{
    grove_sim_add_water, grove_sim_ignite, grove_sim_place_seed, grove_sim_queue_action,
    grove_sim_step, grove_sim_stomp, grove_sim_update,
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CStr;
    use std::ptr;

    fn small_config() -> GroveSimConfig {
        GroveSimConfig {
            seed: 21,
            width: 8,
            height: 6,
            ..grove_sim_default_config()
        }
    }

    fn create(config: &GroveSimConfig) -> *mut GroveSimInstance {
        let mut instance: *mut GroveSimInstance = ptr::null_mut();
        let code = unsafe { grove_sim_new(config, &mut instance) };
        assert_eq!(code, GroveSimErrorCode::Ok);
        assert!(!instance.is_null());
        instance
    }

    fn cell_at(instance: *const GroveSimInstance, x: f32, z: f32) -> Option<GroveSimCell> {
        let mut cell = GroveSimCell::default();
        let mut found = false;
        let code = unsafe { grove_sim_get_cell_at(instance, x, 0.0, z, &mut cell, &mut found) };
        assert_eq!(code, GroveSimErrorCode::Ok);
        found.then_some(cell)
    }

    #[test]
    fn test_default_config_round_trips() {
        let config = grove_sim_default_config();
        assert_eq!(config.width, 32);
        assert_eq!(config.height, 32);
        assert_eq!(config.to_simulation_config(), grove_sim_core::SimulationConfig::default());
    }

    #[test]
    fn test_invalid_config_reports_message() {
        let config = GroveSimConfig {
            width: 0,
            ..grove_sim_default_config()
        };
        let mut instance = ptr::NonNull::<GroveSimInstance>::dangling().as_ptr();
        let code = unsafe { grove_sim_new(&config, &mut instance) };

        assert_eq!(code, GroveSimErrorCode::InvalidConfig);
        assert!(instance.is_null());
        assert_eq!(grove_sim_get_last_error_code(), GroveSimErrorCode::InvalidConfig);
        let message = unsafe { CStr::from_ptr(grove_sim_get_last_error()) };
        assert!(message.to_string_lossy().contains("grid dimensions"));
    }

    #[test]
    fn test_null_pointers_are_rejected() {
        let code = unsafe { grove_sim_update(ptr::null(), 0.1, ptr::null_mut()) };
        assert_eq!(code, GroveSimErrorCode::NullPointer);
        assert_eq!(grove_sim_get_last_error_code(), GroveSimErrorCode::NullPointer);

        let config = small_config();
        let code = unsafe { grove_sim_new(&config, ptr::null_mut()) };
        assert_eq!(code, GroveSimErrorCode::NullPointer);

        // Destroying null is a no-op
        unsafe { grove_sim_destroy(ptr::null_mut()) };
    }

    #[test]
    fn test_verbs_and_cell_queries() {
        let instance = create(&small_config());

        let mut applied = false;
        let code = unsafe { grove_sim_place_seed(instance, 2.5, 0.0, 1.5, &mut applied) };
        assert_eq!(code, GroveSimErrorCode::Ok);
        assert!(applied);
        assert_eq!(cell_at(instance, 2.5, 1.5).map(|c| c.stage), Some(1));

        let code = unsafe { grove_sim_add_water(instance, 2.5, 0.0, 1.5, 0.9, &mut applied) };
        assert_eq!(code, GroveSimErrorCode::Ok);
        assert_eq!(cell_at(instance, 2.5, 1.5).map(|c| c.water), Some(1.0));

        let code = unsafe { grove_sim_stomp(instance, 2.5, 0.0, 1.5, f32::NAN, &mut applied) };
        assert_eq!(code, GroveSimErrorCode::InvalidParameter);

        // Outside the grid: success, nothing applied
        let code = unsafe { grove_sim_ignite(instance, -4.0, 0.0, 1.0, &mut applied) };
        assert_eq!(code, GroveSimErrorCode::Ok);
        assert!(!applied);
        assert_eq!(cell_at(instance, -4.0, 1.0), None);

        let code = unsafe { grove_sim_ignite(instance, 2.5, 0.0, 1.5, &mut applied) };
        assert_eq!(code, GroveSimErrorCode::Ok);
        assert!(applied);
        assert_eq!(cell_at(instance, 2.5, 1.5).map(|c| c.is_on_fire), Some(true));

        unsafe { grove_sim_destroy(instance) };
    }

    #[test]
    fn test_queued_actions_apply_on_update() {
        let instance = create(&small_config());

        let code = unsafe { grove_sim_queue_action(instance, 7, 2.5, 0.0, 1.5, 0.0) };
        assert_eq!(code, GroveSimErrorCode::InvalidParameter);
        let code = unsafe { grove_sim_queue_action(instance, 1, 2.5, 0.0, 1.5, f32::INFINITY) };
        assert_eq!(code, GroveSimErrorCode::InvalidParameter);

        let code = unsafe { grove_sim_queue_action(instance, 0, 2.5, 0.0, 1.5, f32::NAN) };
        assert_eq!(code, GroveSimErrorCode::Ok);
        assert_eq!(cell_at(instance, 2.5, 1.5).map(|c| c.stage), Some(0));

        let code = unsafe { grove_sim_update(instance, 0.0, ptr::null_mut()) };
        assert_eq!(code, GroveSimErrorCode::Ok);
        assert_eq!(cell_at(instance, 2.5, 1.5).map(|c| c.stage), Some(1));

        unsafe { grove_sim_destroy(instance) };
    }

    #[test]
    fn test_copy_cells_checks_capacity() {
        let instance = create(&small_config());

        let mut len: usize = 0;
        let code = unsafe { grove_sim_copy_cells(instance, ptr::null_mut(), 0, &mut len) };
        assert_eq!(code, GroveSimErrorCode::BufferTooSmall);
        assert_eq!(len, 48);

        let mut cells = vec![GroveSimCell::default(); len];
        let code =
            unsafe { grove_sim_copy_cells(instance, cells.as_mut_ptr(), cells.len(), &mut len) };
        assert_eq!(code, GroveSimErrorCode::Ok);
        assert!(cells.iter().all(|c| c.stage == 0 && c.durability == 1.0));

        let mut width: u32 = 0;
        let mut height: u32 = 0;
        let code = unsafe { grove_sim_get_grid_size(instance, &mut width, &mut height) };
        assert_eq!(code, GroveSimErrorCode::Ok);
        assert_eq!((width, height), (8, 6));

        unsafe { grove_sim_destroy(instance) };
    }

    #[test]
    fn test_update_weather_and_events() {
        let instance = create(&small_config());

        let mut ticks: u32 = 0;
        let code = unsafe { grove_sim_update(instance, 1.0, &mut ticks) };
        assert_eq!(code, GroveSimErrorCode::Ok);
        assert_eq!(ticks, 5);
        assert_eq!(unsafe { grove_sim_step(instance) }, GroveSimErrorCode::Ok);

        let mut stats = GroveSimStats::default();
        let code = unsafe { grove_sim_get_stats(instance, &mut stats) };
        assert_eq!(code, GroveSimErrorCode::Ok);
        assert_eq!(stats.ticks, 6);
        assert_eq!(stats.stage_counts.iter().sum::<u32>(), 48);

        let mut weather = GroveSimWeather::default();
        let code = unsafe { grove_sim_get_weather(instance, &mut weather) };
        assert_eq!(code, GroveSimErrorCode::Ok);
        assert_eq!(weather.phase, 0);
        assert_eq!(weather.season, 0);
        assert!(weather.phase_remaining > 0.0);

        let mut len: usize = 0;
        let mut events: *const GroveSimEvent = ptr::null();
        let code = unsafe { grove_sim_drain_events(instance, &mut len, &mut events) };
        assert_eq!(code, GroveSimErrorCode::Ok);
        assert_eq!(len, 1);
        let first = unsafe { *events };
        assert_eq!(first, GroveSimEvent { kind: 1, ..GroveSimEvent::default() });

        let code = unsafe { grove_sim_drain_events(instance, &mut len, &mut events) };
        assert_eq!(code, GroveSimErrorCode::Ok);
        assert_eq!(len, 0);

        unsafe { grove_sim_destroy(instance) };
    }
}
