//! Built-in scenarios.

use crate::schema::{
    ControllerDef, DisturbanceDef, InitialStateDef, LATEST_VERSION, LimitsDef, PlantDef, RunDef,
    Scenario,
};

pub const PRESET_NAMES: [&str; 5] = [
    "cascade_nominal",
    "cascade_push",
    "fuzzy_cart",
    "single_pid",
    "free_swing",
];

/// Look up a preset by name.
pub fn preset(name: &str) -> Option<Scenario> {
    match name {
        "cascade_nominal" => Some(cascade_nominal()),
        "cascade_push" => Some(cascade_push()),
        "fuzzy_cart" => Some(fuzzy_cart()),
        "single_pid" => Some(single_pid()),
        "free_swing" => Some(free_swing()),
        _ => None,
    }
}

pub fn all_presets() -> Vec<Scenario> {
    PRESET_NAMES.iter().filter_map(|n| preset(n)).collect()
}

/// Cascade PD on the nominal rig, released at 8°.
pub fn cascade_nominal() -> Scenario {
    Scenario {
        version: LATEST_VERSION,
        name: "cascade_nominal".to_string(),
        description: Some("Cascade PD balancing from an 8 degree lean".to_string()),
        plant: PlantDef::default(),
        controller: ControllerDef::cascade_nominal(),
        limits: LimitsDef::default(),
        initial_state: InitialStateDef {
            theta_deg: 8.0,
            ..InitialStateDef::default()
        },
        run: RunDef::default(),
        disturbances: Vec::new(),
    }
}

/// Upright start with two opposing shoves on the cart.
pub fn cascade_push() -> Scenario {
    Scenario {
        name: "cascade_push".to_string(),
        description: Some("Cascade PD rejecting scheduled pushes".to_string()),
        initial_state: InitialStateDef::default(),
        disturbances: vec![
            DisturbanceDef {
                start_s: 1.0,
                duration_s: 0.1,
                force_n: 5.0,
            },
            DisturbanceDef {
                start_s: 5.0,
                duration_s: 0.1,
                force_n: -5.0,
            },
        ],
        ..cascade_nominal()
    }
}

/// Fuzzy rule base at 50 Hz from a 0.2 rad lean.
pub fn fuzzy_cart() -> Scenario {
    Scenario {
        version: LATEST_VERSION,
        name: "fuzzy_cart".to_string(),
        description: Some("Fuzzy angle/rate controller at 50 Hz".to_string()),
        plant: PlantDef::default(),
        controller: ControllerDef::fuzzy_default(),
        limits: LimitsDef {
            travel_limit_m: None,
            ..LimitsDef::default()
        },
        initial_state: InitialStateDef {
            theta_deg: 0.2_f64.to_degrees(),
            ..InitialStateDef::default()
        },
        run: RunDef {
            dt_s: 0.02,
            t_end_s: 5.0,
            ..RunDef::default()
        },
        disturbances: Vec::new(),
    }
}

/// Unsaturated angle PID; the cart is left to drift.
pub fn single_pid() -> Scenario {
    Scenario {
        version: LATEST_VERSION,
        name: "single_pid".to_string(),
        description: Some("Single-loop PID on the pole angle".to_string()),
        plant: PlantDef::default(),
        controller: ControllerDef::SinglePid {
            kp: 60.0,
            ki: 5.0,
            kd: 8.0,
            target_angle_deg: 0.0,
        },
        limits: LimitsDef {
            travel_limit_m: None,
            ..LimitsDef::default()
        },
        initial_state: InitialStateDef {
            theta_deg: 5.0,
            ..InitialStateDef::default()
        },
        run: RunDef {
            t_end_s: 5.0,
            ..RunDef::default()
        },
        disturbances: Vec::new(),
    }
}

/// Uncontrolled 1 m pole released just off hanging, pivot frictionless.
pub fn free_swing() -> Scenario {
    Scenario {
        version: LATEST_VERSION,
        name: "free_swing".to_string(),
        description: Some("Open-loop swing about the hanging position".to_string()),
        plant: PlantDef {
            pole_length_m: 1.0,
            pivot_friction_n_m_s_per_rad: 0.0,
            ..PlantDef::default()
        },
        controller: ControllerDef::OpenLoop { force_n: 0.0 },
        limits: LimitsDef {
            travel_limit_m: None,
            ..LimitsDef::default()
        },
        initial_state: InitialStateDef {
            theta_deg: 180.0 - 0.1_f64.to_degrees(),
            ..InitialStateDef::default()
        },
        run: RunDef {
            t_end_s: 10.0,
            ..RunDef::default()
        },
        disturbances: Vec::new(),
    }
}
