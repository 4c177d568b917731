//! Scenario schema definitions.
//!
//! Field names carry their units. Angles in the file are degrees except
//! angular rates, which stay in rad/s.

use serde::{Deserialize, Serialize};

pub const LATEST_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    pub version: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub plant: PlantDef,
    pub controller: ControllerDef,
    #[serde(default)]
    pub limits: LimitsDef,
    #[serde(default)]
    pub initial_state: InitialStateDef,
    #[serde(default)]
    pub run: RunDef,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub disturbances: Vec<DisturbanceDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlantDef {
    pub cart_mass_kg: f64,
    pub pole_mass_kg: f64,
    pub pole_length_m: f64,
    #[serde(default)]
    pub cart_friction_n_s_per_m: f64,
    #[serde(default)]
    pub pivot_friction_n_m_s_per_rad: f64,
    #[serde(default)]
    pub pole_inertia_kg_m2: f64,
    #[serde(default = "default_gravity")]
    pub gravity_m_per_s2: f64,
}

fn default_gravity() -> f64 {
    9.81
}

impl Default for PlantDef {
    fn default() -> Self {
        Self {
            cart_mass_kg: 0.5,
            pole_mass_kg: 0.2,
            pole_length_m: 0.5,
            cart_friction_n_s_per_m: 0.1,
            pivot_friction_n_m_s_per_rad: 0.01,
            pole_inertia_kg_m2: 0.006,
            gravity_m_per_s2: default_gravity(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ControllerDef {
    OpenLoop {
        #[serde(default)]
        force_n: f64,
    },
    SinglePid {
        kp: f64,
        #[serde(default)]
        ki: f64,
        kd: f64,
        #[serde(default)]
        target_angle_deg: f64,
    },
    CascadePd {
        angle_kp: f64,
        #[serde(default)]
        angle_ki: f64,
        angle_kd: f64,
        position_kp: f64,
        position_kd: f64,
        #[serde(default = "default_true")]
        anti_windup: bool,
        #[serde(default)]
        target_x_m: f64,
    },
    Fuzzy {
        #[serde(default = "default_universe_min")]
        universe_min_n: f64,
        #[serde(default = "default_universe_max")]
        universe_max_n: f64,
        #[serde(default = "default_universe_points")]
        universe_points: usize,
    },
}

fn default_true() -> bool {
    true
}

fn default_universe_min() -> f64 {
    -50.0
}

fn default_universe_max() -> f64 {
    50.0
}

fn default_universe_points() -> usize {
    200
}

impl ControllerDef {
    pub fn kind(&self) -> &'static str {
        match self {
            ControllerDef::OpenLoop { .. } => "OpenLoop",
            ControllerDef::SinglePid { .. } => "SinglePid",
            ControllerDef::CascadePd { .. } => "CascadePd",
            ControllerDef::Fuzzy { .. } => "Fuzzy",
        }
    }

    /// Nominal cascade tuning.
    pub fn cascade_nominal() -> Self {
        ControllerDef::CascadePd {
            angle_kp: 150.0,
            angle_ki: 0.0,
            angle_kd: 25.0,
            position_kp: 2.0,
            position_kd: 1.2,
            anti_windup: true,
            target_x_m: 0.0,
        }
    }

    pub fn fuzzy_default() -> Self {
        ControllerDef::Fuzzy {
            universe_min_n: default_universe_min(),
            universe_max_n: default_universe_max(),
            universe_points: default_universe_points(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LimitsDef {
    pub force_limit_n: f64,
    pub reference_angle_limit_deg: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub travel_limit_m: Option<f64>,
}

impl Default for LimitsDef {
    fn default() -> Self {
        Self {
            force_limit_n: 25.0,
            reference_angle_limit_deg: 18.0,
            travel_limit_m: Some(3.0),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct InitialStateDef {
    #[serde(default)]
    pub x_m: f64,
    #[serde(default)]
    pub x_dot_m_per_s: f64,
    #[serde(default)]
    pub theta_deg: f64,
    #[serde(default)]
    pub theta_dot_rad_per_s: f64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum IntegratorDef {
    #[default]
    Rk4,
    ForwardEuler,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunDef {
    pub dt_s: f64,
    pub t_end_s: f64,
    #[serde(default)]
    pub integrator: IntegratorDef,
    #[serde(default = "default_record_every")]
    pub record_every: usize,
}

fn default_record_every() -> usize {
    1
}

impl Default for RunDef {
    fn default() -> Self {
        Self {
            dt_s: 0.01,
            t_end_s: 10.0,
            integrator: IntegratorDef::default(),
            record_every: default_record_every(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisturbanceDef {
    pub start_s: f64,
    pub duration_s: f64,
    pub force_n: f64,
}
