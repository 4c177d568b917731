//! Scenario validation logic.

use crate::schema::{ControllerDef, LATEST_VERSION, Scenario};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn finite(field: &str, v: f64) -> Result<(), ValidationError> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, v, "must be finite"))
    }
}

fn positive(field: &str, v: f64) -> Result<(), ValidationError> {
    finite(field, v)?;
    if v > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, v, "must be positive"))
    }
}

fn non_negative(field: &str, v: f64) -> Result<(), ValidationError> {
    finite(field, v)?;
    if v >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, v, "must be non-negative"))
    }
}

pub fn validate_scenario(scenario: &Scenario) -> Result<(), ValidationError> {
    if scenario.version == 0 || scenario.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: scenario.version,
        });
    }
    if scenario.name.trim().is_empty() {
        return Err(invalid("name", &scenario.name, "must not be empty"));
    }

    let p = &scenario.plant;
    positive("plant.cart_mass_kg", p.cart_mass_kg)?;
    positive("plant.pole_mass_kg", p.pole_mass_kg)?;
    positive("plant.pole_length_m", p.pole_length_m)?;
    non_negative("plant.cart_friction_n_s_per_m", p.cart_friction_n_s_per_m)?;
    non_negative(
        "plant.pivot_friction_n_m_s_per_rad",
        p.pivot_friction_n_m_s_per_rad,
    )?;
    non_negative("plant.pole_inertia_kg_m2", p.pole_inertia_kg_m2)?;
    positive("plant.gravity_m_per_s2", p.gravity_m_per_s2)?;

    validate_controller(&scenario.controller)?;

    let l = &scenario.limits;
    positive("limits.force_limit_n", l.force_limit_n)?;
    positive("limits.reference_angle_limit_deg", l.reference_angle_limit_deg)?;
    if let Some(travel) = l.travel_limit_m {
        positive("limits.travel_limit_m", travel)?;
    }

    let s = &scenario.initial_state;
    finite("initial_state.x_m", s.x_m)?;
    finite("initial_state.x_dot_m_per_s", s.x_dot_m_per_s)?;
    finite("initial_state.theta_deg", s.theta_deg)?;
    finite("initial_state.theta_dot_rad_per_s", s.theta_dot_rad_per_s)?;

    let r = &scenario.run;
    positive("run.dt_s", r.dt_s)?;
    non_negative("run.t_end_s", r.t_end_s)?;
    if r.record_every == 0 {
        return Err(invalid("run.record_every", r.record_every, "must be positive"));
    }

    for d in &scenario.disturbances {
        non_negative("disturbances.start_s", d.start_s)?;
        positive("disturbances.duration_s", d.duration_s)?;
        finite("disturbances.force_n", d.force_n)?;
    }

    Ok(())
}

fn validate_controller(controller: &ControllerDef) -> Result<(), ValidationError> {
    match controller {
        ControllerDef::OpenLoop { force_n } => finite("controller.force_n", *force_n),
        ControllerDef::SinglePid {
            kp,
            ki,
            kd,
            target_angle_deg,
        } => {
            finite("controller.kp", *kp)?;
            finite("controller.ki", *ki)?;
            finite("controller.kd", *kd)?;
            finite("controller.target_angle_deg", *target_angle_deg)
        }
        ControllerDef::CascadePd {
            angle_kp,
            angle_ki,
            angle_kd,
            position_kp,
            position_kd,
            target_x_m,
            ..
        } => {
            finite("controller.angle_kp", *angle_kp)?;
            finite("controller.angle_ki", *angle_ki)?;
            finite("controller.angle_kd", *angle_kd)?;
            finite("controller.position_kp", *position_kp)?;
            finite("controller.position_kd", *position_kd)?;
            finite("controller.target_x_m", *target_x_m)
        }
        ControllerDef::Fuzzy {
            universe_min_n,
            universe_max_n,
            universe_points,
        } => {
            finite("controller.universe_min_n", *universe_min_n)?;
            finite("controller.universe_max_n", *universe_max_n)?;
            if universe_min_n >= universe_max_n {
                return Err(invalid(
                    "controller.universe_max_n",
                    universe_max_n,
                    "must exceed universe_min_n",
                ));
            }
            if *universe_points < 2 {
                return Err(invalid(
                    "controller.universe_points",
                    universe_points,
                    "needs at least two points",
                ));
            }
            Ok(())
        }
    }
}
