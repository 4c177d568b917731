//! Scenario compilation: file-level definitions to live simulation objects.

use cp_controls::{
    CascadePd, ControlLimits, FuzzyConfig, FuzzyController, OpenLoop, PdGains, PidGains, Policy,
    SinglePid,
};
use cp_core::units::{deg, kg, kg_m2, m, mps2, to_rad};
use cp_plant::{CartPole, PhysicalParameters, State};
use cp_project::schema::{ControllerDef, IntegratorDef, PlantDef, Scenario};
use cp_sim::{
    DisturbancePulse, DisturbanceSchedule, IntegratorType, Session, SessionConfig, SimOptions,
};
use tracing::debug;

use crate::error::AppResult;

/// A scenario ready to tick.
pub struct CompiledScenario {
    pub name: String,
    pub session: Session,
    pub options: SimOptions,
    pub limits: ControlLimits,
}

pub fn compile_scenario(scenario: &Scenario) -> AppResult<CompiledScenario> {
    cp_project::validate_scenario(scenario)?;

    let params = compile_plant(&scenario.plant)?;
    let limits = ControlLimits::new(
        scenario.limits.force_limit_n,
        to_rad(deg(scenario.limits.reference_angle_limit_deg)),
        scenario.limits.travel_limit_m,
    )?;
    let policy = compile_policy(&scenario.controller, limits, params.gravity())?;

    let s = &scenario.initial_state;
    let initial_state = State::new(
        s.x_m,
        s.x_dot_m_per_s,
        to_rad(deg(s.theta_deg)),
        s.theta_dot_rad_per_s,
    );

    let pulses = scenario
        .disturbances
        .iter()
        .map(|d| DisturbancePulse::new(d.start_s, d.duration_s, d.force_n))
        .collect::<Result<Vec<_>, _>>()?;

    let config = SessionConfig {
        dt: scenario.run.dt_s,
        integrator: match scenario.run.integrator {
            IntegratorDef::Rk4 => IntegratorType::Rk4,
            IntegratorDef::ForwardEuler => IntegratorType::ForwardEuler,
        },
        initial_state,
        travel_limit: limits.travel_limit,
        disturbances: DisturbanceSchedule::new(pulses)?,
    };

    let session = Session::new(CartPole::new(params), policy, config)?;
    debug!(
        scenario = %scenario.name,
        controller = scenario.controller.kind(),
        "scenario compiled"
    );

    Ok(CompiledScenario {
        name: scenario.name.clone(),
        session,
        options: SimOptions {
            t_end: scenario.run.t_end_s,
            record_every: scenario.run.record_every,
            ..SimOptions::default()
        },
        limits,
    })
}

fn compile_plant(plant: &PlantDef) -> AppResult<PhysicalParameters> {
    Ok(PhysicalParameters::new(
        kg(plant.cart_mass_kg),
        kg(plant.pole_mass_kg),
        m(plant.pole_length_m),
        plant.cart_friction_n_s_per_m,
        plant.pivot_friction_n_m_s_per_rad,
        kg_m2(plant.pole_inertia_kg_m2),
        mps2(plant.gravity_m_per_s2),
    )?)
}

/// Build a policy from its file definition. The cascade needs the plant's
/// gravity and the scenario limits; the other strategies ignore them.
pub fn compile_policy(
    controller: &ControllerDef,
    limits: ControlLimits,
    gravity: f64,
) -> AppResult<Policy> {
    let policy: Policy = match controller {
        ControllerDef::OpenLoop { force_n } => OpenLoop::new(*force_n)?.into(),
        ControllerDef::SinglePid {
            kp,
            ki,
            kd,
            target_angle_deg,
        } => SinglePid::new(PidGains::new(*kp, *ki, *kd)?)?
            .with_target_angle(to_rad(deg(*target_angle_deg)))
            .into(),
        ControllerDef::CascadePd {
            angle_kp,
            angle_ki,
            angle_kd,
            position_kp,
            position_kd,
            anti_windup,
            target_x_m,
        } => CascadePd::new(
            PidGains::new(*angle_kp, *angle_ki, *angle_kd)?,
            PdGains::new(*position_kp, *position_kd)?,
            limits,
            gravity,
        )?
        .with_anti_windup(*anti_windup)
        .with_target_x(*target_x_m)
        .into(),
        ControllerDef::Fuzzy {
            universe_min_n,
            universe_max_n,
            universe_points,
        } => FuzzyController::new(FuzzyConfig {
            universe_min: *universe_min_n,
            universe_max: *universe_max_n,
            universe_points: *universe_points,
        })?
        .into(),
    };
    Ok(policy)
}
