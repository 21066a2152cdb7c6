//! Simulator cursor bounds, progress, and the telemetry it publishes.

use suit_ingress::procedure::StepId;
use suit_ingress::simulator::{ProcedureCursor, ProcedureSimulator, SimulationScript};
use suit_ingress::telemetry::{EvaSlot, Subsystem, TelemetryStore};

fn simulator() -> (ProcedureSimulator, TelemetryStore) {
    let store = TelemetryStore::new();
    let sim = ProcedureSimulator::new(SimulationScript::ingress(EvaSlot::Eva1), store.clone());
    (sim, store)
}

#[test]
fn construction_publishes_gated_documents() {
    let (sim, store) = simulator();
    assert_eq!(sim.cursor().position(), StepId::new(1, 1));
    assert!(store.contains(Subsystem::Uia));
    assert!(store.contains(Subsystem::Dcu));
    assert!(store.contains(Subsystem::Telemetry));
    assert!(!store.contains(Subsystem::Rover));
    assert_eq!(sim.current_label(), "Connect EV-1 UIA and DCU umbilical");
}

#[test]
fn retreat_at_first_step_is_noop() {
    let (mut sim, _store) = simulator();
    assert!(!sim.retreat());
    assert_eq!(sim.cursor().position(), StepId::new(1, 1));
}

#[test]
fn advance_at_last_step_is_noop() {
    let (mut sim, store) = simulator();
    let mut moves = 0;
    while sim.advance() {
        moves += 1;
    }
    assert_eq!(moves, 11);
    assert_eq!(sim.cursor().position(), StepId::new(4, 2));
    assert_eq!(sim.progress(), 100);

    let before = store.snapshot();
    assert!(!sim.advance());
    assert_eq!(sim.cursor().position(), StepId::new(4, 2));
    assert_eq!(store.snapshot(), before);
}

#[test]
fn progress_at_phase_three_step_two() {
    let cursor = {
        let mut c = ProcedureCursor::new(vec![3, 3, 4, 2]).unwrap();
        for _ in 0..7 {
            c.advance();
        }
        c
    };
    assert_eq!(cursor.position(), StepId::new(3, 2));
    assert_eq!(cursor.completed_substeps(), 8);
    assert_eq!(cursor.progress(), 67);
}

#[test]
fn every_position_has_a_label() {
    let (mut sim, _store) = simulator();
    loop {
        assert!(!sim.current_label().is_empty());
        assert!(sim.status_text().contains(&format!("Progress: {}%", sim.progress())));
        if !sim.advance() {
            break;
        }
    }
}

#[test]
fn forward_and_backward_publish_identical_state() {
    let (mut sim, store) = simulator();
    let mut forward = vec![store.snapshot()];
    while sim.advance() {
        forward.push(store.snapshot());
    }
    let mut backward = vec![store.snapshot()];
    while sim.retreat() {
        backward.push(store.snapshot());
    }
    backward.reverse();
    assert_eq!(forward, backward);
}

#[test]
fn operator_override_is_replaced_on_next_move() {
    let (mut sim, store) = simulator();
    store
        .ingest_named(
            "uia",
            r#"{"uia":{"eva1_power":true,"eva1_oxy":true,"eva1_water_supply":true,
               "eva1_water_waste":true,"eva2_power":true,"eva2_oxy":true,
               "eva2_water_supply":true,"eva2_water_waste":true,"oxy_vent":true,
               "depress":true}}"#,
        )
        .unwrap();
    assert!(store.uia().unwrap().uia.depress);

    sim.advance();
    let uia = store.uia().unwrap();
    assert!(!uia.uia.depress);
    assert!(uia.uia.eva1_power);
}
