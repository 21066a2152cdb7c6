//! Property tests for completion monotonicity and the halt-on-gate rule.

use proptest::prelude::*;

use suit_ingress::procedure::{Panel, ProcedureEngine, ProcedureLibrary, StepId, TickOutcome};
use suit_ingress::telemetry::schema::{DcuDocument, TelemetryDocument, UiaDocument};
use suit_ingress::telemetry::{EvaSlot, TelemetryStore};

/// Randomized values for every field the ingress gates read.
#[derive(Debug, Clone)]
struct Frame {
    power: bool,
    vent: bool,
    waste: bool,
    batt: bool,
    pump: bool,
    oxy_pri: f64,
    oxy_sec: f64,
    coolant: f64,
    uia_present: bool,
}

fn arb_frame() -> impl Strategy<Value = Frame> {
    (
        any::<[bool; 6]>(),
        0.0f64..20.0,
        0.0f64..20.0,
        0.0f64..10.0,
    )
        .prop_map(|(b, oxy_pri, oxy_sec, coolant)| Frame {
            power: b[0],
            vent: b[1],
            waste: b[2],
            batt: b[3],
            pump: b[4],
            uia_present: b[5],
            oxy_pri,
            oxy_sec,
            coolant,
        })
}

fn publish(store: &TelemetryStore, frame: &Frame) {
    if frame.uia_present {
        let mut uia = UiaDocument::default();
        uia.uia.eva1_power = frame.power;
        uia.uia.oxy_vent = frame.vent;
        uia.uia.eva1_water_waste = frame.waste;
        store.replace_uia(uia);
    } else {
        store.clear(suit_ingress::telemetry::Subsystem::Uia);
    }

    let mut dcu = DcuDocument::default();
    dcu.dcu.eva1.batt = frame.batt;
    dcu.dcu.eva1.pump = frame.pump;
    store.replace_dcu(dcu);

    let mut vitals = TelemetryDocument::default();
    vitals.telemetry.eva1.oxy_pri_storage = frame.oxy_pri;
    vitals.telemetry.eva1.oxy_sec_storage = frame.oxy_sec;
    vitals.telemetry.eva1.coolant_ml = frame.coolant;
    store.replace_telemetry(vitals);
}

fn flags(engine: &ProcedureEngine<Panel>) -> Vec<(StepId, bool)> {
    let library = engine.library();
    library
        .shape()
        .iter()
        .enumerate()
        .flat_map(|(p, &len)| (1..=len).map(move |s| StepId::new(p + 1, s)))
        .map(|id| (id, engine.matrix().is_complete(id)))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: a completed step is never marked incomplete again.
    #[test]
    fn prop_completion_is_monotonic(frames in prop::collection::vec(arb_frame(), 1..40)) {
        let store = TelemetryStore::new();
        let mut engine = ProcedureEngine::new(
            ProcedureLibrary::ingress(EvaSlot::Eva1),
            store.clone(),
            Panel::new(),
        );

        let mut before = flags(&engine);
        for frame in &frames {
            publish(&store, frame);
            engine.tick();
            let after = flags(&engine);
            for ((id, was), (_, now)) in before.iter().zip(&after) {
                prop_assert!(!*was || *now, "step {} regressed", id);
            }
            before = after;
        }
    }

    /// Property: a halted tick leaves every later step untouched, and every
    /// earlier step complete.
    #[test]
    fn prop_halt_preserves_later_steps(frames in prop::collection::vec(arb_frame(), 1..40)) {
        let store = TelemetryStore::new();
        let mut engine = ProcedureEngine::new(
            ProcedureLibrary::ingress(EvaSlot::Eva1),
            store.clone(),
            Panel::new(),
        );

        for frame in &frames {
            publish(&store, frame);
            let before = flags(&engine);
            let outcome = engine.tick();
            let after = flags(&engine);

            match outcome {
                TickOutcome::Halted(halt) => {
                    prop_assert!(!engine.matrix().is_complete(halt));
                    for ((id, was), (_, now)) in before.iter().zip(&after) {
                        if *id > halt {
                            prop_assert_eq!(was, now, "step {} changed past halt {}", id, halt);
                        } else if *id < halt {
                            prop_assert!(*now, "step {} before halt {} incomplete", id, halt);
                        }
                    }
                }
                TickOutcome::Complete => {
                    prop_assert!(after.iter().all(|(_, done)| *done));
                }
            }
        }
    }
}
