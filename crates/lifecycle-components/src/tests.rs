#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use lifecycle_core::prelude::*;
    use serde_json::{Value, json};

    use crate::*;

    fn props(color: &str) -> Props {
        Props::new().with("color", color)
    }

    fn sample(initial: Props, config: TrackerConfig) -> (Instance<LifeCycleSample>, RecordingSink) {
        let sink = RecordingSink::new();
        let inst = Instance::create(LifeCycleSample::new(), initial, Rc::new(sink.clone()), config);
        (inst, sink)
    }

    fn mounted_red() -> (Instance<LifeCycleSample>, RecordingSink) {
        let (mut inst, sink) = sample(props("red"), TrackerConfig::default());
        inst.mount().unwrap();
        sink.clear();
        (inst, sink)
    }

    fn set_number(n: u32) -> impl FnOnce(&mut SampleState) {
        move |s| s.number = n
    }

    const FULL: [Step; 6] = [
        Step::DeriveStateFromProps,
        Step::ShouldUpdate,
        Step::Render,
        Step::CaptureSnapshot,
        Step::SurfaceApply,
        Step::DidUpdate,
    ];
    const VETOED: [Step; 2] = [Step::DeriveStateFromProps, Step::ShouldUpdate];

    #[test]
    fn test_create_starts_empty() {
        let (inst, sink) = sample(props("red"), TrackerConfig::default());
        assert_eq!(inst.phase(), Phase::Mounting);
        assert_eq!(inst.state(), &SampleState::default());
        assert_eq!(sink.steps(), vec![Step::Constructor]);
    }

    #[test]
    fn test_mount_renders_derived_color() {
        let (inst, _) = mounted_red();
        assert_eq!(inst.state().color.as_deref(), Some("red"));

        let root = inst.surface().unwrap().root();
        assert_eq!(root.text_content(), "0\ncolor: red\nAdd");
        let heading = root.find_ref(HEADING_REF).unwrap();
        assert_eq!(heading.style_of("color"), Some("red"));
    }

    #[test]
    fn test_veto_only_on_four_mod_ten() {
        let (mut inst, sink) = mounted_red();

        let mut skipped = Vec::new();
        for n in 0..=20u32 {
            sink.clear();
            let out = inst.set_state(set_number(n)).unwrap();
            if out == UpdateOutcome::Skipped {
                skipped.push(n);
                assert_eq!(sink.steps(), VETOED.to_vec());
            } else {
                assert_eq!(sink.steps(), FULL.to_vec());
            }
        }

        assert_eq!(skipped, vec![4, 14]);
    }

    #[test]
    fn test_order_holds_for_mixed_updates() {
        let (mut inst, sink) = mounted_red();

        inst.set_props(props("blue")).unwrap();
        inst.set_state(set_number(4)).unwrap();
        inst.force_update().unwrap();
        inst.request_update(UpdateRequest::props(props("green")).with_state(set_number(7)))
            .unwrap();

        let mut expected = Vec::new();
        expected.extend(FULL);
        expected.extend(VETOED);
        expected.extend(FULL);
        expected.extend(FULL);
        assert_eq!(sink.lifecycle_steps(), expected);
    }

    #[test]
    fn test_same_color_has_no_snapshot() {
        let (mut inst, sink) = mounted_red();

        let req = UpdateRequest::props(props("red")).with_state(set_number(1));
        assert_eq!(inst.request_update(req).unwrap(), UpdateOutcome::Rendered);

        let snap = sink.last(Step::CaptureSnapshot).unwrap();
        assert_eq!(snap.args["snapshot"], Value::Null);
        let did = sink.last(Step::DidUpdate).unwrap();
        assert_eq!(did.args["snapshot"], Value::Null);
        assert_eq!(inst.state().number, 1);
    }

    #[test]
    fn test_color_change_snapshot_reaches_did_update() {
        let (mut inst, sink) = mounted_red();

        let req = UpdateRequest::props(props("blue")).with_state(set_number(1));
        inst.request_update(req).unwrap();

        let snap = sink.last(Step::CaptureSnapshot).unwrap();
        assert_eq!(snap.args["snapshot"], json!("red"));
        let did = sink.last(Step::DidUpdate).unwrap();
        assert_eq!(did.args["snapshot"], snap.args["snapshot"]);
        assert_eq!(did.args["prevProps"], json!({ "color": "red" }));

        let heading = inst.surface().unwrap().find_ref(HEADING_REF).unwrap();
        assert_eq!(heading.style_of("color"), Some("blue"));
        assert_eq!(inst.state().color.as_deref(), Some("blue"));

        let change = sink.last(Step::Handler("color_change")).unwrap();
        assert_eq!(change.args, json!({ "from": "red", "to": "blue" }));
        assert_eq!(sink.steps().last(), Some(&Step::Handler("color_change")));
    }

    #[test]
    fn test_update_after_teardown() {
        let (mut inst, _) = mounted_red();
        inst.request_teardown().unwrap();

        assert_eq!(
            inst.set_props(props("blue")),
            Err(LifecycleError::PostUnmount { op: "request_update" })
        );
        assert_eq!(
            LifeCycleSample::click(&mut inst),
            Err(LifecycleError::PostUnmount { op: "click" })
        );
    }

    #[test]
    fn test_derive_idempotent() {
        let next = props("blue");
        let prev = SampleState {
            number: 3,
            color: Some("red".into()),
        };

        let a = LifeCycleSample::derive_state_from_props(&next, &prev);
        let b = LifeCycleSample::derive_state_from_props(&next, &prev);
        assert_eq!(a, b);
        assert_eq!(
            a,
            Some(ColorPatch {
                color: Some("blue".into())
            })
        );
        assert_eq!(prev.color.as_deref(), Some("red"));

        let same = LifeCycleSample::derive_state_from_props(&props("red"), &prev);
        assert_eq!(same, None);
    }

    #[test]
    fn test_strict_missing_prop() {
        let (mut inst, sink) = sample(props("red"), TrackerConfig::strict());
        assert_eq!(
            inst.mount(),
            Err(LifecycleError::MissingPropPath {
                path: "missing.value".into()
            })
        );
        assert!(inst.surface().is_none());
        assert_eq!(sink.count(Step::DidMount), 0);

        let with_missing = props("red").with("missing", json!({ "value": "here" }));
        let (mut inst, _) = sample(with_missing, TrackerConfig::strict());
        inst.mount().unwrap();
        assert!(inst.surface().unwrap().root().text_content().starts_with("here\n"));
    }

    #[test]
    fn test_strict_update_failure_keeps_state() {
        let (mut inst, _) = sample(
            props("red").with("missing", json!({ "value": 1 })),
            TrackerConfig::strict(),
        );
        inst.mount().unwrap();

        let err = inst
            .request_update(UpdateRequest::props(props("blue")).with_state(set_number(2)))
            .unwrap_err();

        assert!(matches!(err, LifecycleError::MissingPropPath { .. }));
        assert_eq!(inst.phase(), Phase::Mounted);
        assert_eq!(inst.state().number, 0);
        assert_eq!(inst.props().color(), Some("red"));
        assert_eq!(inst.surface().unwrap().applied(), 1);
    }

    #[test]
    fn test_click_increments_until_veto() {
        let (mut inst, sink) = mounted_red();

        for _ in 0..3 {
            assert_eq!(LifeCycleSample::click(&mut inst).unwrap(), UpdateOutcome::Rendered);
        }
        assert_eq!(LifeCycleSample::click(&mut inst).unwrap(), UpdateOutcome::Skipped);
        assert_eq!(inst.state().number, 3);
        assert_eq!(sink.count(Step::Handler("click")), 4);
    }

    #[test]
    fn test_click_saturates_at_max() {
        let component = LifeCycleSample::with_policy(AlwaysUpdate);
        let mut inst = Instance::new(component, props("red"));
        inst.mount().unwrap();
        inst.set_state(set_number(u32::MAX)).unwrap();

        assert_eq!(LifeCycleSample::click(&mut inst).unwrap(), UpdateOutcome::Rendered);
        assert_eq!(inst.state().number, u32::MAX);
        let heading = inst.surface().unwrap().find_ref(HEADING_REF).unwrap();
        assert_eq!(heading.text_content(), u32::MAX.to_string());
    }

    #[test]
    fn test_custom_policy() {
        let component = LifeCycleSample::with_policy(AlwaysUpdate);
        let mut inst = Instance::new(component, props("red"));
        inst.mount().unwrap();

        inst.set_state(set_number(4)).unwrap();
        assert_eq!(inst.state().number, 4);

        let even_only = |_: &Props, s: &SampleState| s.number % 2 == 0;
        let mut inst = Instance::new(LifeCycleSample::with_policy(even_only), props("red"));
        inst.mount().unwrap();
        assert_eq!(inst.set_state(set_number(3)).unwrap(), UpdateOutcome::Skipped);
    }

    #[test]
    fn test_event_practice_change_and_click() {
        let sink = RecordingSink::new();
        let mut inst = Instance::create(
            EventPractice,
            Props::new(),
            Rc::new(sink.clone()),
            TrackerConfig::default(),
        );
        inst.mount().unwrap();

        EventPractice::handle_change(&mut inst, "hello").unwrap();
        assert_eq!(inst.state().message, "hello");
        let input = inst.surface().unwrap().find_ref("message").unwrap();
        assert_eq!(
            input.kind,
            NodeKind::Input {
                value: "hello".into(),
                placeholder: EventPractice::PLACEHOLDER.into(),
            }
        );

        let alerted = EventPractice::handle_click(&mut inst).unwrap();
        assert_eq!(alerted, "hello");
        assert_eq!(inst.state().message, "");
        let alert = sink.last(Step::Handler("alert")).unwrap();
        assert_eq!(alert.args, json!({ "message": "hello" }));
    }

    #[test]
    fn test_event_practice_requires_mount() {
        let mut inst = Instance::new(EventPractice, Props::new());
        assert_eq!(
            EventPractice::handle_click(&mut inst),
            Err(LifecycleError::NotMounted { op: "handle_click" })
        );
    }

    #[test]
    fn test_my_component_defaults_and_warnings() {
        let component = MyComponent::new();
        assert_eq!(
            component.validate(&Props::new()),
            vec![PropWarning::MissingRequired {
                name: "favoriteNum".into()
            }]
        );

        let mut inst = Instance::new(
            component,
            Props::new().with("favoriteNum", 7).with("children", "kids"),
        );
        inst.mount().unwrap();
        assert_eq!(
            inst.surface().unwrap().root().text_content(),
            format!("Hello, my name is {DEFAULT_NAME}.\nchildren: kids\nMy favorite number is 7.")
        );
        assert!(inst.component().validate(inst.props()).is_empty());
    }

    #[test]
    fn test_owner_drives_sample() {
        let sink = RecordingSink::new();
        let mut owner = Owner::new(Rc::new(sink.clone()), TrackerConfig::default());
        let key = owner.insert(LifeCycleSample::new(), props("red"));
        owner.mount(key).unwrap();

        owner.request_update(key, props("blue")).unwrap();
        owner
            .with::<LifeCycleSample, _>(key, |inst| LifeCycleSample::click(inst))
            .unwrap()
            .unwrap();
        owner.flush();

        owner.request_teardown(key).unwrap();
        assert_eq!(
            owner.request_update(key, props("green")),
            Err(LifecycleError::PostUnmount { op: "request_update" })
        );
        let report = owner.flush();
        assert_eq!(report.delivered, vec![(key, Delivery::TornDown)]);
        assert!(report.is_ok());

        assert_eq!(sink.last(Step::CaptureSnapshot).unwrap().args["snapshot"], json!("red"));
        assert_eq!(owner.phase(key), Some(Phase::Unmounted));
    }
}
