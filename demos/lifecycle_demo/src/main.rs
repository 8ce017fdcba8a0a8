use std::rc::Rc;

use anyhow::Context;
use lifecycle_components::*;
use lifecycle_core::prelude::*;
use serde_json::json;

fn config_from_args() -> anyhow::Result<TrackerConfig> {
    let mut config = TrackerConfig::default();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--strict" => config.strict_prop_access = true,
            "--config" => {
                let path = args.next().context("--config needs a path")?;
                let text = std::fs::read_to_string(&path)
                    .with_context(|| format!("reading config {path}"))?;
                config = TrackerConfig::from_json(&text)
                    .with_context(|| format!("parsing config {path}"))?;
            }
            other => anyhow::bail!("unknown argument: {other}"),
        }
    }
    Ok(config)
}

fn log_errors(owner: &Owner, report: &FlushReport) {
    for (key, err) in &report.errors {
        log::error!("{}: {err}", owner.name(*key).unwrap_or("?"));
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let config = config_from_args()?;

    let sink = RecordingSink::new();
    let mut owner = Owner::new(Rc::new(Tee(sink.clone(), LogSink::default())), config);

    let sample = owner.insert(
        LifeCycleSample::new(),
        Props::from_value(json!({ "color": "red" })),
    );
    let practice = owner.insert(EventPractice, Props::new());
    let card = owner.insert(MyComponent::new(), Props::new().with("favoriteNum", 7));

    for key in [sample, practice, card] {
        if let Err(e) = owner.mount(key) {
            log::error!("mount of {} failed: {e}", owner.name(key).unwrap_or("?"));
        }
    }

    if owner.phase(sample) == Some(Phase::Mounted) {
        // Clicks stall at 3 and 13 (the next value is vetoed); direct sets move past.
        for jump in [None, Some(5), Some(13), Some(15)] {
            if let Some(n) = jump {
                let outcome = owner.with::<LifeCycleSample, _>(sample, |inst| {
                    inst.set_state(move |s: &mut SampleState| s.number = n)
                })??;
                log::info!("set {n} -> {outcome:?}");
            }
            for _ in 0..4 {
                let outcome = owner.with::<LifeCycleSample, _>(sample, LifeCycleSample::click)??;
                log::info!("click -> {outcome:?}");
            }
        }
        owner.request_update(sample, Props::new().with("color", "blue"))?;
    }

    owner.with::<EventPractice, _>(practice, |inst| {
        EventPractice::handle_change(inst, "hello")?;
        EventPractice::handle_click(inst)
    })??;

    owner.request_teardown(practice)?;
    owner.request_teardown(card)?;
    let report = owner.flush();
    log_errors(&owner, &report);

    owner.request_teardown(sample)?;
    let report = owner.flush();
    log_errors(&owner, &report);

    for line in sink.timeline() {
        println!("{line}");
    }
    Ok(())
}
