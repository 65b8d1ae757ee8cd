// Copyright 2026 the Marginalia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover-intent timing: activate on hover, dismiss only when nothing is
//! hovered anymore.
//!
//! The unhover check re-reads hover state when it fires, so moving the
//! pointer from one footnote to another within the delay window keeps
//! popovers up.
//!
//! Run:
//! - `cargo run -p marginalia_demos --example hover_intent`

use std::collections::HashMap;

use kurbo::{Rect, Size};
use marginalia_driver::driver::{Driver, InputEvent};
use marginalia_driver::entity::{Activity, Classes, StateClass};
use marginalia_driver::host::{DocumentHost, PopoverMetrics, TriggerBinding};
use marginalia_driver::settings::{Settings, Value};
use marginalia_placement::layout::HorizontalLayout;
use marginalia_placement::scroll::ScrollMetrics;

struct HoverDoc {
    classes: HashMap<u32, Classes>,
}

impl DocumentHost for HoverDoc {
    type Node = u32;

    fn setup(&mut self, _settings: &Settings) -> Vec<TriggerBinding<u32>> {
        vec![
            TriggerBinding {
                id: "a".to_string(),
                trigger: 0,
            },
            TriggerBinding {
                id: "b".to_string(),
                trigger: 1,
            },
        ]
    }

    fn materialize(&mut self, _id: &str, trigger: u32) -> Option<u32> {
        Some(10 + trigger)
    }

    fn release(&mut self, popover: u32) {
        self.classes.remove(&popover);
    }

    fn set_class(&mut self, node: u32, class: StateClass, on: bool) {
        self.classes.entry(node).or_default().set(class.bit(), on);
    }

    fn trigger_rect(&self, trigger: u32) -> Rect {
        let x = 100.0 + f64::from(trigger) * 200.0;
        Rect::new(x, 150.0, x + 20.0, 165.0)
    }

    fn trigger_margin_left(&self, _trigger: u32) -> f64 {
        0.0
    }

    fn viewport(&self) -> Size {
        Size::new(800.0, 600.0)
    }

    fn metrics(&self, _popover: u32) -> PopoverMetrics {
        PopoverMetrics {
            rendered_height: 100.0,
            vertical_margin: 10.0,
            max_height: 10_000.0,
            max_width: 0.9,
            content_width: 260.0,
            content_scroll_height: 100.0,
        }
    }

    fn scroll_metrics(&self, _popover: u32) -> ScrollMetrics {
        ScrollMetrics::default()
    }

    fn set_content_max_height(&mut self, _popover: u32, _height: f64) {}

    fn apply_horizontal(&mut self, _popover: u32, _layout: &HorizontalLayout) {}

    fn set_scroll_top(&mut self, _popover: u32, _value: f64) {}
}

fn main() {
    let settings = Settings::from_entries(vec![
        ("activateOnHover", Value::Bool(true)),
        ("dismissOnUnhover", Value::Bool(true)),
        ("hoverDelay", Value::Number(250.0)),
    ])
    .unwrap();
    let mut driver = Driver::new(
        HoverDoc {
            classes: HashMap::new(),
        },
        settings,
    );

    println!("== Pointer enters footnote a ==");
    driver.handle_event(InputEvent::HoverEnter { id: "a" });
    driver.advance(250);
    assert!(driver.is_active("a"));
    println!("t=250ms: a is active");

    println!("== Pointer slides from a to b ==");
    driver.handle_event(InputEvent::HoverLeave { id: "a" });
    driver.handle_event(InputEvent::HoverEnter { id: "b" });
    driver.advance(600);
    // b was hovered when the unhover check fired, so nothing was dismissed.
    assert!(driver.is_active("b"));
    println!("t=600ms: b is active, the pending dismissal was called off");

    println!("== Pointer leaves entirely ==");
    driver.handle_event(InputEvent::HoverLeave { id: "b" });
    driver.advance(2500);
    assert!(driver.entities().all(|e| e.activity() == Activity::Idle));
    println!("t=2500ms: nothing hovered, everything dismissed");
}
