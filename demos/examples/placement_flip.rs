// Copyright 2026 the Marginalia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Side flips as the page scrolls.
//!
//! Activates a popover whose trigger sits near the bottom of the viewport
//! (it opens above), then scrolls the trigger toward the top and repositions
//! (it flips below). The flip only restyles when the side actually changes.
//!
//! Run:
//! - `cargo run -p marginalia_demos --example placement_flip`

use std::collections::HashMap;

use kurbo::{Rect, Size};
use marginalia_driver::driver::{Driver, InputEvent};
use marginalia_driver::entity::{Classes, StateClass};
use marginalia_driver::host::{DocumentHost, PopoverMetrics, TriggerBinding};
use marginalia_driver::settings::{Settings, Value};
use marginalia_placement::layout::{HorizontalLayout, Side};
use marginalia_placement::scroll::ScrollMetrics;

struct ScrollingDoc {
    viewport: Size,
    trigger: Rect,
    classes: HashMap<u32, Classes>,
    restyles: usize,
}

impl DocumentHost for ScrollingDoc {
    type Node = u32;

    fn setup(&mut self, _settings: &Settings) -> Vec<TriggerBinding<u32>> {
        vec![TriggerBinding {
            id: "1".to_string(),
            trigger: 0,
        }]
    }

    fn materialize(&mut self, _id: &str, _trigger: u32) -> Option<u32> {
        Some(1)
    }

    fn release(&mut self, popover: u32) {
        self.classes.remove(&popover);
    }

    fn set_class(&mut self, node: u32, class: StateClass, on: bool) {
        if matches!(class, StateClass::PositionedTop | StateClass::PositionedBottom) && on {
            self.restyles += 1;
        }
        self.classes.entry(node).or_default().set(class.bit(), on);
    }

    fn trigger_rect(&self, _trigger: u32) -> Rect {
        self.trigger
    }

    fn trigger_margin_left(&self, _trigger: u32) -> f64 {
        0.0
    }

    fn viewport(&self) -> Size {
        self.viewport
    }

    fn metrics(&self, _popover: u32) -> PopoverMetrics {
        PopoverMetrics {
            rendered_height: 160.0,
            vertical_margin: 10.0,
            max_height: 10_000.0,
            max_width: 0.9,
            content_width: 300.0,
            content_scroll_height: 160.0,
        }
    }

    fn scroll_metrics(&self, _popover: u32) -> ScrollMetrics {
        ScrollMetrics::default()
    }

    fn set_content_max_height(&mut self, _popover: u32, height: f64) {
        println!("  content clamped to {height}px");
    }

    fn apply_horizontal(&mut self, _popover: u32, _layout: &HorizontalLayout) {}

    fn set_scroll_top(&mut self, _popover: u32, _value: f64) {}
}

fn main() {
    let doc = ScrollingDoc {
        viewport: Size::new(800.0, 600.0),
        trigger: Rect::new(390.0, 560.0, 410.0, 575.0),
        classes: HashMap::new(),
        restyles: 0,
    };
    let settings =
        Settings::from_entries(vec![("activateDelay", Value::Number(1.0))]).unwrap();
    let mut driver = Driver::new(doc, settings);

    println!("== Trigger near the bottom edge ==");
    driver.activate("1");
    driver.advance(1);
    assert_eq!(driver.entity("1").unwrap().placement(), Some(Side::Top));
    println!("popover opens above the trigger");

    println!("== Page scrolls; trigger now near the top edge ==");
    driver.host_mut().trigger = Rect::new(390.0, 20.0, 410.0, 35.0);
    driver.handle_event(InputEvent::ViewportScrolled);
    assert_eq!(driver.entity("1").unwrap().placement(), Some(Side::Bottom));
    println!("popover flips below the trigger");

    println!("== Small jitter; no flip, no restyle ==");
    let restyles = driver.host().restyles;
    driver.host_mut().trigger = Rect::new(390.0, 21.0, 410.0, 36.0);
    driver.reposition_all();
    assert_eq!(driver.entity("1").unwrap().placement(), Some(Side::Bottom));
    assert_eq!(driver.host().restyles, restyles);
    println!("placement classes untouched across a sub-pixel reposition");
}
