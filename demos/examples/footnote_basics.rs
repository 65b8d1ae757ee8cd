// Copyright 2026 the Marginalia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Full popover lifecycle against an in-memory document.
//!
//! Builds a driver over a tiny fake document, clicks a footnote trigger, and
//! walks the virtual clock through activation, mutual exclusion, and
//! dismissal.
//!
//! Run:
//! - `cargo run -p marginalia_demos --example footnote_basics`

use std::collections::HashMap;

use kurbo::{Rect, Size};
use marginalia_driver::driver::{Driver, InputEvent};
use marginalia_driver::entity::{Activity, Classes, StateClass};
use marginalia_driver::host::{DocumentHost, PopoverMetrics, TriggerBinding};
use marginalia_driver::settings::Settings;
use marginalia_placement::layout::HorizontalLayout;
use marginalia_placement::scroll::ScrollMetrics;

/// A document with two footnote triggers on one line.
struct MiniDoc {
    viewport: Size,
    triggers: Vec<(String, Rect)>,
    classes: HashMap<u32, Classes>,
    live_popovers: Vec<u32>,
}

const POPOVER_BASE: u32 = 100;

impl DocumentHost for MiniDoc {
    type Node = u32;

    fn setup(&mut self, _settings: &Settings) -> Vec<TriggerBinding<u32>> {
        self.triggers
            .iter()
            .enumerate()
            .map(|(i, (id, _))| TriggerBinding {
                id: id.clone(),
                trigger: i as u32,
            })
            .collect()
    }

    fn materialize(&mut self, id: &str, trigger: u32) -> Option<u32> {
        let popover = POPOVER_BASE + trigger;
        self.live_popovers.push(popover);
        println!("  [doc] rendered popover for footnote {id}");
        Some(popover)
    }

    fn release(&mut self, popover: u32) {
        self.live_popovers.retain(|&p| p != popover);
        self.classes.remove(&popover);
        println!("  [doc] removed popover node {popover}");
    }

    fn set_class(&mut self, node: u32, class: StateClass, on: bool) {
        self.classes
            .entry(node)
            .or_default()
            .set(class.bit(), on);
    }

    fn trigger_rect(&self, trigger: u32) -> Rect {
        self.triggers[trigger as usize].1
    }

    fn trigger_margin_left(&self, _trigger: u32) -> f64 {
        0.0
    }

    fn viewport(&self) -> Size {
        self.viewport
    }

    fn metrics(&self, _popover: u32) -> PopoverMetrics {
        PopoverMetrics {
            rendered_height: 120.0,
            vertical_margin: 10.0,
            max_height: 10_000.0,
            max_width: 0.9,
            content_width: 320.0,
            content_scroll_height: 120.0,
        }
    }

    fn scroll_metrics(&self, _popover: u32) -> ScrollMetrics {
        ScrollMetrics::default()
    }

    fn set_content_max_height(&mut self, _popover: u32, height: f64) {
        println!("  [doc] content max height clamped to {height}px");
    }

    fn apply_horizontal(&mut self, _popover: u32, layout: &HorizontalLayout) {
        println!(
            "  [doc] width {:.0}px, offset {:.1}px, indicator at {:.0}%",
            layout.max_width,
            layout.offset,
            layout.indicator_fraction * 100.0
        );
    }

    fn set_scroll_top(&mut self, _popover: u32, _value: f64) {}
}

fn main() {
    let doc = MiniDoc {
        viewport: Size::new(800.0, 600.0),
        triggers: vec![
            ("1".to_string(), Rect::new(120.0, 200.0, 140.0, 215.0)),
            ("2".to_string(), Rect::new(480.0, 200.0, 500.0, 215.0)),
        ],
        classes: HashMap::new(),
        live_popovers: Vec::new(),
    };
    let mut driver = Driver::new(doc, Settings::default());

    println!("== Click footnote 1 ==");
    driver.handle_event(InputEvent::TriggerPointer { id: "1" });
    assert_eq!(driver.entity("1").unwrap().activity(), Activity::Entering);

    driver.advance(100);
    assert!(driver.is_active("1"));
    println!("t=100ms: footnote 1 is active");

    println!("== Click footnote 2 (mutual exclusion) ==");
    driver.handle_event(InputEvent::TriggerPointer { id: "2" });
    assert_eq!(driver.entity("1").unwrap().activity(), Activity::Leaving);

    driver.advance(1000);
    assert!(driver.is_active("2"));
    assert_eq!(driver.entity("1").unwrap().activity(), Activity::Idle);
    println!("t=1000ms: footnote 2 active, footnote 1 removed");

    println!("== Click outside ==");
    driver.handle_event(InputEvent::OutsidePointer);
    driver.advance(2000);
    assert!(driver.entities().all(|e| e.activity() == Activity::Idle));
    assert!(driver.host().live_popovers.is_empty());
    println!("t=2000ms: everything dismissed, no popovers left in the document");
}
