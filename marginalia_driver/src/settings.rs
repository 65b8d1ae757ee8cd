// Copyright 2026 the Marginalia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Instance configuration: recognized keys, documented defaults, and the
//! entry parser.
//!
//! ## Overview
//!
//! [`Settings`] is plain data, immutable per instance except through
//! [`Settings::apply`]. Construction from untyped key/value entries
//! ([`Settings::from_entries`]) rejects unrecognized keys and malformed
//! values with a [`SettingsError`] instead of ignoring them; recognized keys
//! left out keep their documented defaults.
//!
//! Timing keys are milliseconds on the driver's virtual clock. The
//! collaborator-facing keys (`footnoteSelector`, templates, `scope`,
//! `anchorPattern`, `numberResetSelector`) are carried verbatim for the host
//! document; the driver itself never interprets them.

use alloc::string::{String, ToString};

use thiserror::Error;

/// Configuration for one assembled instance.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    /// Delay between materializing a popover and it becoming active.
    pub activate_delay: u64,
    /// Delay between demoting a popover and physically removing it.
    pub dismiss_delay: u64,
    /// Delay used for hover-triggered activation and the unhover check.
    pub hover_delay: u64,
    /// Activate a popover when its trigger is hovered.
    pub activate_on_hover: bool,
    /// Collaborator-facing: allow repeated references to the same footnote.
    pub allow_duplicates: bool,
    /// Allow several popovers to be active at once.
    pub allow_multiple: bool,
    /// Dismiss all popovers once nothing is hovered anymore.
    pub dismiss_on_unhover: bool,
    /// Buffer kept between a popover edge and the viewport edge.
    pub edge_gap: f64,
    /// Author max width; values `<= 1` are viewport fractions.
    pub max_width: f64,
    /// Author max height for popover content.
    pub max_height: f64,
    /// Collaborator-facing: selector locating footnote definitions.
    pub footnote_selector: String,
    /// Collaborator-facing: template for the rendered trigger button.
    pub button_template: String,
    /// Collaborator-facing: template for the rendered popover.
    pub content_template: String,
    /// Collaborator-facing: optional selector restricting the setup scan.
    pub scope: Option<String>,
    /// Collaborator-facing: pattern recognizing footnote anchors.
    pub anchor_pattern: String,
    /// Collaborator-facing: optional selector at which numbering restarts.
    pub number_reset_selector: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            activate_delay: 100,
            dismiss_delay: 500,
            hover_delay: 250,
            activate_on_hover: false,
            allow_duplicates: true,
            allow_multiple: false,
            dismiss_on_unhover: false,
            edge_gap: 15.0,
            max_width: 0.9,
            max_height: 10_000.0,
            footnote_selector: "li".to_string(),
            button_template: "<button data-footnote-button data-footnote-id=\"<%= id %>\" \
                              data-footnote-number=\"<%= number %>\" data-footnote-content=\"<%= content %>\">\
                              <%= number %></button>"
                .to_string(),
            content_template: "<aside data-footnote-popover data-footnote-id=\"<%= id %>\">\
                               <div data-footnote-wrapper><div data-footnote-content>\
                               <%= content %></div></div></aside>"
                .to_string(),
            scope: None,
            anchor_pattern: "(fn|footnote|note)[:\\-_\\d]".to_string(),
            number_reset_selector: None,
        }
    }
}

/// An untyped configuration value, as delivered by an embedding layer.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// A boolean flag.
    Bool(bool),
    /// A numeric value (delays, dimensions).
    Number(f64),
    /// A string value (selectors, templates, patterns).
    Text(String),
}

/// Rejection diagnostic from the configuration parser.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SettingsError {
    /// The key is not part of the recognized configuration surface.
    #[error("unrecognized configuration key `{0}`")]
    UnrecognizedKey(String),
    /// The key is recognized but the value does not fit it.
    #[error("invalid value for configuration key `{key}`: {reason}")]
    InvalidValue {
        /// The offending key.
        key: String,
        /// Why the value was rejected.
        reason: String,
    },
}

impl Settings {
    /// Build settings from untyped entries, starting from the defaults.
    ///
    /// Unrecognized keys and malformed values are rejected with a
    /// diagnostic; nothing is silently ignored.
    pub fn from_entries<'a, I>(entries: I) -> Result<Self, SettingsError>
    where
        I: IntoIterator<Item = (&'a str, Value)>,
    {
        let mut settings = Self::default();
        settings.apply(entries)?;
        Ok(settings)
    }

    /// Apply a partial update. Only the named keys change; the same
    /// validation as [`Settings::from_entries`] applies.
    pub fn apply<'a, I>(&mut self, entries: I) -> Result<(), SettingsError>
    where
        I: IntoIterator<Item = (&'a str, Value)>,
    {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), SettingsError> {
        match key {
            "activateDelay" => self.activate_delay = delay(key, value)?,
            "dismissDelay" => self.dismiss_delay = delay(key, value)?,
            "hoverDelay" => self.hover_delay = delay(key, value)?,
            "activateOnHover" => self.activate_on_hover = boolean(key, value)?,
            "allowDuplicates" => self.allow_duplicates = boolean(key, value)?,
            "allowMultiple" => self.allow_multiple = boolean(key, value)?,
            "dismissOnUnhover" => self.dismiss_on_unhover = boolean(key, value)?,
            "edgeGap" => self.edge_gap = dimension(key, value)?,
            "maxWidth" => self.max_width = dimension(key, value)?,
            "maxHeight" => self.max_height = dimension(key, value)?,
            "footnoteSelector" => self.footnote_selector = text(key, value)?,
            "buttonTemplate" => self.button_template = text(key, value)?,
            "contentTemplate" => self.content_template = text(key, value)?,
            "scope" => self.scope = Some(text(key, value)?),
            "anchorPattern" => self.anchor_pattern = text(key, value)?,
            "numberResetSelector" => self.number_reset_selector = Some(text(key, value)?),
            _ => return Err(SettingsError::UnrecognizedKey(key.to_string())),
        }
        Ok(())
    }
}

fn delay(key: &str, value: Value) -> Result<u64, SettingsError> {
    match value {
        Value::Number(n) if n.is_finite() && n >= 0.0 => {
            #[allow(
                clippy::cast_possible_truncation,
                reason = "Delays are whole milliseconds; fractions are dropped by design."
            )]
            Ok(n as u64)
        }
        other => Err(invalid(key, &other, "expected a non-negative number of milliseconds")),
    }
}

fn boolean(key: &str, value: Value) -> Result<bool, SettingsError> {
    match value {
        Value::Bool(b) => Ok(b),
        other => Err(invalid(key, &other, "expected a boolean")),
    }
}

fn dimension(key: &str, value: Value) -> Result<f64, SettingsError> {
    match value {
        Value::Number(n) if n.is_finite() && n >= 0.0 => Ok(n),
        other => Err(invalid(key, &other, "expected a non-negative finite number")),
    }
}

fn text(key: &str, value: Value) -> Result<String, SettingsError> {
    match value {
        Value::Text(s) => Ok(s),
        other => Err(invalid(key, &other, "expected a string")),
    }
}

fn invalid(key: &str, value: &Value, reason: &str) -> SettingsError {
    let got = match value {
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::Text(_) => "string",
    };
    let mut full = String::from(reason);
    full.push_str(", got a ");
    full.push_str(got);
    SettingsError::InvalidValue {
        key: key.to_string(),
        reason: full,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn defaults_match_the_documented_table() {
        let s = Settings::default();
        assert_eq!(s.activate_delay, 100);
        assert_eq!(s.dismiss_delay, 500);
        assert_eq!(s.hover_delay, 250);
        assert!(!s.activate_on_hover);
        assert!(s.allow_duplicates);
        assert!(!s.allow_multiple);
        assert!(!s.dismiss_on_unhover);
        assert_eq!(s.edge_gap, 15.0);
        assert_eq!(s.max_width, 0.9);
        assert_eq!(s.max_height, 10_000.0);
        assert_eq!(s.footnote_selector, "li");
        assert_eq!(s.scope, None);
    }

    #[test]
    fn entries_override_defaults() {
        let s = Settings::from_entries(vec![
            ("activateDelay", Value::Number(1.0)),
            ("allowMultiple", Value::Bool(true)),
            ("scope", Value::Text("main".to_string())),
        ])
        .unwrap();
        assert_eq!(s.activate_delay, 1);
        assert!(s.allow_multiple);
        assert_eq!(s.scope.as_deref(), Some("main"));
        // Untouched keys keep their defaults.
        assert_eq!(s.dismiss_delay, 500);
    }

    #[test]
    fn unrecognized_keys_are_rejected() {
        let err = Settings::from_entries(vec![("activationDelay", Value::Number(1.0))]).unwrap_err();
        assert_eq!(
            err,
            SettingsError::UnrecognizedKey("activationDelay".to_string())
        );
    }

    #[test]
    fn malformed_values_are_rejected() {
        assert!(matches!(
            Settings::from_entries(vec![("activateDelay", Value::Number(-1.0))]),
            Err(SettingsError::InvalidValue { .. })
        ));
        assert!(matches!(
            Settings::from_entries(vec![("edgeGap", Value::Number(f64::NAN))]),
            Err(SettingsError::InvalidValue { .. })
        ));
        assert!(matches!(
            Settings::from_entries(vec![("allowMultiple", Value::Number(1.0))]),
            Err(SettingsError::InvalidValue { .. })
        ));
        assert!(matches!(
            Settings::from_entries(vec![("footnoteSelector", Value::Bool(true))]),
            Err(SettingsError::InvalidValue { .. })
        ));
    }

    #[test]
    fn partial_update_touches_only_named_keys() {
        let mut s = Settings::default();
        s.apply(vec![("dismissDelay", Value::Number(50.0))]).unwrap();
        assert_eq!(s.dismiss_delay, 50);
        assert_eq!(s.activate_delay, 100);
    }

    #[test]
    fn rejection_reports_what_was_seen() {
        let err = Settings::from_entries(vec![("hoverDelay", Value::Text("fast".to_string()))])
            .unwrap_err();
        match err {
            SettingsError::InvalidValue { key, reason } => {
                assert_eq!(key, "hoverDelay");
                assert!(reason.contains("got a string"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
