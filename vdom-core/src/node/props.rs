//! Attribute Values and Maps
//!
//! An element's attributes are an insertion-ordered map from name to
//! [`AttrValue`]. Order matters only for the order in which surface
//! operations are emitted, never for equality.
//!
//! # Truthiness
//!
//! Whether an attribute is kept or removed during reconciliation depends on
//! an explicit predicate, [`AttrValue::is_removable`]: a value is removable
//! when it is `false`, the empty string, or numerically zero (`NaN`
//! included). An absent value is removable as well, which callers express
//! with [`is_removable`] over an `Option`.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::surface::Event;

/// Attribute name prefix that marks an event-handler prop.
pub const EVENT_PREFIX: &str = "on";

/// Attribute name of the replacement marker.
pub const FORCE_UPDATE: &str = "forceUpdate";

/// Attribute name that is written to the surface as `class`.
pub const CLASS_NAME: &str = "className";

/// A shared callback registered as an event listener on a live node.
///
/// Two handlers are equal only when they point at the same closure.
#[derive(Clone)]
pub struct EventHandler(Arc<dyn Fn(&Event) + Send + Sync>);

impl EventHandler {
    /// Wrap a closure as an event handler.
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        Self(Arc::new(handler))
    }

    /// Invoke the handler.
    pub fn call(&self, event: &Event) {
        (self.0)(event);
    }

    /// Check whether two handlers share the same closure.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        std::ptr::eq(
            Arc::as_ptr(&self.0) as *const (),
            Arc::as_ptr(&other.0) as *const (),
        )
    }
}

impl PartialEq for EventHandler {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventHandler({:p})", Arc::as_ptr(&self.0) as *const ())
    }
}

/// The value of a single attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    /// A boolean attribute such as `disabled` or `checked`.
    Bool(bool),
    /// A plain string attribute.
    Str(String),
    /// A numeric attribute, written to the surface in its decimal form.
    Number(f64),
    /// An event handler. Only meaningful under an `on*` name.
    Handler(EventHandler),
}

impl AttrValue {
    /// Whether this value asks for the attribute to be removed.
    ///
    /// `false`, `""`, `0` and `NaN` are removable. Handlers never are.
    pub fn is_removable(&self) -> bool {
        match self {
            AttrValue::Bool(b) => !b,
            AttrValue::Str(s) => s.is_empty(),
            AttrValue::Number(n) => *n == 0.0 || n.is_nan(),
            AttrValue::Handler(_) => false,
        }
    }

    /// Whether this value is a boolean.
    pub fn is_bool(&self) -> bool {
        matches!(self, AttrValue::Bool(_))
    }

    /// The string written to the surface for this value.
    ///
    /// Handlers have no attribute form and yield `None`.
    pub fn to_attr_string(&self) -> Option<String> {
        match self {
            AttrValue::Bool(b) => Some(b.to_string()),
            AttrValue::Str(s) => Some(s.clone()),
            AttrValue::Number(n) => Some(format_number(*n)),
            AttrValue::Handler(_) => None,
        }
    }

    /// The handler, if this value is one.
    pub fn as_handler(&self) -> Option<&EventHandler> {
        match self {
            AttrValue::Handler(h) => Some(h),
            _ => None,
        }
    }
}

/// Format a number the way a DOM attribute write stringifies it.
///
/// Plain decimals between `1e-6` and `1e21`, exponent form (`1e+21`, `1.5e-7`)
/// outside that range, and `NaN` / `Infinity` for non-finite values.
fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    let magnitude = n.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return n.to_string();
    }
    let exp = format!("{n:e}");
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
        _ => exp,
    }
}

/// Removability of a possibly-absent value. Absence counts as removable.
pub fn is_removable(value: Option<&AttrValue>) -> bool {
    value.map_or(true, AttrValue::is_removable)
}

impl From<bool> for AttrValue {
    fn from(b: bool) -> Self {
        AttrValue::Bool(b)
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Str(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::Str(s)
    }
}

impl From<f64> for AttrValue {
    fn from(n: f64) -> Self {
        AttrValue::Number(n)
    }
}

impl From<i64> for AttrValue {
    fn from(n: i64) -> Self {
        AttrValue::Number(n as f64)
    }
}

impl From<i32> for AttrValue {
    fn from(n: i32) -> Self {
        AttrValue::Number(f64::from(n))
    }
}

impl From<EventHandler> for AttrValue {
    fn from(h: EventHandler) -> Self {
        AttrValue::Handler(h)
    }
}

/// Whether `name` follows the event-handler naming convention (`on...`).
pub fn is_event_prop(name: &str) -> bool {
    name.starts_with(EVENT_PREFIX)
}

/// Whether `name` is never written to the surface as an attribute.
pub fn is_custom_prop(name: &str) -> bool {
    is_event_prop(name) || name == FORCE_UPDATE
}

/// The listener name for an event prop: prefix stripped, lower-cased.
///
/// `onClick` becomes `click`.
pub fn event_name(name: &str) -> String {
    name.strip_prefix(EVENT_PREFIX)
        .unwrap_or(name)
        .to_lowercase()
}

/// An insertion-ordered attribute map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Props(IndexMap<String, AttrValue>);

impl Props {
    /// Create an empty attribute map.
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Builder-style event handler, keyed as `on<Event>`.
    ///
    /// `Props::new().on("Click", ..)` stores the handler under `onClick`.
    pub fn on<F>(self, event: &str, handler: F) -> Self
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        let name = format!("{EVENT_PREFIX}{event}");
        self.with(name, EventHandler::new(handler))
    }

    /// Insert or overwrite an attribute.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
        self.0.insert(name.into(), value.into());
    }

    /// Look up an attribute.
    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.0.get(name)
    }

    /// Iterate attributes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate attribute names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the replacement marker is present and truthy.
    pub fn forces_update(&self) -> bool {
        !is_removable(self.get(FORCE_UPDATE))
    }
}

impl<K, V> FromIterator<(K, V)> for Props
where
    K: Into<String>,
    V: Into<AttrValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Props
where
    K: Into<String>,
    V: Into<AttrValue>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}
