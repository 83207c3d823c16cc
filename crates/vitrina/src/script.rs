//! Page scripts shared by the live backends.
//!
//! Both CDP and WebDriver evaluate the same expressions so element snapshots
//! and synthetic events behave identically across browsers.

use crate::driver::{ElementRef, PointerAction};

/// Console capture shim, installed before page scripts run
pub const CONSOLE_SHIM: &str = r"
(() => {
  if (window.__vitrinaConsole) { return; }
  const sink = [];
  window.__vitrinaConsole = sink;
  const text = (args) => args.map((a) => {
    if (a instanceof Error) { return a.stack || a.message; }
    if (typeof a === 'object') { try { return JSON.stringify(a); } catch (_) { return String(a); } }
    return String(a);
  }).join(' ');
  for (const [method, level] of [['error', 'SEVERE'], ['warn', 'WARNING'], ['info', 'INFO'], ['log', 'INFO'], ['debug', 'DEBUG']]) {
    const original = console[method];
    console[method] = function (...args) {
      sink.push({ level, message: text(args), source: 'console-api' });
      return original.apply(console, args);
    };
  }
  window.addEventListener('error', (event) => {
    const target = event.target;
    if (target && target !== window && (target.src || target.href)) {
      sink.push({ level: 'WARNING', message: 'Failed to load resource: ' + (target.src || target.href), source: 'network' });
    } else {
      sink.push({ level: 'SEVERE', message: event.message || 'Uncaught error', source: 'javascript' });
    }
  }, true);
  window.addEventListener('unhandledrejection', (event) => {
    sink.push({ level: 'SEVERE', message: 'Unhandled rejection: ' + String(event.reason), source: 'javascript' });
  });
})();
";

/// Returns and clears the entries collected by [`CONSOLE_SHIM`]
pub const DRAIN_CONSOLE: &str =
    "(() => { const s = window.__vitrinaConsole || []; return s.splice(0, s.length); })()";

/// Ready state expression
pub const READY_STATE: &str = "document.readyState";

const ACTIVE_ELEMENT: &str = "(() => { const el = document.activeElement; \
     if (!el || el === document.body) { return null; } \
     return (SNAPSHOT)(el); })()";

/// Function body turning one element into an `ElementSnapshot`
const SNAPSHOT_FN: &str = r"(el) => {
  const style = window.getComputedStyle(el);
  const rect = el.getBoundingClientRect();
  const opacity = parseFloat(style.opacity);
  const visible = style.display !== 'none' && style.visibility !== 'hidden'
    && opacity > 0 && (rect.width > 0 || rect.height > 0);
  const attributes = {};
  for (const attr of el.attributes) { attributes[attr.name] = attr.value; }
  const isControl = el instanceof HTMLInputElement || el instanceof HTMLTextAreaElement
    || el instanceof HTMLSelectElement;
  return {
    tag: el.tagName.toLowerCase(),
    text: (el.innerText || el.textContent || '').trim(),
    value: isControl ? String(el.value) : null,
    visible,
    enabled: !el.disabled,
    selected: !!(el.checked || el.selected),
    opacity: Number.isNaN(opacity) ? 1 : opacity,
    image_loaded: el.tagName === 'IMG' ? (el.complete && el.naturalHeight > 0) : true,
    attributes,
    rect: { x: rect.x, y: rect.y, width: rect.width, height: rect.height },
  };
}";

fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

/// Expression resolving to the target element or null
fn element_expr(target: &ElementRef) -> String {
    format!(
        "document.querySelectorAll({})[{}]",
        js_string(&target.css),
        target.index
    )
}

/// Snapshots of every match for `css`
#[must_use]
pub fn query(css: &str) -> String {
    format!(
        "Array.from(document.querySelectorAll({})).map({SNAPSHOT_FN})",
        js_string(css)
    )
}

/// Snapshot of the focused element
#[must_use]
pub fn active_element() -> String {
    ACTIVE_ELEMENT.replace("SNAPSHOT", SNAPSHOT_FN)
}

/// Outer HTML of the target, or null
#[must_use]
pub fn outer_html(target: &ElementRef) -> String {
    format!(
        "(() => {{ const el = {}; return el ? el.outerHTML : null; }})()",
        element_expr(target)
    )
}

/// Clear a control through the native value setter so framework state updates
#[must_use]
pub fn clear(target: &ElementRef) -> String {
    format!(
        "(() => {{ const el = {}; if (!el) {{ return false; }} \
         const setter = Object.getOwnPropertyDescriptor(Object.getPrototypeOf(el), 'value'); \
         if (setter && setter.set) {{ setter.set.call(el, ''); }} else {{ el.value = ''; }} \
         el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
         el.dispatchEvent(new Event('change', {{ bubbles: true }})); \
         return true; }})()",
        element_expr(target)
    )
}

/// Focus the target
#[must_use]
pub fn focus(target: &ElementRef) -> String {
    format!(
        "(() => {{ const el = {}; if (!el) {{ return false; }} el.focus(); return true; }})()",
        element_expr(target)
    )
}

/// Scroll the target to the middle of the viewport
#[must_use]
pub fn scroll_into_view(target: &ElementRef) -> String {
    format!(
        "(() => {{ const el = {}; if (!el) {{ return false; }} \
         el.scrollIntoView({{ block: 'center', inline: 'nearest' }}); return true; }})()",
        element_expr(target)
    )
}

/// Dispatch the mouse events for a pointer gesture
#[must_use]
pub fn pointer(target: &ElementRef, action: PointerAction) -> String {
    let events = serde_json::to_string(action.dom_events()).unwrap_or_else(|_| "[]".to_string());
    let button = if action == PointerAction::ContextClick { 2 } else { 0 };
    format!(
        "(() => {{ const el = {}; if (!el) {{ return false; }} \
         const r = el.getBoundingClientRect(); \
         const init = {{ bubbles: true, cancelable: true, view: window, button: {button}, \
           clientX: r.x + r.width / 2, clientY: r.y + r.height / 2 }}; \
         for (const type of {events}) {{ \
           const Ctor = type.startsWith('pointer') ? PointerEvent : MouseEvent; \
           el.dispatchEvent(new Ctor(type, init)); }} \
         return true; }})()",
        element_expr(target)
    )
}

/// Navigate back in history
pub const HISTORY_BACK: &str = "history.back()";

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod script_tests {
        use super::*;

        #[test]
        fn test_query_embeds_selector_as_js_string() {
            let script = query("[data-testid='hero-title']");
            assert!(script.contains("document.querySelectorAll(\"[data-testid='hero-title']\")"));
            assert!(script.contains("image_loaded"));
        }

        #[test]
        fn test_selector_quotes_are_escaped() {
            let script = query("[title=\"a\"]");
            assert!(script.contains("\\\"a\\\""));
        }

        #[test]
        fn test_element_scripts_use_index() {
            let target = ElementRef::new("li", 3);
            assert!(outer_html(&target).contains("document.querySelectorAll(\"li\")[3]"));
            assert!(clear(&target).contains("[3]"));
        }

        #[test]
        fn test_active_element_inlines_snapshot() {
            let script = active_element();
            assert!(!script.contains("SNAPSHOT)"));
            assert!(script.contains("getComputedStyle"));
        }

        #[test]
        fn test_context_click_uses_right_button() {
            let script = pointer(&ElementRef::first("a"), PointerAction::ContextClick);
            assert!(script.contains("button: 2"));
            assert!(script.contains("contextmenu"));
        }
    }
}
